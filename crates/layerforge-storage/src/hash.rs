//! Content hashing for stored snapshots using blake3.
//!
//! A snapshot's hash is taken over its encoded JSON. Snapshot JSON is
//! deterministic (graphs and layers iterate in insertion order and hold no
//! `HashMap`s), so equal models always hash equally and a save of unchanged
//! content can be skipped.

/// Computes the blake3 hash of encoded snapshot content.
pub fn hash_content(content: &[u8]) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(content);
    hasher.finalize()
}

/// Hex form of [`hash_content`], as stored next to the content.
pub fn hash_content_hex(content: &[u8]) -> String {
    hash_content(content).to_hex().to_string()
}

/// Checks `content` against a previously recorded hex hash.
pub fn verify_content(content: &[u8], expected_hex: &str) -> bool {
    match blake3::Hash::from_hex(expected_hex) {
        // blake3::Hash equality is constant-time
        Ok(expected) => hash_content(content) == expected,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_content_hashes_equally() {
        assert_eq!(hash_content(b"{\"a\":1}"), hash_content(b"{\"a\":1}"));
        assert_ne!(hash_content(b"{\"a\":1}"), hash_content(b"{\"a\":2}"));
    }

    #[test]
    fn hex_hashes_verify() {
        let hex = hash_content_hex(b"layers");
        assert_eq!(hex.len(), 64);
        assert!(verify_content(b"layers", &hex));
        assert!(!verify_content(b"layer", &hex));
        assert!(!verify_content(b"layers", "not hex"));
    }
}
