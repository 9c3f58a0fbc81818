//! Encoding snapshots for storage and decoding them back.
//!
//! [`encode`] turns a [`ModelSnapshot`] into the JSON text and metadata a
//! backend persists. [`decode`] reverses it: the hash is checked first, then
//! the JSON is parsed (graphs and layers re-validate themselves while
//! deserializing), then [`ModelSnapshot::check`] verifies the vertex/layer
//! pairing. Both backends go through these two functions, so a model that
//! loads from one loads from the other.

use layerforge_model::ModelSnapshot;

use crate::error::StorageError;
use crate::hash::{hash_content_hex, verify_content};

/// A snapshot ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedModel {
    pub content_json: String,
    pub content_hash: String,
    pub vertex_count: usize,
    pub edge_count: usize,
}

/// Encodes a snapshot, checking it first so that nothing incoherent is ever
/// written.
pub fn encode(snapshot: &ModelSnapshot) -> Result<EncodedModel, StorageError> {
    snapshot.check()?;
    let content_json = serde_json::to_string(snapshot)?;
    let content_hash = hash_content_hex(content_json.as_bytes());
    Ok(EncodedModel {
        content_hash,
        vertex_count: snapshot.graph.vertex_count(),
        edge_count: snapshot.graph.edge_count(),
        content_json,
    })
}

/// Decodes stored content for the model `name`.
pub fn decode(name: &str, content_json: &str, content_hash: &str) -> Result<ModelSnapshot, StorageError> {
    if !verify_content(content_json.as_bytes(), content_hash) {
        return Err(StorageError::IntegrityError {
            reason: format!("content of model {name:?} does not match its hash"),
        });
    }
    let snapshot: ModelSnapshot = serde_json::from_str(content_json)?;
    snapshot.check()?;
    Ok(snapshot)
}

/// Rejects names that are empty, padded with whitespace, or contain control
/// characters.
pub fn check_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() || name.trim() != name || name.chars().any(char::is_control) {
        return Err(StorageError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}
