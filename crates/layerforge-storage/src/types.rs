//! Storage-layer types for stored model metadata.

use serde::{Deserialize, Serialize};

/// Summary of a stored model (for listing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredModelSummary {
    pub name: String,
    /// Hex blake3 hash of the stored snapshot JSON.
    pub content_hash: String,
    /// Size of the stored snapshot JSON in bytes.
    pub size_bytes: usize,
    pub vertex_count: usize,
    pub edge_count: usize,
}

/// What a save did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveOutcome {
    /// No model was stored under the name before.
    Created,
    /// The stored content was replaced.
    Updated,
    /// The stored content already matched; nothing was written.
    Unchanged,
}
