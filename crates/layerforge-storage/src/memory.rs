//! In-memory implementation of [`ModelStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and for sessions
//! that don't need persistence. Content goes through the same
//! encode/decode path as the SQLite backend, so both behave identically.

use std::collections::BTreeMap;

use layerforge_model::ModelSnapshot;
use tracing::debug;

use crate::convert::{check_name, decode, encode, EncodedModel};
use crate::error::StorageError;
use crate::traits::ModelStore;
use crate::types::{SaveOutcome, StoredModelSummary};

/// In-memory model store. Models are kept encoded, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    models: BTreeMap<String, EncodedModel>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelStore for InMemoryStore {
    fn save(&mut self, name: &str, snapshot: &ModelSnapshot) -> Result<SaveOutcome, StorageError> {
        check_name(name)?;
        let encoded = encode(snapshot)?;

        let outcome = match self.models.get(name) {
            Some(stored) if stored.content_hash == encoded.content_hash => {
                return Ok(SaveOutcome::Unchanged);
            }
            Some(_) => SaveOutcome::Updated,
            None => SaveOutcome::Created,
        };
        debug!(name, hash = %encoded.content_hash, ?outcome, "model saved");
        self.models.insert(name.to_string(), encoded);
        Ok(outcome)
    }

    fn load(&self, name: &str) -> Result<ModelSnapshot, StorageError> {
        let stored = self
            .models
            .get(name)
            .ok_or_else(|| StorageError::ModelNotFound(name.to_string()))?;
        decode(name, &stored.content_json, &stored.content_hash)
    }

    fn list(&self) -> Result<Vec<StoredModelSummary>, StorageError> {
        Ok(self
            .models
            .iter()
            .map(|(name, stored)| StoredModelSummary {
                name: name.clone(),
                content_hash: stored.content_hash.clone(),
                size_bytes: stored.content_json.len(),
                vertex_count: stored.vertex_count,
                edge_count: stored.edge_count,
            })
            .collect())
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        self.models
            .remove(name)
            .map(drop)
            .ok_or_else(|| StorageError::ModelNotFound(name.to_string()))
    }

    fn contains(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.models.contains_key(name))
    }
}
