//! The [`ModelStore`] trait defining the storage contract for models.
//!
//! Models are stored whole, as snapshots keyed by a user-chosen name. All
//! backends ([`InMemoryStore`](crate::InMemoryStore),
//! [`SqliteStore`](crate::SqliteStore)) implement this trait with identical
//! semantics, so they are swappable without changing callers.

use layerforge_model::ModelSnapshot;

use crate::error::StorageError;
use crate::types::{SaveOutcome, StoredModelSummary};

/// The storage contract for model snapshots.
///
/// Synchronous, like the model itself.
pub trait ModelStore {
    /// Stores `snapshot` under `name`, replacing any previous content.
    ///
    /// Content identical to what is stored (by blake3 hash) is not
    /// rewritten and reports [`SaveOutcome::Unchanged`].
    fn save(&mut self, name: &str, snapshot: &ModelSnapshot) -> Result<SaveOutcome, StorageError>;

    /// Loads and re-validates the snapshot stored under `name`.
    fn load(&self, name: &str) -> Result<ModelSnapshot, StorageError>;

    /// Lists stored models, ordered by name.
    fn list(&self) -> Result<Vec<StoredModelSummary>, StorageError>;

    /// Deletes the model stored under `name`.
    fn delete(&mut self, name: &str) -> Result<(), StorageError>;

    fn contains(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.list()?.iter().any(|summary| summary.name == name))
    }
}
