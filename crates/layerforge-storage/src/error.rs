//! Storage error types for layerforge-storage.
//!
//! [`StorageError`] covers every failure mode of the storage layer: encoding,
//! the SQLite backend and its migrations, missing models, integrity
//! violations, and snapshots that no longer describe a valid model.

use layerforge_model::ModelError;
use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A schema migration could not be applied.
    #[error("migration error: {0}")]
    Migration(String),

    /// No model is stored under the given name.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// Model names must be non-empty and free of control characters.
    #[error("invalid model name: {name:?}")]
    InvalidName { name: String },

    /// Stored content does not match its recorded hash.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },

    /// The stored snapshot decoded but does not form a coherent model.
    #[error("stored model is invalid: {0}")]
    Model(#[from] ModelError),
}
