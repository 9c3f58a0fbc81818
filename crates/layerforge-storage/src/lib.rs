//! Storage for layerforge models.
//!
//! Provides the [`ModelStore`] trait defining the storage contract, plus the
//! [`InMemoryStore`] and [`SqliteStore`] backends. Models are stored whole,
//! as JSON-encoded [`ModelSnapshot`](layerforge_model::ModelSnapshot)s under
//! a name, with a blake3 hash for change detection and integrity checks.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: StoredModelSummary and SaveOutcome
//! - [`traits`]: ModelStore trait definition
//! - [`convert`]: snapshot encode/decode
//! - [`hash`]: blake3 content hashing
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: migration setup for SQLite
//! - [`sqlite`]: SqliteStore implementation

pub mod convert;
pub mod error;
pub mod hash;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::ModelStore;
pub use types::{SaveOutcome, StoredModelSummary};
