//! SQLite implementation of [`ModelStore`].
//!
//! [`SqliteStore`] keeps one row per named model in the `models` table. The
//! snapshot is a JSON TEXT column with its blake3 hash alongside, so loads
//! can detect content that was changed outside the store. Every write runs
//! in a transaction.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use layerforge_model::ModelSnapshot;

use crate::convert::{check_name, decode, encode};
use crate::error::StorageError;
use crate::traits::ModelStore;
use crate::types::{SaveOutcome, StoredModelSummary};

/// SQLite-backed implementation of [`ModelStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        info!(path, "opened model database");
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    fn stored_hash(&self, name: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .conn
            .query_row(
                "SELECT content_hash FROM models WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?)
    }
}

impl ModelStore for SqliteStore {
    fn save(&mut self, name: &str, snapshot: &ModelSnapshot) -> Result<SaveOutcome, StorageError> {
        check_name(name)?;
        let encoded = encode(snapshot)?;

        let outcome = match self.stored_hash(name)? {
            Some(hash) if hash == encoded.content_hash => return Ok(SaveOutcome::Unchanged),
            Some(_) => SaveOutcome::Updated,
            None => SaveOutcome::Created,
        };

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO models (name, content_json, content_hash, vertex_count, edge_count)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(name) DO UPDATE SET
                 content_json = excluded.content_json,
                 content_hash = excluded.content_hash,
                 vertex_count = excluded.vertex_count,
                 edge_count = excluded.edge_count,
                 updated_at = datetime('now')",
            params![
                name,
                encoded.content_json,
                encoded.content_hash,
                encoded.vertex_count as i64,
                encoded.edge_count as i64,
            ],
        )?;
        tx.commit()?;

        info!(name, hash = %encoded.content_hash, ?outcome, "model saved");
        Ok(outcome)
    }

    fn load(&self, name: &str) -> Result<ModelSnapshot, StorageError> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT content_json, content_hash FROM models WHERE name = ?1",
                params![name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let (content_json, content_hash) =
            row.ok_or_else(|| StorageError::ModelNotFound(name.to_string()))?;
        debug!(name, bytes = content_json.len(), "model loaded");
        decode(name, &content_json, &content_hash)
    }

    fn list(&self) -> Result<Vec<StoredModelSummary>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT name, content_hash, length(CAST(content_json AS BLOB)), vertex_count, edge_count
             FROM models ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| {
            let size: i64 = row.get(2)?;
            let vertices: i64 = row.get(3)?;
            let edges: i64 = row.get(4)?;
            Ok(StoredModelSummary {
                name: row.get(0)?,
                content_hash: row.get(1)?,
                size_bytes: usize::try_from(size).unwrap_or_default(),
                vertex_count: usize::try_from(vertices).unwrap_or_default(),
                edge_count: usize::try_from(edges).unwrap_or_default(),
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM models WHERE name = ?1", params![name])?;
        if removed == 0 {
            return Err(StorageError::ModelNotFound(name.to_string()));
        }
        tx.commit()?;
        info!(name, "model deleted");
        Ok(())
    }

    fn contains(&self, name: &str) -> Result<bool, StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM models WHERE name = ?1)",
            params![name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

#[cfg(test)]
impl SqliteStore {
    /// Overwrites stored content without updating its hash.
    fn corrupt(&self, name: &str, content_json: &str) {
        self.conn
            .execute(
                "UPDATE models SET content_json = ?2 WHERE name = ?1",
                params![name, content_json],
            )
            .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerforge_layers::LayerKind;
    use layerforge_model::{Model, ModelConfig};

    fn sample() -> Model {
        let mut model = Model::with_config(ModelConfig::seeded(11));
        model.add_layer(LayerKind::Input, 0.0, 0.0).unwrap();
        model.add_layer(LayerKind::Conv2D, 0.0, 1.0).unwrap();
        model
    }

    #[test]
    fn save_then_load() {
        let mut store = SqliteStore::in_memory().unwrap();
        let model = sample();
        assert_eq!(store.save("net", &model.snapshot()).unwrap(), SaveOutcome::Created);
        let loaded = store.load("net").unwrap();
        assert_eq!(loaded.graph.vertex_count(), 2);
        assert_eq!(loaded.layers.len(), 2);
    }

    #[test]
    fn unchanged_content_is_not_rewritten() {
        let mut store = SqliteStore::in_memory().unwrap();
        let mut model = sample();
        store.save("net", &model.snapshot()).unwrap();
        assert_eq!(store.save("net", &model.snapshot()).unwrap(), SaveOutcome::Unchanged);

        model.add_layer(LayerKind::Output, 0.0, 2.0).unwrap();
        assert_eq!(store.save("net", &model.snapshot()).unwrap(), SaveOutcome::Updated);
        assert_eq!(store.list().unwrap()[0].vertex_count, 3);
    }

    #[test]
    fn corrupted_rows_fail_integrity() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.save("net", &sample().snapshot()).unwrap();
        store.corrupt("net", "{\"graph\":{},\"layers\":{}}");
        assert!(matches!(
            store.load("net"),
            Err(StorageError::IntegrityError { .. })
        ));
    }

    #[test]
    fn missing_models() {
        let mut store = SqliteStore::in_memory().unwrap();
        assert!(matches!(store.load("nope"), Err(StorageError::ModelNotFound(_))));
        assert!(matches!(store.delete("nope"), Err(StorageError::ModelNotFound(_))));
        assert!(!store.contains("nope").unwrap());
    }
}
