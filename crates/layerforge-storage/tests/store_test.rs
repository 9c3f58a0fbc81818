//! Backend behavior shared by both stores, plus on-disk persistence.

use layerforge_layers::LayerKind;
use layerforge_model::{ChangeRequest, Model, ModelConfig};
use layerforge_storage::{InMemoryStore, ModelStore, SaveOutcome, SqliteStore, StorageError};

fn connected_model() -> Model {
    let mut model = Model::with_config(ModelConfig::seeded(42));
    let input = model.add_layer(LayerKind::Input, 0.0, 0.0).unwrap();
    let dense = model.add_layer(LayerKind::Dense, 0.0, 1.0).unwrap();
    let edge = model.generate_ids(1, layerforge_core::IdNamespace::Edges).remove(0);
    let outcome = model.request_change(&ChangeRequest::CreateEdge {
        new_edge_id: edge.into(),
        source_vertex_id: input,
        source_port_id: "output_shape_port".into(),
        target_vertex_id: dense,
        target_port_id: "input_shape_port".into(),
    });
    assert!(outcome.is_applied(), "{outcome:?}");
    model
}

fn exercise(store: &mut impl ModelStore) {
    let model = connected_model();
    let snapshot = model.snapshot();

    assert_eq!(store.save("first", &snapshot).unwrap(), SaveOutcome::Created);
    assert_eq!(store.save("first", &snapshot).unwrap(), SaveOutcome::Unchanged);
    assert_eq!(store.save("second", &snapshot).unwrap(), SaveOutcome::Created);
    assert!(store.contains("first").unwrap());

    let names: Vec<String> = store.list().unwrap().into_iter().map(|s| s.name).collect();
    assert_eq!(names, ["first", "second"]);

    let loaded = Model::from_snapshot(store.load("first").unwrap(), ModelConfig::default()).unwrap();
    assert_eq!(loaded.graph_data(), model.graph_data());

    store.delete("first").unwrap();
    assert!(!store.contains("first").unwrap());
    assert!(matches!(store.load("first"), Err(StorageError::ModelNotFound(_))));
    assert!(matches!(
        store.save("", &snapshot),
        Err(StorageError::InvalidName { .. })
    ));
}

#[test]
fn in_memory_store_contract() {
    exercise(&mut InMemoryStore::new());
}

#[test]
fn sqlite_store_contract() {
    exercise(&mut SqliteStore::in_memory().unwrap());
}

#[test]
fn models_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("models.db");
    let path = path.to_str().unwrap();
    let model = connected_model();

    {
        let mut store = SqliteStore::new(path).unwrap();
        store.save("persisted", &model.snapshot()).unwrap();
    }

    let store = SqliteStore::new(path).unwrap();
    let summaries = store.list().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].vertex_count, 2);
    assert_eq!(summaries[0].edge_count, 1);

    let loaded = Model::from_snapshot(store.load("persisted").unwrap(), ModelConfig::default()).unwrap();
    assert_eq!(loaded.graph_data(), model.graph_data());
}
