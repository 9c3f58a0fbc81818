//! layerforge model: the editable layer graph and its request surface.
//!
//! A [`Model`] owns one [`Graph`](layerforge_core::Graph) and the
//! [`Layer`](layerforge_layers::Layer) behind each vertex. Clients drive it
//! with [`ChangeRequest`]s and [`InfoRequest`]s; every change that can alter
//! field values is followed by a propagation pass that pushes upstream
//! values downstream and records per-edge consistency.

pub mod config;
pub mod error;
pub mod model;
pub mod propagation;
pub mod schema;
pub mod snapshot;

pub use config::ModelConfig;
pub use error::ModelError;
pub use model::Model;
pub use propagation::PropagationReport;
pub use schema::info::{InfoRequest, InfoResponse};
pub use schema::mutations::{ChangeOutcome, ChangeRequest};
pub use snapshot::ModelSnapshot;
