//! Error types for model construction and snapshot restore.
//!
//! Editing requests never surface these: a rejected request is reported as
//! [`ChangeOutcome::Ignored`](crate::schema::mutations::ChangeOutcome) with
//! the error's text as the reason.

use layerforge_core::{CoreError, VertexId};
use layerforge_layers::LayerError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("layer {id} does not exist")]
    UnknownLayer { id: VertexId },

    /// A `setLayerFields` entry was refused.
    #[error("field \"{field}\" has an invalid value: {source}")]
    InvalidField { field: String, source: LayerError },

    /// A snapshot does not describe a coherent model.
    #[error("invalid snapshot: {reason}")]
    Snapshot { reason: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Layer(#[from] LayerError),
}

impl ModelError {
    pub(crate) fn snapshot(reason: impl Into<String>) -> Self {
        ModelError::Snapshot {
            reason: reason.into(),
        }
    }
}
