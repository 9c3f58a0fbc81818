//! Error types for layer field access and layer updates.

use layerforge_core::CoreError;
use thiserror::Error;

/// Errors produced by [`Layer`](crate::Layer) operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayerError {
    #[error("field {field} does not exist")]
    UnknownField { field: String },

    #[error("port {port} does not exist")]
    UnknownPort { port: String },

    #[error("unknown layer type {name}")]
    UnknownKind { name: String },

    /// Computed fields are only written by the layer's own update.
    #[error("field {field} is read-only")]
    ReadOnlyField { field: String },

    /// The layer could not derive its outputs from the current inputs.
    #[error("{reason}")]
    Update { reason: String },

    /// A field rejected a value. Displays the wrapper's reason unchanged.
    #[error("{source}")]
    Field { field: String, source: CoreError },

    /// A stored layer does not match its kind's declared fields.
    #[error("stored {kind} layer is malformed: {reason}")]
    Malformed { kind: String, reason: String },
}

impl LayerError {
    pub(crate) fn update(reason: impl Into<String>) -> Self {
        LayerError::Update {
            reason: reason.into(),
        }
    }

    pub(crate) fn field(field: &str, source: CoreError) -> Self {
        LayerError::Field {
            field: field.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_display_the_wrapper_reason() {
        let inner = layerforge_core::ValueWrapper::int_at_least(1, 0).unwrap_err();
        let err = LayerError::field("units", inner);
        assert_eq!(err.to_string(), "Value must be at least 1");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn update_errors_display_the_reason() {
        assert_eq!(LayerError::update("shapes differ").to_string(), "shapes differ");
    }
}
