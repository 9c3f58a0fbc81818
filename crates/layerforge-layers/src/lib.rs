//! Layer kinds for layerforge.
//!
//! A [`Layer`] is the typed-field object behind one graph vertex. Each
//! [`LayerKind`] declares its fields, which of them are computed, how ports
//! bind to fields, and how the computed fields follow from the rest.

pub mod error;
pub mod kind;
pub mod kinds;
pub mod layer;

// Re-export commonly used types
pub use error::LayerError;
pub use kind::{available_layers, AvailableLayer, LayerKind};
pub use kinds::{ACTIVATIONS, DEFAULT_ACTIVATION};
pub use layer::Layer;
