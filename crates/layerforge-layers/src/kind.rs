//! The closed set of layer kinds and their name registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LayerError;

/// Every kind of layer the editor can place.
///
/// Serialized as the display name (`"Conv2D"`, `"Repeat Int"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    Input,
    Output,
    Dense,
    Conv2D,
    Add,
    Reshape,
    Activation,
    BatchNormalization,
    #[serde(rename = "Repeat Int")]
    RepeatInt,
}

impl LayerKind {
    /// All kinds, in listing order.
    pub const ALL: [LayerKind; 9] = [
        LayerKind::Input,
        LayerKind::Output,
        LayerKind::Dense,
        LayerKind::Conv2D,
        LayerKind::Add,
        LayerKind::Reshape,
        LayerKind::Activation,
        LayerKind::BatchNormalization,
        LayerKind::RepeatInt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Input => "Input",
            LayerKind::Output => "Output",
            LayerKind::Dense => "Dense",
            LayerKind::Conv2D => "Conv2D",
            LayerKind::Add => "Add",
            LayerKind::Reshape => "Reshape",
            LayerKind::Activation => "Activation",
            LayerKind::BatchNormalization => "BatchNormalization",
            LayerKind::RepeatInt => "Repeat Int",
        }
    }

    /// Looks a kind up by its display name.
    pub fn from_name(name: &str) -> Result<Self, LayerError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| LayerError::UnknownKind {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayerKind {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// One entry of the available-layer listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableLayer {
    pub layer_name: String,
    /// Why the kind cannot be placed right now, if it cannot.
    pub reason_not_available: Option<String>,
}

/// Lists every kind with its availability. All kinds are currently
/// available.
pub fn available_layers() -> Vec<AvailableLayer> {
    LayerKind::ALL
        .into_iter()
        .map(|kind| AvailableLayer {
            layer_name: kind.name().to_string(),
            reason_not_available: None,
        })
        .collect()
}
