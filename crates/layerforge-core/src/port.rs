//! Ports: named, directional attachment points on a vertex.
//!
//! A port is bound to exactly one field of its vertex's layer. Ports are
//! immutable once created; the side and position are layout hints for the
//! editor and carry no meaning for the engine.

use serde::{Deserialize, Serialize};

/// Which side of the vertex the port is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// Whether values flow into or out of the vertex through this port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

/// A port on a vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    side: PortSide,
    /// Fractional coordinate along `side`, in `0..=1`.
    position: f64,
    direction: PortDirection,
    /// Name of the layer field this port exposes.
    field_name: String,
}

impl Port {
    pub fn new(
        side: PortSide,
        position: f64,
        direction: PortDirection,
        field_name: impl Into<String>,
    ) -> Self {
        Port {
            side,
            position,
            direction,
            field_name: field_name.into(),
        }
    }

    pub fn side(&self) -> PortSide {
        self.side
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn direction(&self) -> PortDirection {
        self.direction
    }

    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == PortDirection::Output
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }
}
