//! Vertices: positioned nodes exposing a fixed set of ports.
//!
//! A vertex knows nothing about the layer behind it beyond its `label`
//! (the layer kind name, for display). The mapping from port to layer field
//! lives on each [`Port`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::port::Port;

/// A node in the editor graph.
///
/// `Clone` deep-copies the ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    label: String,
    x: f64,
    y: f64,
    /// Ports keyed by port id, in declaration order.
    ports: IndexMap<String, Port>,
}

impl Vertex {
    pub fn new(label: impl Into<String>, x: f64, y: f64, ports: IndexMap<String, Port>) -> Self {
        Vertex {
            label: label.into(),
            x,
            y,
            ports,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn has_port(&self, port_id: &str) -> bool {
        self.ports.contains_key(port_id)
    }

    pub fn port(&self, port_id: &str) -> Option<&Port> {
        self.ports.get(port_id)
    }

    pub fn port_ids(&self) -> impl Iterator<Item = &str> {
        self.ports.keys().map(String::as_str)
    }

    pub fn ports(&self) -> &IndexMap<String, Port> {
        &self.ports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{PortDirection, PortSide};

    fn sample() -> Vertex {
        let mut ports = IndexMap::new();
        ports.insert(
            "input_port".to_string(),
            Port::new(PortSide::Top, 0.5, PortDirection::Input, "input_shape"),
        );
        ports.insert(
            "output_port".to_string(),
            Port::new(PortSide::Bottom, 0.5, PortDirection::Output, "output_shape"),
        );
        Vertex::new("Conv2D", 10.0, 20.0, ports)
    }

    #[test]
    fn port_lookup() {
        let v = sample();
        assert!(v.has_port("input_port"));
        assert!(!v.has_port("missing"));
        assert_eq!(
            v.port_ids().collect::<Vec<_>>(),
            vec!["input_port", "output_port"]
        );
        assert!(v.port("output_port").unwrap().is_output());
    }

    #[test]
    fn clone_is_independent() {
        let v = sample();
        let mut c = v.clone();
        c.set_position(1.0, 2.0);
        assert_eq!((v.x(), v.y()), (10.0, 20.0));
        assert_eq!((c.x(), c.y()), (1.0, 2.0));
        assert_eq!(c.ports(), v.ports());
    }
}
