//! Serializable model state.
//!
//! A [`ModelSnapshot`] is everything needed to rebuild a model: the graph
//! and the layer behind each vertex. Graphs and layers re-validate
//! themselves when deserialized; [`ModelSnapshot::check`] verifies the
//! links between the two.

use indexmap::IndexMap;
use layerforge_core::{Graph, VertexId};
use layerforge_layers::Layer;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub graph: Graph,
    pub layers: IndexMap<VertexId, Layer>,
}

impl ModelSnapshot {
    /// Verifies that vertices and layers pair up one to one and that every
    /// port is bound to a field of its layer with the same direction.
    pub fn check(&self) -> Result<(), ModelError> {
        for (id, vertex) in self.graph.vertices() {
            let layer = self
                .layers
                .get(id)
                .ok_or_else(|| ModelError::snapshot(format!("vertex {id} has no layer")))?;

            if vertex.label() != layer.kind().name() {
                return Err(ModelError::snapshot(format!(
                    "vertex {id} is labelled {} but holds a {} layer",
                    vertex.label(),
                    layer.kind()
                )));
            }

            for (port_id, port) in vertex.ports() {
                let bound = layer.field_name_of_port(port_id).map_err(|_| {
                    ModelError::snapshot(format!("port {port_id} of vertex {id} is not a layer port"))
                })?;
                if bound != port.field_name() || layer.is_input_port(port_id) != port.is_input() {
                    return Err(ModelError::snapshot(format!(
                        "port {port_id} of vertex {id} does not match its layer"
                    )));
                }
            }
        }

        if let Some(orphan) = self.layers.keys().find(|id| !self.graph.has_vertex(id.as_str())) {
            return Err(ModelError::snapshot(format!("layer {orphan} has no vertex")));
        }
        Ok(())
    }
}
