//! Wire form of a whole graph, as sent to editor clients.
//!
//! ```json
//! {
//!   "vertices": { "<id>": { "label", "geo": { "x", "y" },
//!                           "ports": { "<id>": { "side", "position", "portType" } } } },
//!   "edges": { "<id>": { "consistency", "sourceVertexId", "sourcePortId",
//!                        "targetVertexId", "targetPortId" } }
//! }
//! ```
//!
//! This is a read-only view: it drops the port -> field bindings, so it is
//! not enough to rebuild a graph. Persistence serializes [`Graph`] itself.
//!
//! [`Graph`]: crate::graph::Graph

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::edge::{Consistency, Edge};
use crate::id::{EdgeId, VertexId};
use crate::port::{Port, PortDirection, PortSide};
use crate::vertex::Vertex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub vertices: IndexMap<VertexId, VertexData>,
    pub edges: IndexMap<EdgeId, EdgeData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexData {
    pub label: String,
    pub geo: GeoData,
    pub ports: IndexMap<String, PortData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoData {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortData {
    pub side: PortSide,
    pub position: f64,
    pub port_type: PortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    pub consistency: Consistency,
    pub source_vertex_id: VertexId,
    pub source_port_id: String,
    pub target_vertex_id: VertexId,
    pub target_port_id: String,
}

impl From<&Port> for PortData {
    fn from(port: &Port) -> Self {
        PortData {
            side: port.side(),
            position: port.position(),
            port_type: port.direction(),
        }
    }
}

impl From<&Vertex> for VertexData {
    fn from(vertex: &Vertex) -> Self {
        VertexData {
            label: vertex.label().to_string(),
            geo: GeoData {
                x: vertex.x(),
                y: vertex.y(),
            },
            ports: vertex
                .ports()
                .iter()
                .map(|(id, port)| (id.clone(), PortData::from(port)))
                .collect(),
        }
    }
}

impl From<&Edge> for EdgeData {
    fn from(edge: &Edge) -> Self {
        EdgeData {
            consistency: edge.consistency(),
            source_vertex_id: edge.source_vertex_id().clone(),
            source_port_id: edge.source_port_id().to_string(),
            target_vertex_id: edge.target_vertex_id().clone(),
            target_port_id: edge.target_port_id().to_string(),
        }
    }
}
