//! Directed edges between an output port and an input port.
//!
//! Each edge carries a [`Consistency`] flag. The flag is derived state: the
//! model's propagation pass recomputes it, and nothing treats a stored flag
//! as authoritative input.

use serde::{Deserialize, Serialize};

use crate::id::VertexId;

/// Outcome of the last propagation pass over an edge.
///
/// `Unverified -> {Consistent, Inconsistent}`, re-entered on every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Consistency {
    /// Created but not yet evaluated by propagation.
    #[default]
    Unverified,
    /// The target field holds the value the source supplies.
    Consistent,
    /// The source value was rejected by the target field or layer.
    Inconsistent,
}

/// An edge `(source vertex, source port) -> (target vertex, target port)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    source_vertex_id: VertexId,
    source_port_id: String,
    target_vertex_id: VertexId,
    target_port_id: String,
    #[serde(default)]
    consistency: Consistency,
}

impl Edge {
    /// Creates an unverified edge. Structural checks are the graph's job.
    pub fn new(
        source_vertex_id: VertexId,
        source_port_id: impl Into<String>,
        target_vertex_id: VertexId,
        target_port_id: impl Into<String>,
    ) -> Self {
        Edge {
            source_vertex_id,
            source_port_id: source_port_id.into(),
            target_vertex_id,
            target_port_id: target_port_id.into(),
            consistency: Consistency::Unverified,
        }
    }

    pub fn source_vertex_id(&self) -> &VertexId {
        &self.source_vertex_id
    }

    pub fn source_port_id(&self) -> &str {
        &self.source_port_id
    }

    pub fn target_vertex_id(&self) -> &VertexId {
        &self.target_vertex_id
    }

    pub fn target_port_id(&self) -> &str {
        &self.target_port_id
    }

    pub fn consistency(&self) -> Consistency {
        self.consistency
    }

    pub fn set_consistency(&mut self, consistency: Consistency) {
        self.consistency = consistency;
    }

    pub fn is_consistent(&self) -> bool {
        self.consistency == Consistency::Consistent
    }
}
