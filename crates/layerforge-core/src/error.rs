//! Core error types for layerforge-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! value-wrapper domain checks and every structural rule the graph enforces.
//! The `Display` text of each variant is the human-readable reason surfaced
//! to editor clients, so keep it short and specific.

use thiserror::Error;

use crate::id::{EdgeId, VertexId};

/// Core errors produced by the layerforge-core crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A value failed a wrapper's domain constraints.
    #[error("{reason}")]
    InvalidValue { reason: String },

    /// Text could not be parsed into the wrapper's value kind.
    #[error("{reason}")]
    Parse { reason: String },

    /// A vertex with this id is already registered.
    #[error("a vertex with the id {id} already exists")]
    DuplicateVertex { id: VertexId },

    /// An edge with this id is already registered.
    #[error("an edge with the id {id} already exists")]
    DuplicateEdge { id: EdgeId },

    /// A vertex id was not found in the graph.
    #[error("vertex with id {id} does not exist")]
    VertexNotFound { id: VertexId },

    /// An edge id was not found in the graph.
    #[error("edge with id {id} does not exist")]
    EdgeNotFound { id: EdgeId },

    /// A port id was not found on the given vertex.
    #[error("port with id {port} does not exist on vertex {vertex}")]
    PortNotFound { vertex: VertexId, port: String },

    /// The source end of an edge must be an output port.
    #[error("source port {port} on vertex {vertex} is not an output port")]
    NotAnOutputPort { vertex: VertexId, port: String },

    /// The target end of an edge must be an input port.
    #[error("target port {port} on vertex {vertex} is not an input port")]
    NotAnInputPort { vertex: VertexId, port: String },

    /// Adding the edge would close a loop.
    #[error("loop detected: vertex {to} already feeds vertex {from}")]
    CycleDetected { from: VertexId, to: VertexId },
}

impl CoreError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        CoreError::InvalidValue {
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        CoreError::Parse {
            reason: reason.into(),
        }
    }

    /// Returns `true` for value-domain failures (`InvalidValue`, `Parse`).
    pub fn is_value_error(&self) -> bool {
        matches!(self, CoreError::InvalidValue { .. } | CoreError::Parse { .. })
    }

    /// Returns `true` for graph-structure failures: duplicate ids, missing
    /// vertices or ports, wrong port direction, cycles.
    pub fn is_structural(&self) -> bool {
        !self.is_value_error()
    }
}
