//! Mutation requests and their outcomes.
//!
//! A request that fails validation is ignored as a whole: the model is left
//! untouched and the outcome carries the reason.

use indexmap::IndexMap;
use layerforge_core::{EdgeId, VertexId};
use serde::{Deserialize, Serialize};

/// A single model edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ChangeRequest {
    /// Reposition a vertex. No propagation.
    MoveVertex { vertex_id: VertexId, x: f64, y: f64 },
    /// Deep-copy a vertex and its layer under a caller-chosen id.
    CloneVertex {
        source_vertex_id: VertexId,
        new_vertex_id: VertexId,
        x: f64,
        y: f64,
    },
    /// Connect an output port to an input port, then propagate.
    CreateEdge {
        new_edge_id: EdgeId,
        source_vertex_id: VertexId,
        source_port_id: String,
        target_vertex_id: VertexId,
        target_port_id: String,
    },
    /// Remove a vertex, its layer and every edge touching it.
    DeleteVertex { vertex_id: VertexId },
    DeleteEdge { edge_id: EdgeId },
    /// Set user-editable fields from text, then update and propagate.
    SetLayerFields {
        layer_id: VertexId,
        field_values: IndexMap<String, String>,
    },
    /// Place a new layer of the named kind under a caller-chosen id.
    CreateLayer {
        new_layer_id: VertexId,
        layer_type: String,
        x: f64,
        y: f64,
    },
}

impl ChangeRequest {
    /// The wire name of the request type.
    pub fn name(&self) -> &'static str {
        match self {
            ChangeRequest::MoveVertex { .. } => "moveVertex",
            ChangeRequest::CloneVertex { .. } => "cloneVertex",
            ChangeRequest::CreateEdge { .. } => "createEdge",
            ChangeRequest::DeleteVertex { .. } => "deleteVertex",
            ChangeRequest::DeleteEdge { .. } => "deleteEdge",
            ChangeRequest::SetLayerFields { .. } => "setLayerFields",
            ChangeRequest::CreateLayer { .. } => "createLayer",
        }
    }
}

/// What happened to a [`ChangeRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ChangeOutcome {
    Applied,
    /// Rejected without side effects.
    Ignored { reason: String },
}

impl ChangeOutcome {
    pub fn ignored(reason: impl Into<String>) -> Self {
        ChangeOutcome::Ignored {
            reason: reason.into(),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, ChangeOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_use_editor_field_names() {
        let req: ChangeRequest = serde_json::from_str(
            r#"{"type":"createEdge","newEdgeId":"e1","sourceVertexId":"1",
                "sourcePortId":"output_shape_port","targetVertexId":"2",
                "targetPortId":"input_shape_port"}"#,
        )
        .unwrap();
        assert_eq!(req.name(), "createEdge");
        assert!(matches!(req, ChangeRequest::CreateEdge { ref new_edge_id, .. } if new_edge_id.as_str() == "e1"));
    }

    #[test]
    fn set_layer_fields_keeps_field_order() {
        let req: ChangeRequest = serde_json::from_str(
            r#"{"type":"setLayerFields","layerId":"7",
                "fieldValues":{"units":"10","activation":"relu"}}"#,
        )
        .unwrap();
        let ChangeRequest::SetLayerFields { field_values, .. } = req else {
            panic!("wrong variant");
        };
        assert_eq!(field_values.keys().collect::<Vec<_>>(), vec!["units", "activation"]);
    }

    #[test]
    fn outcome_wire_shape() {
        insta::assert_json_snapshot!(ChangeOutcome::ignored("vertex 9 does not exist"), @r###"
        {
          "outcome": "ignored",
          "reason": "vertex 9 does not exist"
        }
        "###);
    }
}
