//! Info requests: queries answered without changing the model.
//!
//! Each request has its own response struct. [`InfoResponse`] serializes
//! untagged, so the client sees exactly the response struct's fields.

use indexmap::IndexMap;
use layerforge_core::{EdgeData, EdgeId, GraphData, VertexId};
use layerforge_layers::AvailableLayer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InfoRequest {
    /// Would this edge be accepted, and would its value propagate?
    ValidateEdge {
        edge_id: EdgeId,
        source_vertex_id: VertexId,
        source_port_id: String,
        target_vertex_id: VertexId,
        target_port_id: String,
    },
    EdgesBetweenVertices { vertex_ids: Vec<VertexId> },
    GetPortInfo { vertex_id: VertexId, port_id: String },
    GetLayerInfo { layer_id: VertexId },
    ValidateValue {
        layer_id: VertexId,
        value_id: String,
        new_value: String,
    },
    CompareValue {
        layer_id: VertexId,
        value_id: String,
        compare_value: String,
    },
    ValidateLayerFields {
        layer_id: VertexId,
        field_values: IndexMap<String, String>,
    },
    ValueIsReadonly { layer_id: VertexId, value_id: String },
    GetUniqueEdgeIds { count: usize },
    GetUniqueVertexIds { count: usize },
    GetGraphData,
    GetListOfLayers,
}

/// Why a layer-scoped request could not be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestError {
    LayerNonexistent,
    FieldNonexistent,
}

/// Why a field cannot be edited directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadonlyReason {
    /// An incoming edge feeds the field.
    PortIsOccupied,
    /// The layer computes the field.
    ValueIsNotModifiable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InfoResponse {
    ValidateEdge(ValidateEdgeResponse),
    EdgesBetweenVertices(EdgesBetweenVerticesResponse),
    PortInfo(PortInfoResponse),
    LayerInfo(LayerInfoResponse),
    ValidateValue(ValidateValueResponse),
    CompareValue(CompareValueResponse),
    ValidateLayerFields(ValidateLayerFieldsResponse),
    ValueIsReadonly(ValueIsReadonlyResponse),
    UniqueIds(UniqueIdsResponse),
    GraphData(GraphDataResponse),
    ListOfLayers(ListOfLayersResponse),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateEdgeResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgesBetweenVerticesResponse {
    pub vertices_exist: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<IndexMap<EdgeId, EdgeData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_vertices: Option<Vec<VertexId>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortInfoResponse {
    pub could_find_port: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortSummary {
    /// The layer field the port is bound to.
    pub value_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
    pub value: String,
    /// Computed by the layer, or fed by an incoming edge.
    pub field_is_readonly: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInfoResponse {
    pub layer_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports: Option<IndexMap<String, PortSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<IndexMap<String, FieldSummary>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateValueResponse {
    pub request_error: Option<RequestError>,
    /// `None` when the value is valid or the request failed.
    pub field_validation_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareValueResponse {
    pub request_error: Option<RequestError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_equal: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateLayerFieldsResponse {
    pub request_error: Option<RequestError>,
    /// The offending field when `request_error` is `field_nonexistent`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueIsReadonlyResponse {
    pub request_error: Option<RequestError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_readonly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReadonlyReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniqueIdsResponse {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphDataResponse {
    pub data: GraphData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListOfLayersResponse {
    pub layers: Vec<AvailableLayer>,
}
