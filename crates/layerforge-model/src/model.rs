//! Model: the graph, the layer behind each vertex, and the request surface.
//!
//! All editing goes through [`Model::request_change`], all queries through
//! [`Model::info`]. Mutations that change values (new edges, field edits)
//! are validated on a cloned layer first and followed by a propagation pass;
//! purely structural ones (moves, clones, deletes) are not propagated.

use indexmap::{IndexMap, IndexSet};
use layerforge_core::{
    CoreError, EdgeData, EdgeId, Graph, GraphData, IdNamespace, Port, PortDirection, PortSide,
    Vertex, VertexId,
};
use layerforge_layers::{available_layers, Layer, LayerError, LayerKind};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::propagation::{self, PropagationReport};
use crate::schema::info::{
    CompareValueResponse, EdgesBetweenVerticesResponse, FieldSummary, GraphDataResponse,
    InfoRequest, InfoResponse, LayerInfoResponse, ListOfLayersResponse, PortInfoResponse,
    PortSummary, ReadonlyReason, RequestError, UniqueIdsResponse, ValidateEdgeResponse,
    ValidateLayerFieldsResponse, ValidateValueResponse, ValueIsReadonlyResponse,
};
use crate::schema::mutations::{ChangeOutcome, ChangeRequest};
use crate::snapshot::ModelSnapshot;

/// An editable layer graph.
#[derive(Debug, Clone)]
pub struct Model {
    graph: Graph,
    /// One layer per vertex, keyed by vertex id.
    layers: IndexMap<VertexId, Layer>,
    rng: ChaCha8Rng,
    config: ModelConfig,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// An empty model with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    pub fn with_config(config: ModelConfig) -> Self {
        Model {
            graph: Graph::new(),
            layers: IndexMap::new(),
            rng: config.rng(),
            config,
        }
    }

    /// Rebuilds a model from a snapshot after checking that its vertices and
    /// layers agree. Stored edge consistency flags are kept as they are.
    pub fn from_snapshot(snapshot: ModelSnapshot, config: ModelConfig) -> Result<Self, ModelError> {
        snapshot.check()?;
        Ok(Model {
            graph: snapshot.graph,
            layers: snapshot.layers,
            rng: config.rng(),
            config,
        })
    }

    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            graph: self.graph.clone(),
            layers: self.layers.clone(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.get(id)
    }

    pub fn layers(&self) -> impl Iterator<Item = (&VertexId, &Layer)> {
        self.layers.iter()
    }

    pub fn graph_data(&self) -> GraphData {
        self.graph.to_data()
    }

    /// Generates `count` fresh ids for `namespace` using the model's rng.
    pub fn generate_ids(&mut self, count: usize, namespace: IdNamespace) -> Vec<String> {
        self.graph.generate_unique_ids_in_range(
            count,
            namespace,
            &mut self.rng,
            self.config.initial_id_range,
        )
    }

    /// Places a new layer under a generated id and returns that id.
    pub fn add_layer(&mut self, kind: LayerKind, x: f64, y: f64) -> Result<VertexId, ModelError> {
        let id = VertexId::from(self.graph.generate_unique_id(
            IdNamespace::Vertices,
            &mut self.rng,
            self.config.initial_id_range,
        ));
        self.insert_layer(id.clone(), kind, x, y)?;
        Ok(id)
    }

    /// Builds a layer and its vertex. Input ports go on the top side and
    /// output ports on the bottom, spaced evenly.
    fn insert_layer(&mut self, id: VertexId, kind: LayerKind, x: f64, y: f64) -> Result<(), ModelError> {
        if self.graph.has_vertex(id.as_str()) {
            return Err(CoreError::DuplicateVertex { id }.into());
        }
        let layer = Layer::new(kind)?;

        let inputs = layer.input_ports().count();
        let outputs = layer.output_ports().count();
        let mut ports = IndexMap::new();
        for (i, (port, field)) in layer.input_ports().enumerate() {
            let position = (i + 1) as f64 / (inputs + 1) as f64;
            ports.insert(
                port.to_string(),
                Port::new(PortSide::Top, position, PortDirection::Input, field),
            );
        }
        for (i, (port, field)) in layer.output_ports().enumerate() {
            let position = (i + 1) as f64 / (outputs + 1) as f64;
            ports.insert(
                port.to_string(),
                Port::new(PortSide::Bottom, position, PortDirection::Output, field),
            );
        }

        self.graph
            .add_vertex(id.clone(), Vertex::new(kind.name(), x, y, ports))?;
        self.layers.insert(id, layer);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Applies one request. Rejected requests leave the model untouched.
    pub fn request_change(&mut self, request: &ChangeRequest) -> ChangeOutcome {
        match self.apply_change(request) {
            Ok(()) => ChangeOutcome::Applied,
            Err(err) => {
                debug!(request = request.name(), reason = %err, "request ignored");
                ChangeOutcome::ignored(err.to_string())
            }
        }
    }

    /// Applies requests in order. Each is independent: an ignored request
    /// does not stop the ones after it.
    pub fn request_changes(&mut self, requests: &[ChangeRequest]) -> Vec<ChangeOutcome> {
        requests.iter().map(|r| self.request_change(r)).collect()
    }

    fn apply_change(&mut self, request: &ChangeRequest) -> Result<(), ModelError> {
        match request {
            ChangeRequest::MoveVertex { vertex_id, x, y } => {
                let vertex = self
                    .graph
                    .vertex_mut(vertex_id.as_str())
                    .ok_or_else(|| CoreError::VertexNotFound { id: vertex_id.clone() })?;
                vertex.set_position(*x, *y);
            }
            ChangeRequest::CloneVertex {
                source_vertex_id,
                new_vertex_id,
                x,
                y,
            } => {
                if self.graph.has_vertex(new_vertex_id.as_str()) {
                    return Err(CoreError::DuplicateVertex {
                        id: new_vertex_id.clone(),
                    }
                    .into());
                }
                let mut vertex = self
                    .graph
                    .vertex(source_vertex_id.as_str())
                    .cloned()
                    .ok_or_else(|| CoreError::VertexNotFound {
                        id: source_vertex_id.clone(),
                    })?;
                let layer = self.live_layer(source_vertex_id)?.clone();
                vertex.set_position(*x, *y);
                self.graph.add_vertex(new_vertex_id.clone(), vertex)?;
                self.layers.insert(new_vertex_id.clone(), layer);
            }
            ChangeRequest::CreateEdge {
                new_edge_id,
                source_vertex_id,
                source_port_id,
                target_vertex_id,
                target_port_id,
            } => {
                self.graph.validate_edge(
                    new_edge_id,
                    source_vertex_id,
                    source_port_id,
                    target_vertex_id,
                    target_port_id,
                )?;
                self.graph.create_edge(
                    new_edge_id.clone(),
                    source_vertex_id.clone(),
                    source_port_id.as_str(),
                    target_vertex_id.clone(),
                    target_port_id.as_str(),
                );
                self.propagate();
            }
            ChangeRequest::DeleteVertex { vertex_id } => {
                self.graph
                    .delete_vertex(vertex_id.as_str())
                    .ok_or_else(|| CoreError::VertexNotFound { id: vertex_id.clone() })?;
                self.layers.shift_remove(vertex_id);
            }
            ChangeRequest::DeleteEdge { edge_id } => {
                self.graph
                    .delete_edge(edge_id.as_str())
                    .ok_or_else(|| CoreError::EdgeNotFound { id: edge_id.clone() })?;
            }
            ChangeRequest::SetLayerFields {
                layer_id,
                field_values,
            } => {
                let updated = self.layer_with_fields(layer_id, field_values)?;
                self.layers.insert(layer_id.clone(), updated);
                self.propagate();
            }
            ChangeRequest::CreateLayer {
                new_layer_id,
                layer_type,
                x,
                y,
            } => {
                let kind = LayerKind::from_name(layer_type)?;
                self.insert_layer(new_layer_id.clone(), kind, *x, *y)?;
            }
        }
        Ok(())
    }

    /// A copy of the layer with `field_values` applied and updated.
    fn layer_with_fields(
        &self,
        layer_id: &VertexId,
        field_values: &IndexMap<String, String>,
    ) -> Result<Layer, ModelError> {
        let mut candidate = self.live_layer(layer_id)?.clone();
        for (field, text) in field_values {
            candidate
                .set_field_from_str(field, text)
                .map_err(|source| ModelError::InvalidField {
                    field: field.clone(),
                    source,
                })?;
        }
        candidate.update()?;
        Ok(candidate)
    }

    fn live_layer(&self, id: &VertexId) -> Result<&Layer, ModelError> {
        self.layers
            .get(id)
            .ok_or_else(|| ModelError::UnknownLayer { id: id.clone() })
    }

    /// Runs one propagation pass and records each edge's consistency.
    pub fn propagate(&mut self) -> PropagationReport {
        propagation::propagate(&mut self.graph, &mut self.layers)
    }

    /// Fields of `id`'s layer currently fed by an incoming edge.
    fn occupied_fields(&self, id: &VertexId) -> IndexSet<String> {
        let Some(layer) = self.layers.get(id) else {
            return IndexSet::new();
        };
        self.graph
            .edges_into(id.as_str())
            .filter_map(|edge_id| self.graph.edge(edge_id.as_str()))
            .filter_map(|edge| layer.field_name_of_port(edge.target_port_id()).ok())
            .map(str::to_string)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Info requests
    // -----------------------------------------------------------------------

    /// Answers a query. Only `getUnique*Ids` touches state, by advancing the
    /// id rng.
    pub fn info(&mut self, request: &InfoRequest) -> InfoResponse {
        match request {
            InfoRequest::ValidateEdge {
                edge_id,
                source_vertex_id,
                source_port_id,
                target_vertex_id,
                target_port_id,
            } => InfoResponse::ValidateEdge(self.validate_edge(
                edge_id,
                source_vertex_id,
                source_port_id,
                target_vertex_id,
                target_port_id,
            )),
            InfoRequest::EdgesBetweenVertices { vertex_ids } => {
                InfoResponse::EdgesBetweenVertices(self.edges_between(vertex_ids))
            }
            InfoRequest::GetPortInfo { vertex_id, port_id } => {
                InfoResponse::PortInfo(self.port_info(vertex_id, port_id))
            }
            InfoRequest::GetLayerInfo { layer_id } => {
                InfoResponse::LayerInfo(self.layer_info(layer_id))
            }
            InfoRequest::ValidateValue {
                layer_id,
                value_id,
                new_value,
            } => InfoResponse::ValidateValue(self.validate_value(layer_id, value_id, new_value)),
            InfoRequest::CompareValue {
                layer_id,
                value_id,
                compare_value,
            } => InfoResponse::CompareValue(self.compare_value(layer_id, value_id, compare_value)),
            InfoRequest::ValidateLayerFields {
                layer_id,
                field_values,
            } => InfoResponse::ValidateLayerFields(self.validate_layer_fields(layer_id, field_values)),
            InfoRequest::ValueIsReadonly { layer_id, value_id } => {
                InfoResponse::ValueIsReadonly(self.value_is_readonly(layer_id, value_id))
            }
            InfoRequest::GetUniqueEdgeIds { count } => InfoResponse::UniqueIds(UniqueIdsResponse {
                ids: self.generate_ids(*count, IdNamespace::Edges),
            }),
            InfoRequest::GetUniqueVertexIds { count } => {
                InfoResponse::UniqueIds(UniqueIdsResponse {
                    ids: self.generate_ids(*count, IdNamespace::Vertices),
                })
            }
            InfoRequest::GetGraphData => InfoResponse::GraphData(GraphDataResponse {
                data: self.graph_data(),
            }),
            InfoRequest::GetListOfLayers => InfoResponse::ListOfLayers(ListOfLayersResponse {
                layers: available_layers(),
            }),
        }
    }

    fn validate_edge(
        &self,
        edge_id: &EdgeId,
        source: &VertexId,
        source_port: &str,
        target: &VertexId,
        target_port: &str,
    ) -> ValidateEdgeResponse {
        let checked = self
            .graph
            .validate_edge(edge_id, source, source_port, target, target_port)
            .map_err(|e| e.to_string())
            .and_then(|()| {
                propagation::check_edge_values(
                    &self.graph,
                    &self.layers,
                    source,
                    source_port,
                    target,
                    target_port,
                )
            });
        ValidateEdgeResponse {
            valid: checked.is_ok(),
            problem: checked.err(),
        }
    }

    fn edges_between(&self, vertex_ids: &[VertexId]) -> EdgesBetweenVerticesResponse {
        let missing: Vec<VertexId> = vertex_ids
            .iter()
            .filter(|id| !self.graph.has_vertex(id.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return EdgesBetweenVerticesResponse {
                vertices_exist: false,
                edges: None,
                missing_vertices: Some(missing),
            };
        }

        let edges = self
            .graph
            .edges_between(vertex_ids)
            .into_iter()
            .filter_map(|id| {
                let data = self.graph.edge(id.as_str()).map(EdgeData::from)?;
                Some((id, data))
            })
            .collect();
        EdgesBetweenVerticesResponse {
            vertices_exist: true,
            edges: Some(edges),
            missing_vertices: None,
        }
    }

    fn port_info(&self, vertex_id: &VertexId, port_id: &str) -> PortInfoResponse {
        let value = self
            .graph
            .vertex(vertex_id.as_str())
            .and_then(|vertex| vertex.port(port_id))
            .and_then(|port| {
                self.layers
                    .get(vertex_id)?
                    .field_string(port.field_name())
                    .ok()
            });
        PortInfoResponse {
            could_find_port: value.is_some(),
            port_value: value,
        }
    }

    fn layer_info(&self, layer_id: &VertexId) -> LayerInfoResponse {
        let (Some(layer), Some(vertex)) = (
            self.layers.get(layer_id),
            self.graph.vertex(layer_id.as_str()),
        ) else {
            return LayerInfoResponse {
                layer_exists: false,
                ports: None,
                fields: None,
            };
        };

        let ports = vertex
            .ports()
            .iter()
            .map(|(id, port)| {
                (
                    id.clone(),
                    PortSummary {
                        value_name: port.field_name().to_string(),
                    },
                )
            })
            .collect();

        let occupied = self.occupied_fields(layer_id);
        let fields = layer
            .field_names()
            .filter_map(|name| {
                let value = layer.field_string(name).ok()?;
                let summary = FieldSummary {
                    value,
                    field_is_readonly: layer.is_read_only(name) || occupied.contains(name),
                };
                Some((name.to_string(), summary))
            })
            .collect();

        LayerInfoResponse {
            layer_exists: true,
            ports: Some(ports),
            fields: Some(fields),
        }
    }

    /// Resolves a layer-scoped request target, or the request error.
    fn layer_field(&self, layer_id: &VertexId, field: &str) -> Result<&Layer, RequestError> {
        let layer = self
            .layers
            .get(layer_id)
            .ok_or(RequestError::LayerNonexistent)?;
        if !layer.has_field(field) {
            return Err(RequestError::FieldNonexistent);
        }
        Ok(layer)
    }

    fn validate_value(&self, layer_id: &VertexId, field: &str, text: &str) -> ValidateValueResponse {
        match self.layer_field(layer_id, field) {
            Ok(layer) => ValidateValueResponse {
                request_error: None,
                field_validation_error: layer.validate_field_str(field, text).err().map(|e| e.to_string()),
            },
            Err(err) => ValidateValueResponse {
                request_error: Some(err),
                field_validation_error: None,
            },
        }
    }

    /// Text that does not parse as the field's kind compares unequal.
    fn compare_value(&self, layer_id: &VertexId, field: &str, text: &str) -> CompareValueResponse {
        match self.layer_field(layer_id, field) {
            Ok(layer) => {
                let is_equal = layer
                    .field(field)
                    .ok()
                    .and_then(|wrapper| wrapper.parse(text).ok().map(|v| wrapper.compare(&v)))
                    .unwrap_or(false);
                CompareValueResponse {
                    request_error: None,
                    is_equal: Some(is_equal),
                }
            }
            Err(err) => CompareValueResponse {
                request_error: Some(err),
                is_equal: None,
            },
        }
    }

    /// Dry run of `setLayerFields`. Every field is checked so the client sees
    /// all problems at once; the update only runs when all fields pass.
    fn validate_layer_fields(
        &self,
        layer_id: &VertexId,
        field_values: &IndexMap<String, String>,
    ) -> ValidateLayerFieldsResponse {
        let mut response = ValidateLayerFieldsResponse {
            request_error: None,
            field_name: None,
            errors: Vec::new(),
            warnings: Vec::new(),
        };
        let Some(layer) = self.layers.get(layer_id) else {
            response.request_error = Some(RequestError::LayerNonexistent);
            return response;
        };
        if let Some(unknown) = field_values.keys().find(|f| !layer.has_field(f)) {
            response.request_error = Some(RequestError::FieldNonexistent);
            response.field_name = Some(unknown.clone());
            return response;
        }

        let occupied = self.occupied_fields(layer_id);
        let mut candidate = layer.clone();
        for (field, text) in field_values {
            if occupied.contains(field) {
                response.warnings.push(format!(
                    "{field}: fed by an incoming edge, propagation will overwrite it"
                ));
            }
            match candidate.set_field_from_str(field, text) {
                Ok(()) => {}
                Err(LayerError::ReadOnlyField { .. }) => {
                    response.errors.push(format!("{field}: computed by the layer, not editable"));
                }
                Err(err) => response.errors.push(format!("{field}: {err}")),
            }
        }

        if response.errors.is_empty() {
            if let Err(err) = candidate.update() {
                response.errors.push(err.to_string());
            }
        }
        response
    }

    fn value_is_readonly(&self, layer_id: &VertexId, field: &str) -> ValueIsReadonlyResponse {
        let layer = match self.layer_field(layer_id, field) {
            Ok(layer) => layer,
            Err(err) => {
                return ValueIsReadonlyResponse {
                    request_error: Some(err),
                    is_readonly: None,
                    reason: None,
                }
            }
        };
        let reason = if layer.is_read_only(field) {
            Some(ReadonlyReason::ValueIsNotModifiable)
        } else if self.occupied_fields(layer_id).contains(field) {
            Some(ReadonlyReason::PortIsOccupied)
        } else {
            None
        };
        ValueIsReadonlyResponse {
            request_error: None,
            is_readonly: Some(reason.is_some()),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use layerforge_core::Consistency;

    use super::*;

    fn model() -> Model {
        Model::with_config(ModelConfig::seeded(7))
    }

    fn create_layer(model: &mut Model, id: &str, kind: &str) {
        let outcome = model.request_change(&ChangeRequest::CreateLayer {
            new_layer_id: id.into(),
            layer_type: kind.into(),
            x: 0.0,
            y: 0.0,
        });
        assert!(outcome.is_applied(), "{outcome:?}");
    }

    fn connect(model: &mut Model, edge: &str, from: &str, from_port: &str, to: &str, to_port: &str) -> ChangeOutcome {
        model.request_change(&ChangeRequest::CreateEdge {
            new_edge_id: edge.into(),
            source_vertex_id: from.into(),
            source_port_id: from_port.into(),
            target_vertex_id: to.into(),
            target_port_id: to_port.into(),
        })
    }

    fn set_fields(model: &mut Model, layer: &str, fields: &[(&str, &str)]) -> ChangeOutcome {
        model.request_change(&ChangeRequest::SetLayerFields {
            layer_id: layer.into(),
            field_values: fields
                .iter()
                .map(|(f, v)| (f.to_string(), v.to_string()))
                .collect(),
        })
    }

    #[test]
    fn created_layers_get_spaced_ports() {
        let mut model = model();
        create_layer(&mut model, "a", "Add");
        let vertex = model.graph().vertex("a").unwrap();
        assert_eq!(vertex.label(), "Add");
        let first = vertex.port("first_input_shape_port").unwrap();
        let second = vertex.port("second_input_shape_port").unwrap();
        let out = vertex.port("output_shape_port").unwrap();
        assert_eq!((first.side(), first.position()), (PortSide::Top, 1.0 / 3.0));
        assert_eq!((second.side(), second.position()), (PortSide::Top, 2.0 / 3.0));
        assert_eq!((out.side(), out.position()), (PortSide::Bottom, 0.5));
    }

    #[test]
    fn create_layer_rejects_unknown_kinds_and_taken_ids() {
        let mut model = model();
        create_layer(&mut model, "a", "Input");
        let taken = model.request_change(&ChangeRequest::CreateLayer {
            new_layer_id: "a".into(),
            layer_type: "Dense".into(),
            x: 0.0,
            y: 0.0,
        });
        assert!(!taken.is_applied());
        let unknown = model.request_change(&ChangeRequest::CreateLayer {
            new_layer_id: "b".into(),
            layer_type: "LSTM".into(),
            x: 0.0,
            y: 0.0,
        });
        assert_eq!(unknown, ChangeOutcome::ignored("unknown layer type LSTM"));
        assert_eq!(model.graph().vertex_count(), 1);
    }

    #[test]
    fn add_layer_generates_an_id() {
        let mut model = model();
        let id = model.add_layer(LayerKind::Dense, 5.0, 6.0).unwrap();
        assert!(model.layer(id.as_str()).is_some());
        assert_eq!(model.graph().vertex(id.as_str()).unwrap().x(), 5.0);
    }

    #[test]
    fn move_and_clone_vertex() {
        let mut model = model();
        create_layer(&mut model, "a", "Dense");
        set_fields(&mut model, "a", &[("units", "7")]);

        let moved = model.request_change(&ChangeRequest::MoveVertex {
            vertex_id: "a".into(),
            x: 3.0,
            y: 4.0,
        });
        assert!(moved.is_applied());

        let cloned = model.request_change(&ChangeRequest::CloneVertex {
            source_vertex_id: "a".into(),
            new_vertex_id: "b".into(),
            x: 10.0,
            y: 20.0,
        });
        assert!(cloned.is_applied());
        assert_eq!(model.layer("b").unwrap().field_string("units").unwrap(), "7");
        assert_eq!(model.graph().vertex("a").unwrap().x(), 3.0);
        assert_eq!(model.graph().vertex("b").unwrap().y(), 20.0);

        // the clone is independent
        set_fields(&mut model, "b", &[("units", "9")]);
        assert_eq!(model.layer("a").unwrap().field_string("units").unwrap(), "7");

        let again = model.request_change(&ChangeRequest::CloneVertex {
            source_vertex_id: "a".into(),
            new_vertex_id: "b".into(),
            x: 0.0,
            y: 0.0,
        });
        assert!(!again.is_applied());
    }

    #[test]
    fn unknown_targets_are_ignored() {
        let mut model = model();
        for request in [
            ChangeRequest::MoveVertex { vertex_id: "x".into(), x: 0.0, y: 0.0 },
            ChangeRequest::DeleteVertex { vertex_id: "x".into() },
            ChangeRequest::DeleteEdge { edge_id: "e".into() },
        ] {
            assert!(!model.request_change(&request).is_applied());
        }
        assert_eq!(
            set_fields(&mut model, "x", &[("units", "1")]),
            ChangeOutcome::ignored("layer x does not exist")
        );
    }

    #[test]
    fn set_layer_fields_is_all_or_nothing() {
        let mut model = model();
        create_layer(&mut model, "d", "Dense");
        let outcome = set_fields(&mut model, "d", &[("units", "12"), ("activation", "bogus")]);
        assert!(!outcome.is_applied());
        assert_eq!(model.layer("d").unwrap().field_string("units").unwrap(), "100");

        let read_only = set_fields(&mut model, "d", &[("output_shape", "(3)")]);
        assert_eq!(
            read_only,
            ChangeOutcome::ignored(
                "field \"output_shape\" has an invalid value: field output_shape is read-only"
            )
        );

        assert!(set_fields(&mut model, "d", &[("units", "12")]).is_applied());
        assert_eq!(model.layer("d").unwrap().field_string("output_shape").unwrap(), "(12)");
    }

    #[test]
    fn huge_conv2d_inputs_are_handled_by_set_layer_fields() {
        let mut model = model();
        create_layer(&mut model, "conv", "Conv2D");
        assert!(set_fields(&mut model, "conv", &[("strides", "(2, 2)")]).is_applied());
        let outcome = set_fields(
            &mut model,
            "conv",
            &[("input_shape", "(9223372036854775807, 10, 3)")],
        );
        assert!(outcome.is_applied(), "{outcome:?}");
        assert_eq!(
            model.layer("conv").unwrap().field_string("output_shape").unwrap(),
            "(4611686018427387904, 5, 3)"
        );
    }

    #[test]
    fn field_edits_propagate_downstream() {
        let mut model = model();
        create_layer(&mut model, "in", "Input");
        create_layer(&mut model, "dense", "Dense");
        create_layer(&mut model, "out", "Output");
        set_fields(&mut model, "in", &[("output_shape", "(8, 32)")]);
        assert!(connect(&mut model, "e1", "in", "output_shape_port", "dense", "input_shape_port").is_applied());
        assert!(connect(&mut model, "e2", "dense", "output_shape_port", "out", "input_shape_port").is_applied());
        assert_eq!(model.layer("out").unwrap().field_string("input_shape").unwrap(), "(8, 100)");

        set_fields(&mut model, "dense", &[("units", "16")]);
        assert_eq!(model.layer("out").unwrap().field_string("input_shape").unwrap(), "(8, 16)");
        for (_, edge) in model.graph().edges() {
            assert_eq!(edge.consistency(), Consistency::Consistent);
        }
    }

    #[test]
    fn delete_vertex_drops_its_layer() {
        let mut model = model();
        create_layer(&mut model, "a", "Input");
        create_layer(&mut model, "b", "Output");
        connect(&mut model, "e", "a", "output_shape_port", "b", "input_shape_port");
        assert!(model
            .request_change(&ChangeRequest::DeleteVertex { vertex_id: "a".into() })
            .is_applied());
        assert!(model.layer("a").is_none());
        assert_eq!(model.graph().edge_count(), 0);
        assert!(model.snapshot().check().is_ok());
    }

    #[test]
    fn occupied_fields_are_reported() {
        let mut model = model();
        create_layer(&mut model, "in", "Input");
        create_layer(&mut model, "act", "Activation");
        connect(&mut model, "e", "in", "output_shape_port", "act", "input_shape_port");

        let InfoResponse::LayerInfo(info) = model.info(&InfoRequest::GetLayerInfo { layer_id: "act".into() }) else {
            panic!("wrong response");
        };
        let fields = info.fields.unwrap();
        assert!(fields["input_shape"].field_is_readonly);
        assert!(fields["output_shape"].field_is_readonly);
        assert!(!fields["activation"].field_is_readonly);
        assert_eq!(info.ports.unwrap()["input_shape_port"].value_name, "input_shape");

        let InfoResponse::ValueIsReadonly(ro) = model.info(&InfoRequest::ValueIsReadonly {
            layer_id: "act".into(),
            value_id: "input_shape".into(),
        }) else {
            panic!("wrong response");
        };
        assert_eq!(ro.reason, Some(ReadonlyReason::PortIsOccupied));

        let InfoResponse::ValidateLayerFields(checked) = model.info(&InfoRequest::ValidateLayerFields {
            layer_id: "act".into(),
            field_values: [("input_shape".to_string(), "(1, 2)".to_string())].into_iter().collect(),
        }) else {
            panic!("wrong response");
        };
        assert!(checked.errors.is_empty());
        assert_eq!(checked.warnings.len(), 1);
    }

    #[test]
    fn validate_layer_fields_collects_every_error() {
        let mut model = model();
        create_layer(&mut model, "c", "Conv2D");
        let InfoResponse::ValidateLayerFields(checked) = model.info(&InfoRequest::ValidateLayerFields {
            layer_id: "c".into(),
            field_values: [
                ("filters".to_string(), "0".to_string()),
                ("output_shape".to_string(), "(1, 1, 1)".to_string()),
            ]
            .into_iter()
            .collect(),
        }) else {
            panic!("wrong response");
        };
        assert_eq!(
            checked.errors,
            vec![
                "filters: Value must be at least 1".to_string(),
                "output_shape: computed by the layer, not editable".to_string(),
            ]
        );

        let InfoResponse::ValidateLayerFields(missing) = model.info(&InfoRequest::ValidateLayerFields {
            layer_id: "c".into(),
            field_values: [("bias".to_string(), "1".to_string())].into_iter().collect(),
        }) else {
            panic!("wrong response");
        };
        assert_eq!(missing.request_error, Some(RequestError::FieldNonexistent));
        assert_eq!(missing.field_name.as_deref(), Some("bias"));
    }

    #[test]
    fn value_queries() {
        let mut model = model();
        create_layer(&mut model, "r", "Repeat Int");

        let InfoResponse::ValidateValue(ok) = model.info(&InfoRequest::ValidateValue {
            layer_id: "r".into(),
            value_id: "inputInt".into(),
            new_value: "12".into(),
        }) else {
            panic!("wrong response");
        };
        assert_eq!(ok.field_validation_error, None);

        let InfoResponse::ValidateValue(bad) = model.info(&InfoRequest::ValidateValue {
            layer_id: "r".into(),
            value_id: "inputInt".into(),
            new_value: "twelve".into(),
        }) else {
            panic!("wrong response");
        };
        assert_eq!(bad.field_validation_error.as_deref(), Some("Invalid integer \"twelve\""));

        let InfoResponse::CompareValue(same) = model.info(&InfoRequest::CompareValue {
            layer_id: "r".into(),
            value_id: "inputInt".into(),
            compare_value: "0".into(),
        }) else {
            panic!("wrong response");
        };
        assert_eq!(same.is_equal, Some(true));

        let InfoResponse::CompareValue(garbage) = model.info(&InfoRequest::CompareValue {
            layer_id: "r".into(),
            value_id: "inputInt".into(),
            compare_value: "(1)".into(),
        }) else {
            panic!("wrong response");
        };
        assert_eq!(garbage.is_equal, Some(false));

        let InfoResponse::CompareValue(missing) = model.info(&InfoRequest::CompareValue {
            layer_id: "nope".into(),
            value_id: "inputInt".into(),
            compare_value: "0".into(),
        }) else {
            panic!("wrong response");
        };
        assert_eq!(missing.request_error, Some(RequestError::LayerNonexistent));
    }

    #[test]
    fn port_info_and_edges_between() {
        let mut model = model();
        create_layer(&mut model, "a", "Input");
        create_layer(&mut model, "b", "Output");
        connect(&mut model, "e", "a", "output_shape_port", "b", "input_shape_port");

        let InfoResponse::PortInfo(port) = model.info(&InfoRequest::GetPortInfo {
            vertex_id: "b".into(),
            port_id: "input_shape_port".into(),
        }) else {
            panic!("wrong response");
        };
        assert_eq!(port.port_value.as_deref(), Some("(244, 244, 3)"));

        let InfoResponse::PortInfo(none) = model.info(&InfoRequest::GetPortInfo {
            vertex_id: "b".into(),
            port_id: "nope".into(),
        }) else {
            panic!("wrong response");
        };
        assert!(!none.could_find_port);

        let InfoResponse::EdgesBetweenVertices(between) = model.info(&InfoRequest::EdgesBetweenVertices {
            vertex_ids: vec!["a".into(), "b".into()],
        }) else {
            panic!("wrong response");
        };
        assert!(between.vertices_exist);
        assert_eq!(between.edges.unwrap().len(), 1);

        let InfoResponse::EdgesBetweenVertices(missing) = model.info(&InfoRequest::EdgesBetweenVertices {
            vertex_ids: vec!["a".into(), "zz".into()],
        }) else {
            panic!("wrong response");
        };
        assert_eq!(missing.missing_vertices, Some(vec![VertexId::from("zz")]));
    }

    #[test]
    fn seeded_models_generate_the_same_ids() {
        let mut first = model();
        let mut second = model();
        let request = InfoRequest::GetUniqueEdgeIds { count: 4 };
        assert_eq!(first.info(&request), second.info(&request));
    }

    #[test]
    fn layer_listing() {
        let mut model = model();
        let InfoResponse::ListOfLayers(list) = model.info(&InfoRequest::GetListOfLayers) else {
            panic!("wrong response");
        };
        assert_eq!(list.layers.len(), LayerKind::ALL.len());
    }
}
