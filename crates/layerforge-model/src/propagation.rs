//! Propagation: pushing upstream field values along edges.
//!
//! One pass visits vertices in topological layers and, for each outgoing
//! edge, offers the source port's field value to the target port's field:
//!
//! 1. Equal to what the target already holds: the edge is consistent.
//! 2. Rejected by the target field's wrapper: inconsistent.
//! 3. Otherwise a clone of the target layer takes the value and updates.
//!    If that fails the edge is inconsistent and the live layer is
//!    untouched; if it succeeds the clone replaces the live layer and the
//!    edge is consistent.
//!
//! The pass is single-shot, not a fixpoint: a vertex is never revisited
//! after a later vertex changes. Because vertices are visited upstream
//! first, one pass reaches a stable state for an acyclic graph.

use indexmap::IndexMap;
use layerforge_core::{Consistency, Edge, EdgeId, Graph, Value, VertexId};
use layerforge_layers::Layer;
use serde::Serialize;
use tracing::{debug, trace};

/// Totals from one propagation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PropagationReport {
    /// Vertices visited.
    pub vertices: usize,
    pub consistent: usize,
    pub inconsistent: usize,
}

/// Runs one propagation pass over every edge.
pub(crate) fn propagate(
    graph: &mut Graph,
    layers: &mut IndexMap<VertexId, Layer>,
) -> PropagationReport {
    let order = graph.topological_order();
    let mut report = PropagationReport {
        vertices: order.len(),
        ..PropagationReport::default()
    };

    for vertex_id in &order {
        let outgoing: Vec<EdgeId> = graph.edges_out_of(vertex_id.as_str()).cloned().collect();
        for edge_id in outgoing {
            let Some(edge) = graph.edge(edge_id.as_str()) else {
                continue;
            };
            let consistency = evaluate_edge(graph, layers, edge);
            trace!(edge = %edge_id, ?consistency, "edge evaluated");

            match consistency {
                Consistency::Consistent => report.consistent += 1,
                _ => report.inconsistent += 1,
            }
            if let Some(edge) = graph.edge_mut(edge_id.as_str()) {
                edge.set_consistency(consistency);
            }
        }
    }

    debug!(
        vertices = report.vertices,
        consistent = report.consistent,
        inconsistent = report.inconsistent,
        "propagation finished"
    );
    report
}

/// Evaluates one edge, committing the target layer when the value is
/// accepted.
fn evaluate_edge(graph: &Graph, layers: &mut IndexMap<VertexId, Layer>, edge: &Edge) -> Consistency {
    let Some((value, target_field)) = resolve_edge(
        graph,
        layers,
        edge.source_vertex_id(),
        edge.source_port_id(),
        edge.target_vertex_id(),
        edge.target_port_id(),
    ) else {
        return Consistency::Inconsistent;
    };

    let Some(target) = layers.get_mut(edge.target_vertex_id()) else {
        return Consistency::Inconsistent;
    };
    match offer_value(target, &target_field, &value) {
        Ok(Some(updated)) => {
            *target = updated;
            Consistency::Consistent
        }
        Ok(None) => Consistency::Consistent,
        Err(reason) => {
            trace!(target_vertex = %edge.target_vertex_id(), %reason, "value rejected");
            Consistency::Inconsistent
        }
    }
}

/// Looks up the value an edge would carry and the field it would land in.
fn resolve_edge(
    graph: &Graph,
    layers: &IndexMap<VertexId, Layer>,
    source: &VertexId,
    source_port: &str,
    target: &VertexId,
    target_port: &str,
) -> Option<(Value, String)> {
    let source_field = graph.vertex(source.as_str())?.port(source_port)?.field_name();
    let target_field = graph.vertex(target.as_str())?.port(target_port)?.field_name();
    let value = layers.get(source)?.field(source_field).ok()?.get();
    Some((value, target_field.to_string()))
}

/// Offers `value` to `field` of `target` without modifying it.
///
/// `Ok(None)`: the field already holds the value. `Ok(Some(layer))`: the
/// updated replacement layer. `Err(reason)`: the value is rejected by the
/// field or by the layer's update.
fn offer_value(target: &Layer, field: &str, value: &Value) -> Result<Option<Layer>, String> {
    let wrapper = target.field(field).map_err(|e| e.to_string())?;
    if wrapper.compare(value) {
        return Ok(None);
    }
    wrapper
        .validate(value)
        .map_err(|e| format!("Source value not compatible with target port: {e}"))?;

    let mut candidate = target.clone();
    candidate
        .assign_field(field, value)
        .and_then(|()| candidate.update())
        .map_err(|e| e.to_string())?;
    Ok(Some(candidate))
}

/// Checks whether a prospective edge's value would be accepted downstream,
/// without changing anything. Structural checks are the graph's job.
pub(crate) fn check_edge_values(
    graph: &Graph,
    layers: &IndexMap<VertexId, Layer>,
    source: &VertexId,
    source_port: &str,
    target: &VertexId,
    target_port: &str,
) -> Result<(), String> {
    let (value, target_field) =
        resolve_edge(graph, layers, source, source_port, target, target_port)
            .ok_or_else(|| "Source or target port does not exist".to_string())?;
    let target_layer = layers
        .get(target)
        .ok_or_else(|| "Target vertex does not exist".to_string())?;
    offer_value(target_layer, &target_field, &value).map(drop)
}
