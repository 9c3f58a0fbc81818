//! Graph: the vertex/edge container and its structural invariants.
//!
//! [`Graph`] owns every vertex and edge plus two reverse indices
//! (edges-by-source and edges-by-target vertex) that are updated on every
//! insert and delete, so adjacency lookups never scan the edge map.
//!
//! # Invariants
//!
//! - Every edge's endpoints reference vertices present in the graph.
//! - The edge set, viewed as a directed graph over vertex ids, is acyclic.
//!   This is enforced by [`Graph::validate_edge`] before insertion, never
//!   repaired afterwards.
//! - Vertex and edge ids are unique within their own namespace.
//!
//! The graph is domain-agnostic: it knows ports and their directions but
//! nothing about the layers behind the vertices.

use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};
use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::{EdgeData, GraphData, VertexData};
use crate::edge::Edge;
use crate::error::CoreError;
use crate::id::{EdgeId, IdNamespace, VertexId};
use crate::vertex::Vertex;

/// Range the first candidate of a generated id is drawn from.
pub const DEFAULT_ID_RANGE: u64 = 1000;

/// The editor graph.
///
/// Serializes as its vertex and edge maps only; deserializing rebuilds the
/// indices and re-validates every edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "GraphParts", into = "GraphParts")]
pub struct Graph {
    vertices: IndexMap<VertexId, Vertex>,
    edges: IndexMap<EdgeId, Edge>,
    /// Outgoing edge ids per vertex.
    edges_by_source: HashMap<VertexId, IndexSet<EdgeId>>,
    /// Incoming edge ids per vertex.
    edges_by_target: HashMap<VertexId, IndexSet<EdgeId>>,
}

#[derive(Serialize, Deserialize)]
struct GraphParts {
    vertices: IndexMap<VertexId, Vertex>,
    edges: IndexMap<EdgeId, Edge>,
}

impl TryFrom<GraphParts> for Graph {
    type Error = CoreError;

    fn try_from(parts: GraphParts) -> Result<Self, Self::Error> {
        Graph::from_parts(parts.vertices, parts.edges)
    }
}

impl From<Graph> for GraphParts {
    fn from(graph: Graph) -> Self {
        GraphParts {
            vertices: graph.vertices,
            edges: graph.edges,
        }
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a graph from stored vertices and edges.
    ///
    /// Every edge goes through [`validate_edge`](Self::validate_edge), so a
    /// graph loaded this way obeys the same invariants as one built by
    /// requests. Stored consistency flags are kept.
    pub fn from_parts(
        vertices: IndexMap<VertexId, Vertex>,
        edges: IndexMap<EdgeId, Edge>,
    ) -> Result<Self, CoreError> {
        let mut graph = Graph::new();
        for (id, vertex) in vertices {
            graph.add_vertex(id, vertex)?;
        }
        for (id, edge) in edges {
            graph.validate_edge(
                &id,
                edge.source_vertex_id(),
                edge.source_port_id(),
                edge.target_vertex_id(),
                edge.target_port_id(),
            )?;
            graph.insert_edge(id, edge);
        }
        Ok(graph)
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_vertex(&self, id: &str) -> bool {
        self.vertices.contains_key(id)
    }

    pub fn has_edge(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    pub fn vertex(&self, id: &str) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn vertex_mut(&mut self, id: &str) -> Option<&mut Vertex> {
        self.vertices.get_mut(id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Mutable access to an edge. Only the consistency flag is mutable on
    /// [`Edge`], so endpoints and indices cannot drift apart.
    pub fn edge_mut(&mut self, id: &str) -> Option<&mut Edge> {
        self.edges.get_mut(id)
    }

    pub fn vertices(&self) -> impl Iterator<Item = (&VertexId, &Vertex)> {
        self.vertices.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&EdgeId, &Edge)> {
        self.edges.iter()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = &VertexId> {
        self.vertices.keys()
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = &EdgeId> {
        self.edges.keys()
    }

    /// Edges leaving `vertex`. Empty for unknown vertices.
    pub fn edges_out_of(&self, vertex: &str) -> impl Iterator<Item = &EdgeId> {
        self.edges_by_source.get(vertex).into_iter().flatten()
    }

    /// Edges entering `vertex`. Empty for unknown vertices.
    pub fn edges_into(&self, vertex: &str) -> impl Iterator<Item = &EdgeId> {
        self.edges_by_target.get(vertex).into_iter().flatten()
    }

    /// Edges whose source and target both lie in `vertex_ids`.
    pub fn edges_between(&self, vertex_ids: &[VertexId]) -> Vec<EdgeId> {
        let members: HashSet<&str> = vertex_ids.iter().map(VertexId::as_str).collect();
        let mut seen = HashSet::new();
        let mut between = Vec::new();
        for id in vertex_ids {
            for edge_id in self.edges_out_of(id.as_str()) {
                let edge = &self.edges[edge_id];
                if members.contains(edge.target_vertex_id().as_str()) && seen.insert(edge_id) {
                    between.push(edge_id.clone());
                }
            }
        }
        between
    }

    // -----------------------------------------------------------------------
    // Structural mutation
    // -----------------------------------------------------------------------

    /// Registers a vertex with empty adjacency sets.
    pub fn add_vertex(&mut self, id: VertexId, vertex: Vertex) -> Result<(), CoreError> {
        if self.vertices.contains_key(&id) {
            return Err(CoreError::DuplicateVertex { id });
        }
        self.edges_by_source.insert(id.clone(), IndexSet::new());
        self.edges_by_target.insert(id.clone(), IndexSet::new());
        self.vertices.insert(id, vertex);

        #[cfg(debug_assertions)]
        self.assert_consistency();

        Ok(())
    }

    /// Checks whether an edge may be created, returning the first violated
    /// rule.
    ///
    /// Checked in order: the edge id is unused; the source vertex exists and
    /// has the source port, which is an output; the target vertex exists and
    /// has the target port, which is an input; the target is not the source
    /// or one of its ancestors (which would close a loop).
    pub fn validate_edge(
        &self,
        id: &EdgeId,
        source: &VertexId,
        source_port: &str,
        target: &VertexId,
        target_port: &str,
    ) -> Result<(), CoreError> {
        if self.edges.contains_key(id) {
            return Err(CoreError::DuplicateEdge { id: id.clone() });
        }

        let source_vertex = self
            .vertices
            .get(source)
            .ok_or_else(|| CoreError::VertexNotFound { id: source.clone() })?;
        let source_port_def =
            source_vertex
                .port(source_port)
                .ok_or_else(|| CoreError::PortNotFound {
                    vertex: source.clone(),
                    port: source_port.to_string(),
                })?;
        if !source_port_def.is_output() {
            return Err(CoreError::NotAnOutputPort {
                vertex: source.clone(),
                port: source_port.to_string(),
            });
        }

        let target_vertex = self
            .vertices
            .get(target)
            .ok_or_else(|| CoreError::VertexNotFound { id: target.clone() })?;
        let target_port_def =
            target_vertex
                .port(target_port)
                .ok_or_else(|| CoreError::PortNotFound {
                    vertex: target.clone(),
                    port: target_port.to_string(),
                })?;
        if !target_port_def.is_input() {
            return Err(CoreError::NotAnInputPort {
                vertex: target.clone(),
                port: target_port.to_string(),
            });
        }

        if self.ancestors(source).contains(target.as_str()) {
            return Err(CoreError::CycleDetected {
                from: source.clone(),
                to: target.clone(),
            });
        }

        Ok(())
    }

    /// Inserts an edge and updates both adjacency indices.
    ///
    /// Does not re-validate: call [`validate_edge`](Self::validate_edge)
    /// first.
    pub fn create_edge(
        &mut self,
        id: EdgeId,
        source: VertexId,
        source_port: impl Into<String>,
        target: VertexId,
        target_port: impl Into<String>,
    ) {
        let edge = Edge::new(source, source_port, target, target_port);
        self.insert_edge(id, edge);
    }

    fn insert_edge(&mut self, id: EdgeId, edge: Edge) {
        self.edges_by_source
            .entry(edge.source_vertex_id().clone())
            .or_default()
            .insert(id.clone());
        self.edges_by_target
            .entry(edge.target_vertex_id().clone())
            .or_default()
            .insert(id.clone());
        self.edges.insert(id, edge);

        #[cfg(debug_assertions)]
        self.assert_consistency();
    }

    /// Removes a vertex together with every edge touching it.
    ///
    /// Returns the removed vertex, or `None` if the id is unknown.
    pub fn delete_vertex(&mut self, id: &str) -> Option<Vertex> {
        let vertex = self.vertices.shift_remove(id)?;

        let touching: Vec<EdgeId> = self
            .edges_out_of(id)
            .chain(self.edges_into(id))
            .cloned()
            .collect();
        for edge_id in touching {
            self.delete_edge(edge_id.as_str());
        }
        self.edges_by_source.remove(id);
        self.edges_by_target.remove(id);

        #[cfg(debug_assertions)]
        self.assert_consistency();

        Some(vertex)
    }

    /// Removes an edge and updates both adjacency indices.
    ///
    /// Returns the removed edge, or `None` if the id is unknown.
    pub fn delete_edge(&mut self, id: &str) -> Option<Edge> {
        let edge = self.edges.shift_remove(id)?;
        if let Some(out) = self.edges_by_source.get_mut(edge.source_vertex_id()) {
            out.shift_remove(id);
        }
        if let Some(inc) = self.edges_by_target.get_mut(edge.target_vertex_id()) {
            inc.shift_remove(id);
        }
        Some(edge)
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// `vertex` plus every vertex that can reach it through edges.
    fn ancestors<'a>(&'a self, vertex: &'a VertexId) -> HashSet<&'a str> {
        let mut found: HashSet<&str> = HashSet::new();
        let mut pending = vec![vertex.as_str()];
        while let Some(current) = pending.pop() {
            if !found.insert(current) {
                continue;
            }
            for edge_id in self.edges_into(current) {
                let parent = self.edges[edge_id].source_vertex_id().as_str();
                if !found.contains(parent) {
                    pending.push(parent);
                }
            }
        }
        found
    }

    /// Kahn-style layering: each layer holds the remaining vertices with no
    /// incoming edge from another remaining vertex.
    ///
    /// Every vertex appears after all vertices that can reach it. Within a
    /// layer, vertices keep insertion order.
    pub fn topological_layers(&self) -> Vec<Vec<VertexId>> {
        let mut remaining: IndexSet<&VertexId> = self.vertices.keys().collect();
        let mut layers = Vec::new();

        while !remaining.is_empty() {
            let roots: Vec<&VertexId> = remaining
                .iter()
                .copied()
                .filter(|id| {
                    self.edges_into(id.as_str())
                        .all(|e| !remaining.contains(self.edges[e].source_vertex_id()))
                })
                .collect();

            // unreachable while the graph is acyclic
            if roots.is_empty() {
                debug_assert!(false, "cycle in graph during topological layering");
                break;
            }

            for id in &roots {
                remaining.shift_remove(*id);
            }
            layers.push(roots.into_iter().cloned().collect());
        }

        layers
    }

    /// [`topological_layers`](Self::topological_layers), flattened.
    pub fn topological_order(&self) -> Vec<VertexId> {
        self.topological_layers().into_iter().flatten().collect()
    }

    /// Returns `true` if the edge set has no directed cycle.
    pub fn is_acyclic(&self) -> bool {
        let mut view: DiGraphMap<&str, ()> = DiGraphMap::new();
        for id in self.vertices.keys() {
            view.add_node(id.as_str());
        }
        for edge in self.edges.values() {
            view.add_edge(
                edge.source_vertex_id().as_str(),
                edge.target_vertex_id().as_str(),
                (),
            );
        }
        !is_cyclic_directed(&view)
    }

    // -----------------------------------------------------------------------
    // Id generation
    // -----------------------------------------------------------------------

    /// Produces `count` mutually distinct ids unused in `namespace`, drawing
    /// the first candidate from [`DEFAULT_ID_RANGE`].
    pub fn generate_unique_ids<R: Rng + ?Sized>(
        &self,
        count: usize,
        namespace: IdNamespace,
        rng: &mut R,
    ) -> Vec<String> {
        self.generate_unique_ids_in_range(count, namespace, rng, DEFAULT_ID_RANGE)
    }

    /// Like [`generate_unique_ids`](Self::generate_unique_ids) with an explicit
    /// starting range.
    ///
    /// Each id renders `floor(fraction * range)` for a uniform fraction in
    /// `[0, 1)`. On collision the range widens tenfold, exposing more digits of
    /// the same fraction; once widening would overflow, a fresh fraction is
    /// drawn at the starting range.
    pub fn generate_unique_ids_in_range<R: Rng + ?Sized>(
        &self,
        count: usize,
        namespace: IdNamespace,
        rng: &mut R,
        initial_range: u64,
    ) -> Vec<String> {
        let mut ids: Vec<String> = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.draw_id(namespace, rng, initial_range, &ids);
            ids.push(id);
        }
        ids
    }

    /// A single id unused in `namespace`, drawn as in
    /// [`generate_unique_ids_in_range`](Self::generate_unique_ids_in_range).
    pub fn generate_unique_id<R: Rng + ?Sized>(
        &self,
        namespace: IdNamespace,
        rng: &mut R,
        initial_range: u64,
    ) -> String {
        self.draw_id(namespace, rng, initial_range, &[])
    }

    fn draw_id<R: Rng + ?Sized>(
        &self,
        namespace: IdNamespace,
        rng: &mut R,
        initial_range: u64,
        reserved: &[String],
    ) -> String {
        let initial_range = initial_range.max(1);
        let taken = |candidate: &str| {
            reserved.iter().any(|r| r == candidate)
                || match namespace {
                    IdNamespace::Vertices => self.vertices.contains_key(candidate),
                    IdNamespace::Edges => self.edges.contains_key(candidate),
                }
        };

        let mut fraction: f64 = rng.gen();
        let mut range = initial_range;
        loop {
            let candidate = ((fraction * range as f64) as u64).to_string();
            if !taken(&candidate) {
                return candidate;
            }
            match range.checked_mul(10) {
                Some(wider) => range = wider,
                None => {
                    fraction = rng.gen();
                    range = initial_range;
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    /// The wire form sent to editor clients.
    pub fn to_data(&self) -> GraphData {
        GraphData {
            vertices: self
                .vertices
                .iter()
                .map(|(id, v)| (id.clone(), VertexData::from(v)))
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|(id, e)| (id.clone(), EdgeData::from(e)))
                .collect(),
        }
    }

    // -----------------------------------------------------------------------
    // Debug consistency assertion
    // -----------------------------------------------------------------------

    /// Asserts that both indices agree with the edge map and that the edge
    /// set is acyclic.
    ///
    /// Only called in debug builds (via `cfg(debug_assertions)`).
    #[cfg(debug_assertions)]
    fn assert_consistency(&self) {
        for (id, edge) in &self.edges {
            assert!(
                self.vertices.contains_key(edge.source_vertex_id())
                    && self.vertices.contains_key(edge.target_vertex_id()),
                "edge {id} has a dangling endpoint"
            );
            assert!(
                self.edges_by_source[edge.source_vertex_id()].contains(id),
                "edge {id} missing from the source index"
            );
            assert!(
                self.edges_by_target[edge.target_vertex_id()].contains(id),
                "edge {id} missing from the target index"
            );
        }
        let indexed: usize = self.edges_by_source.values().map(IndexSet::len).sum();
        assert_eq!(indexed, self.edges.len(), "source index holds stale edges");
        assert!(self.is_acyclic(), "edge set contains a cycle");
    }
}
