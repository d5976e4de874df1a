//! Weighted directed graph over a fixed, dense vertex set.
//!
//! # Overview
//!
//! [`Graph`] wraps a [`petgraph`] `DiGraph` whose node indices are exactly
//! the vertex ids `0..N`. The vertex count is fixed in [`Graph::new`], but
//! petgraph nodes are only materialized up to the highest id an edge
//! touches. Building a graph costs time proportional to its edges, not to
//! the announced vertex count. Vertices are never removed.
//!
//! Edges carry non-negative `u64` weights. Inserting the same ordered pair
//! twice overwrites the earlier weight; there are no parallel edges.
//!
//! The graph holds topology only. Per-run distances and predecessors live in
//! the shortest-path engine's scratch state, so one `Graph` can be shared
//! read-only by any number of concurrent runs.

#![allow(clippy::module_name_repetitions)]

use std::ops::Range;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::error::GraphError;

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Directed graph with non-negative integer edge weights.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    inner: DiGraph<(), u64>,
    vertex_count: usize,
}

impl Graph {
    /// Largest vertex count the underlying `u32` node indices can address.
    pub const MAX_VERTICES: usize = u32::MAX as usize;

    /// Create a graph with `vertex_count` vertices and no edges.
    ///
    /// # Panics
    ///
    /// Panics if `vertex_count` exceeds [`Graph::MAX_VERTICES`].
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self::with_capacity(vertex_count, 0)
    }

    /// Create a graph with `vertex_count` vertices, reserving room for
    /// `edge_capacity` edges.
    ///
    /// # Panics
    ///
    /// Panics if `vertex_count` exceeds [`Graph::MAX_VERTICES`].
    #[must_use]
    pub fn with_capacity(vertex_count: usize, edge_capacity: usize) -> Self {
        assert!(
            vertex_count <= Self::MAX_VERTICES,
            "vertex count {vertex_count} exceeds {}",
            Self::MAX_VERTICES
        );
        Self {
            inner: DiGraph::with_capacity(0, edge_capacity),
            vertex_count,
        }
    }

    /// Build a graph from `(from, to, weight)` triples.
    ///
    /// # Errors
    ///
    /// Returns the first [`GraphError`] produced by [`Graph::add_edge`].
    pub fn from_edges<I>(vertex_count: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (usize, usize, i64)>,
    {
        let edges = edges.into_iter();
        let mut graph = Self::with_capacity(vertex_count, edges.size_hint().0);
        for (from, to, weight) in edges {
            graph.add_edge(from, to, weight)?;
        }
        Ok(graph)
    }

    /// Number of vertices.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of distinct directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// All vertex ids, in ascending order.
    #[must_use]
    pub const fn vertices(&self) -> Range<usize> {
        0..self.vertex_count()
    }

    /// `true` if `vertex` is a valid id for this graph.
    #[must_use]
    pub const fn contains_vertex(&self, vertex: usize) -> bool {
        vertex < self.vertex_count
    }

    /// Insert or overwrite the edge `from -> to`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::VertexOutOfRange`] if either endpoint is not a vertex.
    /// - [`GraphError::NegativeWeight`] if `weight < 0`.
    ///
    /// A rejected edge leaves the graph unchanged.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: i64) -> Result<(), GraphError> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        let weight =
            u64::try_from(weight).map_err(|_| GraphError::NegativeWeight { from, to, weight })?;

        self.materialize(from.max(to));
        self.inner
            .update_edge(NodeIndex::new(from), NodeIndex::new(to), weight);
        Ok(())
    }

    /// Outgoing `(target, weight)` pairs of `vertex`.
    ///
    /// The order is stable as long as the graph is not modified. An id that
    /// is not a vertex yields no edges.
    pub fn outgoing_edges(&self, vertex: usize) -> impl Iterator<Item = (usize, u64)> + '_ {
        let node = (vertex < self.inner.node_count()).then(|| NodeIndex::new(vertex));
        node.into_iter()
            .flat_map(|node| self.inner.edges(node))
            .map(|edge| (edge.target().index(), *edge.weight()))
    }

    /// Number of outgoing edges of `vertex`.
    #[must_use]
    pub fn out_degree(&self, vertex: usize) -> usize {
        self.outgoing_edges(vertex).count()
    }

    /// Weight of the edge `from -> to`, if present.
    #[must_use]
    pub fn edge_weight(&self, from: usize, to: usize) -> Option<u64> {
        let materialized = self.inner.node_count();
        if from >= materialized || to >= materialized {
            return None;
        }
        let edge = self
            .inner
            .find_edge(NodeIndex::new(from), NodeIndex::new(to))?;
        self.inner.edge_weight(edge).copied()
    }

    /// Add petgraph nodes until `vertex` has one.
    fn materialize(&mut self, vertex: usize) {
        while self.inner.node_count() <= vertex {
            self.inner.add_node(());
        }
    }

    fn check_vertex(&self, vertex: usize) -> Result<(), GraphError> {
        if self.contains_vertex(vertex) {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange {
                vertex,
                vertex_count: self.vertex_count(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_graph_has_vertices_and_no_edges() {
        let g = Graph::new(4);
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.vertices(), 0..4);
        for v in g.vertices() {
            assert_eq!(g.out_degree(v), 0);
        }
    }

    #[test]
    fn empty_graph_is_valid() {
        let g = Graph::new(0);
        assert_eq!(g.vertex_count(), 0);
        assert!(!g.contains_vertex(0));
    }

    #[test]
    fn add_edge_exposes_outgoing() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1, 4).expect("valid edge");
        g.add_edge(0, 2, 9).expect("valid edge");

        let mut out: Vec<_> = g.outgoing_edges(0).collect();
        out.sort_unstable();
        assert_eq!(out, vec![(1, 4), (2, 9)]);
        assert_eq!(g.outgoing_edges(1).count(), 0);
    }

    #[test]
    fn last_insertion_wins_for_same_pair() {
        let mut g = Graph::new(2);
        g.add_edge(0, 1, 5).expect("valid edge");
        g.add_edge(0, 1, 2).expect("valid edge");

        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge_weight(0, 1), Some(2));
    }

    #[test]
    fn reverse_pair_is_a_distinct_edge() {
        let mut g = Graph::new(2);
        g.add_edge(0, 1, 1).expect("valid edge");
        g.add_edge(1, 0, 3).expect("valid edge");

        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edge_weight(1, 0), Some(3));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut g = Graph::new(2);
        let err = g.add_edge(0, 1, -1).expect_err("negative weight");
        assert_eq!(
            err,
            GraphError::NegativeWeight {
                from: 0,
                to: 1,
                weight: -1
            }
        );
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn out_of_range_endpoint_is_rejected() {
        let mut g = Graph::new(2);
        let err = g.add_edge(0, 2, 1).expect_err("out of range target");
        assert_eq!(
            err,
            GraphError::VertexOutOfRange {
                vertex: 2,
                vertex_count: 2
            }
        );

        let err = g.add_edge(5, 0, 1).expect_err("out of range source");
        assert!(matches!(err, GraphError::VertexOutOfRange { vertex: 5, .. }));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn zero_weight_is_allowed() {
        let mut g = Graph::new(2);
        g.add_edge(1, 0, 0).expect("zero weight is non-negative");
        assert_eq!(g.edge_weight(1, 0), Some(0));
    }

    #[test]
    fn self_loop_is_stored() {
        let mut g = Graph::new(1);
        g.add_edge(0, 0, 3).expect("self loop");
        assert_eq!(g.out_degree(0), 1);
    }

    #[test]
    fn from_edges_stops_at_first_error() {
        let err = Graph::from_edges(3, [(0, 1, 1), (1, 2, -4), (2, 7, 1)])
            .expect_err("negative weight on second edge");
        assert!(matches!(err, GraphError::NegativeWeight { weight: -4, .. }));
    }

    #[test]
    fn large_vertex_count_is_cheap_until_edges_touch_it() {
        let mut g = Graph::new(300_000_000);
        assert_eq!(g.vertex_count(), 300_000_000);
        assert!(g.contains_vertex(299_999_999));
        assert_eq!(g.out_degree(299_999_999), 0);
        assert_eq!(g.edge_weight(7, 299_999_999), None);

        g.add_edge(3, 1, 4).expect("valid edge");
        assert_eq!(g.edge_weight(3, 1), Some(4));
        assert_eq!(g.outgoing_edges(3).collect::<Vec<_>>(), vec![(1, 4)]);
        assert_eq!(g.out_degree(10), 0);
    }

    #[test]
    fn edge_weight_of_missing_vertex_is_none() {
        let g = Graph::new(1);
        assert_eq!(g.edge_weight(0, 3), None);
        assert_eq!(g.outgoing_edges(9).count(), 0);
    }
}
