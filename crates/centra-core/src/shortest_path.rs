//! Single-source shortest paths (Dijkstra) over a [`Graph`].
//!
//! # Algorithm
//!
//! 1. **Reset**: every vertex gets distance `∞` except the source (0), and
//!    every predecessor is cleared. All vertices go into a fresh
//!    [`AdaptablePriorityQueue`] keyed by that distance, keeping one handle
//!    per vertex.
//! 2. **Settle**: repeatedly remove the minimum. An `∞` key means every
//!    vertex still queued is unreachable, so the loop stops early.
//!    Otherwise the vertex is settled and each edge to an unsettled target
//!    is relaxed: if `distance + weight` beats the target's queued key, the
//!    key is replaced through the target's handle.
//! 3. **Output**: the settled vertices with their final distances, in the
//!    order they were settled.
//!
//! Complexity: O((V + E) log V) per source.
//!
//! # Scratch state
//!
//! [`ShortestPathEngine`] owns the per-run distance, predecessor and settled
//! arrays and resets them at the start of every [`run`]. The reset is what
//! makes reusing one engine across sources correct. The graph itself is only
//! borrowed, so independent engines can run over one graph concurrently.
//!
//! [`run`]: ShortestPathEngine::run

use std::fmt;

use fixedbitset::FixedBitSet;
use tracing::{instrument, trace};

use crate::error::CentralityError;
use crate::graph::Graph;
use crate::queue::{AdaptablePriorityQueue, EntryHandle};

// ---------------------------------------------------------------------------
// Distance
// ---------------------------------------------------------------------------

/// A tentative or final path length. Every finite distance orders before
/// [`Distance::Infinite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Distance {
    Finite(u64),
    Infinite,
}

impl Distance {
    /// Distance of the source to itself.
    pub const ZERO: Self = Self::Finite(0);

    /// `true` unless the distance is infinite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        matches!(self, Self::Finite(_))
    }

    /// The finite length, if any.
    #[must_use]
    pub const fn finite(self) -> Option<u64> {
        match self {
            Self::Finite(d) => Some(d),
            Self::Infinite => None,
        }
    }

    /// Extend the path by an edge of `weight`. Overflow saturates to
    /// [`Distance::Infinite`].
    #[must_use]
    pub const fn saturating_add(self, weight: u64) -> Self {
        match self {
            Self::Finite(d) => match d.checked_add(weight) {
                Some(sum) => Self::Finite(sum),
                None => Self::Infinite,
            },
            Self::Infinite => Self::Infinite,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(d) => write!(f, "{d}"),
            Self::Infinite => f.write_str("inf"),
        }
    }
}

// ---------------------------------------------------------------------------
// DistanceMap
// ---------------------------------------------------------------------------

/// Shortest distances from one source to every vertex it reaches.
///
/// A vertex missing from the map is unreachable from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    source: usize,
    settled: Vec<(usize, u64)>,
}

impl DistanceMap {
    /// The vertex the distances are measured from.
    #[must_use]
    pub const fn source(&self) -> usize {
        self.source
    }

    /// Number of reachable vertices, the source included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.settled.len()
    }

    /// `true` if no vertex was settled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settled.is_empty()
    }

    /// `(vertex, distance)` pairs in settle order, which is non-decreasing
    /// in distance.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.settled.iter().copied()
    }

    /// Distance to `vertex`, or `None` if it is unreachable. Linear in the
    /// number of reachable vertices.
    #[must_use]
    pub fn get(&self, vertex: usize) -> Option<u64> {
        self.settled
            .iter()
            .find(|(v, _)| *v == vertex)
            .map(|(_, d)| *d)
    }

    /// `true` if `vertex` is reachable from the source.
    #[must_use]
    pub fn contains(&self, vertex: usize) -> bool {
        self.get(vertex).is_some()
    }

    /// Distances indexed by vertex id, `None` for unreachable vertices.
    #[must_use]
    pub fn dense(&self, vertex_count: usize) -> Vec<Option<u64>> {
        let mut out = vec![None; vertex_count];
        for &(v, d) in &self.settled {
            if let Some(slot) = out.get_mut(v) {
                *slot = Some(d);
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// ShortestPathEngine
// ---------------------------------------------------------------------------

/// Dijkstra runner with reusable per-run scratch state.
#[derive(Debug)]
pub struct ShortestPathEngine<'g> {
    graph: &'g Graph,
    distance: Vec<Distance>,
    predecessor: Vec<Option<usize>>,
    settled: FixedBitSet,
    source: Option<usize>,
}

impl<'g> ShortestPathEngine<'g> {
    /// Create an engine for `graph`. No run has happened yet.
    #[must_use]
    pub fn new(graph: &'g Graph) -> Self {
        let n = graph.vertex_count();
        Self {
            graph,
            distance: vec![Distance::Infinite; n],
            predecessor: vec![None; n],
            settled: FixedBitSet::with_capacity(n),
            source: None,
        }
    }

    /// Source of the most recent run.
    #[must_use]
    pub const fn last_source(&self) -> Option<usize> {
        self.source
    }

    /// Compute shortest distances from `source`.
    ///
    /// # Errors
    ///
    /// - [`CentralityError::SourceOutOfRange`] if `source` is not a vertex.
    /// - [`CentralityError::QueueInvariant`] if the queue contract is broken,
    ///   which indicates a bug in the engine rather than bad input.
    #[instrument(level = "trace", skip(self), fields(vertices = self.graph.vertex_count()))]
    pub fn run(&mut self, source: usize) -> Result<DistanceMap, CentralityError> {
        let n = self.graph.vertex_count();
        if source >= n {
            return Err(CentralityError::SourceOutOfRange {
                vertex: source,
                vertex_count: n,
            });
        }

        // Reset scratch state left by the previous source.
        self.distance.fill(Distance::Infinite);
        self.distance[source] = Distance::ZERO;
        self.predecessor.fill(None);
        self.settled.clear();
        self.source = Some(source);

        let mut queue = AdaptablePriorityQueue::with_capacity(n);
        let handles: Vec<EntryHandle> = self
            .distance
            .iter()
            .enumerate()
            .map(|(v, &d)| queue.insert(d, v))
            .collect();

        let mut settled = Vec::new();

        while !queue.is_empty() {
            let (key, u) = queue.remove_min()?;
            let Distance::Finite(du) = key else {
                trace!(unreachable = queue.len() + 1, "remaining vertices unreachable");
                break;
            };

            self.settled.insert(u);
            settled.push((u, du));
            trace!(vertex = u, distance = du, "settled");

            for (target, weight) in self.graph.outgoing_edges(u) {
                if self.settled.contains(target) {
                    continue;
                }
                let handle = handles[target];
                debug_assert!(
                    queue.contains(handle),
                    "unsettled vertex {target} is missing from the queue"
                );

                let candidate = key.saturating_add(weight);
                let queued = queue.key(handle).copied().unwrap_or(Distance::Infinite);
                if candidate < queued {
                    queue.replace_key(handle, candidate)?;
                    self.distance[target] = candidate;
                    self.predecessor[target] = Some(u);
                }
            }
        }

        Ok(DistanceMap { source, settled })
    }

    /// Distance to `vertex` found by the last run.
    #[must_use]
    pub fn distance(&self, vertex: usize) -> Option<Distance> {
        self.source?;
        self.distance.get(vertex).copied()
    }

    /// Vertex preceding `vertex` on its shortest path in the last run.
    #[must_use]
    pub fn predecessor(&self, vertex: usize) -> Option<usize> {
        self.predecessor.get(vertex).copied().flatten()
    }

    /// Vertices on a shortest path from the last run's source to `target`,
    /// both ends included. `None` if there was no run or `target` was not
    /// reached.
    #[must_use]
    pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
        let source = self.source?;
        if !self.distance(target)?.is_finite() {
            return None;
        }

        let mut path = vec![target];
        let mut current = target;
        while current != source {
            current = self.predecessor(current)?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(usize, usize, i64)]) -> Graph {
        Graph::from_edges(n, edges.iter().copied()).expect("valid test graph")
    }

    #[test]
    fn distance_ordering_puts_infinite_last() {
        assert!(Distance::Finite(u64::MAX) < Distance::Infinite);
        assert!(Distance::ZERO < Distance::Finite(1));
        assert_eq!(Distance::Finite(u64::MAX).saturating_add(1), Distance::Infinite);
        assert_eq!(Distance::Finite(2).saturating_add(3), Distance::Finite(5));
        assert_eq!(Distance::Infinite.to_string(), "inf");
    }

    #[test]
    fn chain_distances_are_exact() {
        let g = graph(4, &[(0, 1, 1), (1, 2, 1), (2, 3, 1)]);
        let mut engine = ShortestPathEngine::new(&g);
        let dm = engine.run(0).expect("valid source");

        assert_eq!(dm.dense(4), vec![Some(0), Some(1), Some(2), Some(3)]);
        assert_eq!(dm.len(), 4);
    }

    #[test]
    fn source_without_edges_reaches_only_itself() {
        let g = graph(3, &[(1, 2, 4)]);
        let mut engine = ShortestPathEngine::new(&g);
        let dm = engine.run(0).expect("valid source");

        assert_eq!(dm.iter().collect::<Vec<_>>(), vec![(0, 0)]);
        assert!(!dm.contains(2));
    }

    #[test]
    fn shorter_indirect_path_wins() {
        // 0 -> 2 directly costs 10, via 1 costs 3.
        let g = graph(3, &[(0, 2, 10), (0, 1, 1), (1, 2, 2)]);
        let mut engine = ShortestPathEngine::new(&g);
        let dm = engine.run(0).expect("valid source");

        assert_eq!(dm.get(2), Some(3));
        assert_eq!(engine.predecessor(2), Some(1));
        assert_eq!(engine.path_to(2), Some(vec![0, 1, 2]));
    }

    #[test]
    fn settle_order_is_non_decreasing() {
        let g = graph(
            5,
            &[(0, 1, 4), (0, 2, 1), (2, 1, 1), (1, 3, 5), (2, 3, 8), (3, 4, 0)],
        );
        let mut engine = ShortestPathEngine::new(&g);
        let dm = engine.run(0).expect("valid source");

        let ds: Vec<u64> = dm.iter().map(|(_, d)| d).collect();
        assert!(ds.windows(2).all(|w| w[0] <= w[1]), "got {ds:?}");
        assert_eq!(dm.dense(5), vec![Some(0), Some(2), Some(1), Some(7), Some(7)]);
    }

    #[test]
    fn engine_reuse_resets_state() {
        let g = graph(3, &[(0, 1, 1), (1, 2, 1)]);
        let mut engine = ShortestPathEngine::new(&g);

        let first = engine.run(0).expect("valid source");
        assert_eq!(first.len(), 3);

        let second = engine.run(2).expect("valid source");
        assert_eq!(second.iter().collect::<Vec<_>>(), vec![(2, 0)]);
        assert_eq!(engine.distance(0), Some(Distance::Infinite));
        assert_eq!(engine.predecessor(1), None);
        assert_eq!(engine.path_to(0), None);

        let again = engine.run(0).expect("valid source");
        assert_eq!(first, again);
    }

    #[test]
    fn out_of_range_source_is_rejected() {
        let g = graph(2, &[]);
        let mut engine = ShortestPathEngine::new(&g);
        assert_eq!(
            engine.run(2),
            Err(CentralityError::SourceOutOfRange {
                vertex: 2,
                vertex_count: 2
            })
        );
        assert_eq!(engine.last_source(), None);
        assert_eq!(engine.distance(0), None);
    }

    #[test]
    fn zero_weight_edges_give_zero_distance() {
        let g = graph(2, &[(0, 1, 0)]);
        let mut engine = ShortestPathEngine::new(&g);
        let dm = engine.run(0).expect("valid source");
        assert_eq!(dm.get(1), Some(0));
    }

    #[test]
    fn self_loops_do_not_affect_distances() {
        let g = graph(2, &[(0, 0, 1), (0, 1, 2), (1, 1, 0)]);
        let mut engine = ShortestPathEngine::new(&g);
        let dm = engine.run(0).expect("valid source");
        assert_eq!(dm.dense(2), vec![Some(0), Some(2)]);
    }

    #[test]
    fn cycle_is_handled() {
        let g = graph(3, &[(0, 1, 2), (1, 2, 2), (2, 0, 2)]);
        let mut engine = ShortestPathEngine::new(&g);
        let dm = engine.run(1).expect("valid source");
        assert_eq!(dm.dense(3), vec![Some(4), Some(0), Some(2)]);
        assert_eq!(engine.path_to(0), Some(vec![1, 2, 0]));
    }
}
