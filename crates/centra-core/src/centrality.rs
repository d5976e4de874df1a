//! Closeness centrality from reciprocal shortest-path distances.
//!
//! # Overview
//!
//! Each vertex's score measures how close it is to the vertices that can
//! reach it. For every source `s` and every vertex `t != s` reachable from
//! `s` at distance `d`, `1 / d` is added to `t`'s running sum. The final
//! score scales the sum by `N - 1`:
//!
//! ```text
//! centrality(t) = (N - 1) * Σ_{s ≠ t, s reaches t} 1 / dist(s, t)
//! ```
//!
//! The scale is `N - 1` regardless of how many sources actually reach `t`.
//! Because paths are followed from every source *towards* `t`, this is an
//! in-closeness measure: a vertex nobody can reach scores 0. A zero-weight
//! path contributes `1 / 0 = +∞`.
//!
//! # Selection
//!
//! The most influential vertex minimizes `(-centrality, id)`
//! lexicographically: the highest score wins and an exact tie goes to the
//! lower id.
//!
//! # Parallelism
//!
//! With [`CentralityConfig::workers`] above 1, sources are split into
//! contiguous chunks and run on a `rayon` pool sized to the worker count.
//! Each chunk owns its own [`ShortestPathEngine`] and partial-sum vector.
//! Partial sums are merged in chunk order once every chunk has finished, so
//! the hot loop takes no lock. A panicking worker propagates to the caller. Scores may differ from a sequential run in the last bits because
//! the additions happen in a different order.

#![allow(clippy::module_name_repetitions)]

use std::cmp::Ordering;
use std::ops::Range;
use std::thread;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::CentralityError;
use crate::graph::Graph;
use crate::shortest_path::{DistanceMap, ShortestPathEngine};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a centrality pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentralityConfig {
    /// Number of worker threads. `1` runs sequentially on the caller's
    /// thread; `0` uses the available parallelism.
    /// Default: 1.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

const fn default_workers() -> usize {
    1
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

impl CentralityConfig {
    /// Worker count actually used for a graph of `vertex_count` vertices:
    /// never more than one per source, never less than one.
    #[must_use]
    pub fn effective_workers(&self, vertex_count: usize) -> usize {
        let requested = if self.workers == 0 {
            thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        } else {
            self.workers
        };
        requested.min(vertex_count).max(1)
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Per-vertex centrality scores and the selected vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct CentralityScores {
    scores: Vec<f64>,
    most_influential: Option<usize>,
    workers: usize,
}

impl CentralityScores {
    /// Scores indexed by vertex id.
    #[must_use]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Score of one vertex.
    #[must_use]
    pub fn score(&self, vertex: usize) -> Option<f64> {
        self.scores.get(vertex).copied()
    }

    /// The highest-scoring vertex, lowest id on ties. `None` for an empty
    /// graph.
    #[must_use]
    pub const fn most_influential(&self) -> Option<usize> {
        self.most_influential
    }

    /// Number of worker threads the pass used.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Number of scored vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// `true` for the result of an empty graph.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// All vertex ids ordered by the selection rule, best first.
    #[must_use]
    pub fn ranking(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = (0..self.scores.len()).collect();
        ids.sort_by(|&a, &b| selection_order((a, self.scores[a]), (b, self.scores[b])));
        ids
    }

    /// Consume the result, returning the raw score vector.
    #[must_use]
    pub fn into_scores(self) -> Vec<f64> {
        self.scores
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Compute closeness centrality for every vertex of `graph`.
///
/// Runs Dijkstra once per vertex as source. An empty graph yields an empty
/// result with no selected vertex.
///
/// # Errors
///
/// Returns a [`CentralityError`] if any per-source run fails or the worker
/// pool cannot be started. No partial scores are returned.
#[instrument(skip(graph, config), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn closeness_centrality(
    graph: &Graph,
    config: &CentralityConfig,
) -> Result<CentralityScores, CentralityError> {
    let n = graph.vertex_count();
    if n == 0 {
        debug!("empty graph, no vertex to select");
        return Ok(CentralityScores {
            scores: Vec::new(),
            most_influential: None,
            workers: 0,
        });
    }

    // Contiguous chunks of sources; the last chunk may be shorter, so the
    // chunk count can come out below the requested worker count.
    let chunk = n.div_ceil(config.effective_workers(n));
    let workers = n.div_ceil(chunk);
    let sums = if workers == 1 {
        reciprocal_sums(graph, 0..n)?
    } else {
        parallel_reciprocal_sums(graph, workers, chunk)?
    };

    #[allow(clippy::cast_precision_loss)]
    let scale = (n - 1) as f64;
    let scores: Vec<f64> = sums.into_iter().map(|sum| sum * scale).collect();
    let most_influential = select_most_influential(&scores);

    debug!(workers, ?most_influential, "closeness centrality computed");

    Ok(CentralityScores {
        scores,
        most_influential,
        workers,
    })
}

/// Id of the vertex with the highest closeness centrality, lowest id on
/// ties. `None` for an empty graph.
///
/// # Errors
///
/// Same as [`closeness_centrality`].
pub fn most_influential_vertex(graph: &Graph) -> Result<Option<usize>, CentralityError> {
    Ok(closeness_centrality(graph, &CentralityConfig::default())?.most_influential())
}

/// Index minimizing `(-score, index)`.
#[must_use]
pub fn select_most_influential(scores: &[f64]) -> Option<usize> {
    scores
        .iter()
        .copied()
        .enumerate()
        .min_by(|&a, &b| selection_order(a, b))
        .map(|(id, _)| id)
}

/// Lexicographic order on `(-score, id)`.
fn selection_order((id_a, score_a): (usize, f64), (id_b, score_b): (usize, f64)) -> Ordering {
    score_b.total_cmp(&score_a).then(id_a.cmp(&id_b))
}

/// Reciprocal-distance sums contributed by the given sources.
fn reciprocal_sums(graph: &Graph, sources: Range<usize>) -> Result<Vec<f64>, CentralityError> {
    let mut engine = ShortestPathEngine::new(graph);
    let mut sums = vec![0.0; graph.vertex_count()];

    for source in sources {
        let distances = engine.run(source)?;
        accumulate(&mut sums, &distances);
    }

    Ok(sums)
}

fn accumulate(sums: &mut [f64], distances: &DistanceMap) {
    let source = distances.source();
    for (target, distance) in distances.iter() {
        if target != source {
            #[allow(clippy::cast_precision_loss)]
            let distance = distance as f64;
            sums[target] += 1.0 / distance;
        }
    }
}

/// Reciprocal sums over contiguous source chunks on a dedicated pool of
/// `workers` threads. Partials are merged in chunk order.
fn parallel_reciprocal_sums(
    graph: &Graph,
    workers: usize,
    chunk: usize,
) -> Result<Vec<f64>, CentralityError> {
    let n = graph.vertex_count();
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("centra-worker-{i}"))
        .build()
        .map_err(|err| CentralityError::WorkerPool {
            reason: err.to_string(),
        })?;

    let chunks: Vec<Range<usize>> = (0..n)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(n))
        .collect();

    // Indexed collect keeps the partials in chunk order.
    let partials: Vec<Vec<f64>> = pool.install(|| {
        chunks
            .into_par_iter()
            .map(|sources| reciprocal_sums(graph, sources))
            .collect::<Result<Vec<_>, CentralityError>>()
    })?;

    let mut sums = vec![0.0; n];
    for partial in partials {
        for (total, part) in sums.iter_mut().zip(partial) {
            *total += part;
        }
    }
    Ok(sums)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
