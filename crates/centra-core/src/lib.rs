#![forbid(unsafe_code)]
//! centra-core library.
//!
//! Closeness centrality over a weighted directed graph. Dijkstra is run from
//! every vertex on top of an adaptable (decrease-key) priority queue, the
//! reciprocal distances are summed per target, and the highest-scoring
//! vertex is selected with a deterministic tie-break.
//!
//! ## Pipeline
//!
//! ```text
//! text input
//!        ↓  input::parse_graph()
//! Graph (petgraph DiGraph, ids 0..N)
//!        ↓  shortest_path::ShortestPathEngine::run(source)   × N
//! DistanceMap per source (queue::AdaptablePriorityQueue inside)
//!        ↓  centrality::closeness_centrality()
//! CentralityScores → most_influential()
//! ```
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums from [`error`]; nothing panics on bad input.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod centrality;
pub mod error;
pub mod graph;
pub mod input;
pub mod queue;
pub mod shortest_path;

pub use centrality::{
    CentralityConfig, CentralityScores, closeness_centrality, most_influential_vertex,
};
pub use error::{CentralityError, GraphError, InputError, QueueError};
pub use graph::Graph;
pub use input::{parse_graph, parse_graph_str};
pub use queue::{AdaptablePriorityQueue, EntryHandle};
pub use shortest_path::{Distance, DistanceMap, ShortestPathEngine};
