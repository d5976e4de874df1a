//! Error types for graph construction, queue use, input parsing and the
//! centrality computation.
//!
//! Every error is terminal for the current invocation. Nothing here is
//! retried and no partial centrality result is ever returned alongside one.

use crate::queue::EntryHandle;

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// An edge the graph refuses to store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Dijkstra requires non-negative weights.
    #[error("edge {from} -> {to} has negative weight {weight}")]
    NegativeWeight { from: usize, to: usize, weight: i64 },

    /// An endpoint id is not in `[0, vertex_count)`.
    #[error("vertex {vertex} is out of range for a graph with {vertex_count} vertices")]
    VertexOutOfRange { vertex: usize, vertex_count: usize },
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

/// Misuse of the adaptable priority queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// `remove_min` on a queue with no entries.
    #[error("priority queue is empty")]
    Empty,

    /// The handle's entry was already removed, or never belonged to this queue.
    #[error("queue handle {0} does not refer to a present entry")]
    StaleHandle(EntryHandle),
}

// ---------------------------------------------------------------------------
// Centrality
// ---------------------------------------------------------------------------

/// Failures of a shortest-path run or a full centrality pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CentralityError {
    /// The requested source vertex does not exist.
    #[error("source vertex {vertex} is out of range for a graph with {vertex_count} vertices")]
    SourceOutOfRange { vertex: usize, vertex_count: usize },

    /// The engine broke the queue contract. Indicates a bug, not bad input.
    #[error("internal priority queue invariant violated: {0}")]
    QueueInvariant(#[from] QueueError),

    /// The worker pool for a parallel pass could not be started.
    #[error("failed to start centrality worker pool: {reason}")]
    WorkerPool { reason: String },
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Malformed textual graph input.
///
/// Line numbers are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The input has no `N M` header line.
    #[error("missing header line with vertex and edge counts")]
    MissingHeader,

    /// A line has the wrong number of whitespace-separated fields.
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A token is not an integer.
    #[error("line {line}: `{token}` is not an integer")]
    InvalidInteger { line: usize, token: String },

    /// The vertex or edge count in the header is negative.
    #[error("line {line}: count must be non-negative, got {value}")]
    NegativeCount { line: usize, value: i64 },

    /// The vertex count exceeds what the graph can index.
    #[error("line {line}: vertex count {value} exceeds the maximum of {max}")]
    TooManyVertices { line: usize, value: usize, max: usize },

    /// An edge endpoint is negative.
    #[error("line {line}: vertex id must be non-negative, got {value}")]
    NegativeVertex { line: usize, value: i64 },

    /// Fewer edge lines than the header announced.
    #[error("expected {expected} edge lines, found {found}")]
    MissingEdges { expected: usize, found: usize },

    /// A non-blank line after the last announced edge.
    #[error("line {line}: unexpected content after the last edge")]
    UnexpectedLine { line: usize },

    /// An edge line the graph rejected.
    #[error("line {line}: {source}")]
    Edge {
        line: usize,
        #[source]
        source: GraphError,
    },

    /// Reading the input failed.
    #[error("failed to read graph input: {0}")]
    Io(#[from] std::io::Error),
}
