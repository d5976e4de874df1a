//! Line-oriented text format for graph input.
//!
//! # Format
//!
//! ```text
//! N M            vertex count, edge count
//! from to weight repeated M times
//! ```
//!
//! Fields are separated by any whitespace. Ids must lie in `[0, N)` and
//! weights must be non-negative. Blank lines after the last edge are
//! ignored; any other deviation is a fatal [`InputError`] and no graph is
//! returned.

use std::io::BufRead;

use tracing::{debug, instrument};

use crate::error::InputError;
use crate::graph::Graph;

/// Upper bound on edge storage reserved up front from an untrusted header.
/// Vertex storage grows only with the ids edges actually reference.
const MAX_PREALLOCATED_EDGES: usize = 1 << 20;

/// Parse a graph from `reader`.
///
/// # Errors
///
/// Returns an [`InputError`] describing the first malformed line, an edge
/// the graph rejects, or an I/O failure.
#[instrument(skip(reader))]
pub fn parse_graph<R: BufRead>(reader: R) -> Result<Graph, InputError> {
    let mut lines = reader.lines().enumerate().map(|(i, line)| (i + 1, line));

    let (header_no, header) = match lines.next() {
        Some((no, line)) => (no, line?),
        None => return Err(InputError::MissingHeader),
    };
    if header.trim().is_empty() {
        return Err(InputError::MissingHeader);
    }
    let [n, m] = parse_fields::<2>(header_no, &header)?;
    let vertex_count = count(header_no, n)?;
    if vertex_count > Graph::MAX_VERTICES {
        return Err(InputError::TooManyVertices {
            line: header_no,
            value: vertex_count,
            max: Graph::MAX_VERTICES,
        });
    }
    let edge_count = count(header_no, m)?;

    let mut graph =
        Graph::with_capacity(vertex_count, edge_count.min(MAX_PREALLOCATED_EDGES));

    for found in 0..edge_count {
        let Some((line_no, line)) = lines.next() else {
            return Err(InputError::MissingEdges {
                expected: edge_count,
                found,
            });
        };
        let [from, to, weight] = parse_fields::<3>(line_no, &line?)?;
        let from = vertex(line_no, from)?;
        let to = vertex(line_no, to)?;
        graph
            .add_edge(from, to, weight)
            .map_err(|source| InputError::Edge {
                line: line_no,
                source,
            })?;
    }

    for (line_no, line) in lines {
        if !line?.trim().is_empty() {
            return Err(InputError::UnexpectedLine { line: line_no });
        }
    }

    debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "graph input parsed"
    );
    Ok(graph)
}

/// Parse a graph from an in-memory string.
///
/// # Errors
///
/// Same as [`parse_graph`].
pub fn parse_graph_str(text: &str) -> Result<Graph, InputError> {
    parse_graph(text.as_bytes())
}

fn parse_fields<const K: usize>(line: usize, text: &str) -> Result<[i64; K], InputError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != K {
        return Err(InputError::FieldCount {
            line,
            expected: K,
            found: tokens.len(),
        });
    }

    let mut out = [0_i64; K];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = token.parse().map_err(|_| InputError::InvalidInteger {
            line,
            token: token.to_string(),
        })?;
    }
    Ok(out)
}

fn count(line: usize, value: i64) -> Result<usize, InputError> {
    usize::try_from(value).map_err(|_| InputError::NegativeCount { line, value })
}

fn vertex(line: usize, value: i64) -> Result<usize, InputError> {
    usize::try_from(value).map_err(|_| InputError::NegativeVertex { line, value })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
