//! Result rendering: a bare vertex id for pipes, or a JSON object.
//!
//! JSON cannot represent infinity, so an infinite score (reached over a
//! zero-weight path) is written as `null`.

use std::io::{self, Write};

use centra_core::{CentralityScores, Graph};
use serde::Serialize;

/// Output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// The selected vertex id on its own line; nothing for an empty graph.
    Text,
    /// One JSON object on one line.
    Json,
}

/// What a run reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub vertex: Option<usize>,
    pub vertex_count: usize,
    pub edge_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<f64>>,
}

impl Report {
    pub fn new(graph: &Graph, result: &CentralityScores, include_scores: bool) -> Self {
        Self {
            vertex: result.most_influential(),
            vertex_count: graph.vertex_count(),
            edge_count: graph.edge_count(),
            scores: include_scores.then(|| result.scores().to_vec()),
        }
    }
}

pub fn render(mode: OutputMode, report: &Report, w: &mut dyn Write) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            if let Some(vertex) = report.vertex {
                writeln!(w, "{vertex}")?;
            }
        }
        OutputMode::Json => {
            serde_json::to_writer(&mut *w, report)?;
            writeln!(w)?;
        }
    }
    w.flush()
}
