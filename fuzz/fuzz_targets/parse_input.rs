#![no_main]

use centra_core::{CentralityConfig, closeness_centrality, parse_graph};
use libfuzzer_sys::fuzz_target;

/// Graphs above this size are not scored.
const MAX_SCORED_VERTICES: usize = 64;

/// Headers announcing more vertices than this are skipped, since an edge
/// near the top id materializes every vertex below it.
const MAX_PARSED_VERTICES: u64 = 1 << 16;

fn announced_vertices(data: &[u8]) -> Option<u64> {
    let header = data.split(|b| *b == b'\n').next()?;
    let text = std::str::from_utf8(header).ok()?;
    text.split_whitespace().next()?.parse().ok()
}

fuzz_target!(|data: &[u8]| {
    if announced_vertices(data).is_some_and(|n| n > MAX_PARSED_VERTICES) {
        return;
    }
    let Ok(graph) = parse_graph(data) else {
        return;
    };
    if graph.vertex_count() > MAX_SCORED_VERTICES {
        return;
    }

    let result = closeness_centrality(&graph, &CentralityConfig::default())
        .expect("a parsed graph always scores");
    assert!(result.scores().iter().all(|s| *s >= 0.0));
    assert_eq!(result.most_influential().is_some(), graph.vertex_count() > 0);
});
