//! Info command handler for summarising a graph document.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::Result;
use saferoute_lib::RouteGraph;

use crate::commands::load_engine;
use crate::output::{render_info, GraphInfo, OutputFormat};

/// Collect summary statistics for `graph`.
pub fn graph_info(graph: &RouteGraph) -> GraphInfo {
    let mut touched = HashSet::new();
    let mut road_types = BTreeMap::new();
    let mut one_way_edges = 0;
    let mut safety_total = 0.0;
    for edge in graph.edges() {
        touched.insert(edge.from);
        touched.insert(edge.to);
        *road_types.entry(edge.road_type.to_string()).or_insert(0) += 1;
        if graph.edge(edge.to, edge.from).is_none() {
            one_way_edges += 1;
        }
        safety_total += edge.safety_score;
    }

    let isolated_nodes = graph
        .nodes()
        .map(|node| node.id)
        .filter(|id| !touched.contains(id))
        .collect();

    let edges = graph.edge_count();
    GraphInfo {
        nodes: graph.node_count(),
        edges,
        one_way_edges,
        isolated_nodes,
        mean_edge_safety: (edges > 0).then(|| safety_total / edges as f64),
        road_types,
    }
}

/// Handle the info subcommand.
pub fn handle_info_command(graph_path: &Path, format: OutputFormat) -> Result<()> {
    let engine = load_engine(graph_path)?;
    let info = graph_info(&engine.snapshot());
    print!("{}", render_info(&info, format)?);
    Ok(())
}
