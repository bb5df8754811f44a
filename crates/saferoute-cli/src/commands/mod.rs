// Handlers for CLI subcommands.
//
// main.rs parses arguments and dispatches here; each handler loads the graph,
// runs the query and prints the rendered result.

pub mod info;
pub mod route;

use std::path::Path;

use anyhow::{Context, Result};
use saferoute_lib::{load_graph, EngineConfig, RouteEngine};

/// Load the graph document at `path` into an engine configured from the
/// `SAFEROUTE_*` environment variables.
pub fn load_engine(path: &Path) -> Result<RouteEngine> {
    let config = EngineConfig::from_env().context("invalid SAFEROUTE_* configuration")?;
    let graph = load_graph(path)
        .with_context(|| format!("failed to load graph from {}", path.display()))?;
    Ok(RouteEngine::with_config(graph, config))
}
