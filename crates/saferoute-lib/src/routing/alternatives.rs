//! Alternative route generation.
//!
//! Re-runs the planner with the safety preference pinned to 0 (fastest),
//! 50 (balanced) and 100 (safest). Each run is an independent pure search
//! over the same snapshot, so they may run on the rayon pool.

use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::graph::{NodeIndex, RouteGraph};
use crate::output::{AlternativeRoute, BudgetExceededVariant, RouteAlternatives, RouteLabel};

use super::{resolve_endpoints, search_and_assemble, RouteRequest, SearchResult};

/// Produce the labelled variants of `request`.
///
/// Found variants are always reported in fastest, balanced, safest order.
/// A variant whose search runs out of budget is listed separately, so a
/// budget-limited query never looks like a disconnected pair.
pub fn generate_route_alternatives(
    graph: &RouteGraph,
    request: &RouteRequest,
    config: &EngineConfig,
) -> Result<RouteAlternatives> {
    let endpoints = resolve_endpoints(graph, request.start, request.goal)?;
    Ok(variants(graph, endpoints, request, config))
}

pub(super) fn variants(
    graph: &RouteGraph,
    endpoints: (NodeIndex, NodeIndex),
    request: &RouteRequest,
    config: &EngineConfig,
) -> RouteAlternatives {
    let run = |label: RouteLabel| -> (RouteLabel, SearchResult) {
        let options = request
            .options
            .clone()
            .with_safety_preference(label.safety_preference());
        (
            label,
            search_and_assemble(graph, endpoints, &options, request, config),
        )
    };

    let results: Vec<_> = if config.parallel_alternatives {
        RouteLabel::ALL[..].par_iter().map(|&label| run(label)).collect()
    } else {
        RouteLabel::ALL.iter().map(|&label| run(label)).collect()
    };

    let mut alternatives = RouteAlternatives::default();
    for (label, result) in results {
        match result {
            SearchResult::Found(summary) => {
                alternatives.routes.push(AlternativeRoute { label, summary });
            }
            SearchResult::NoRoute => {}
            SearchResult::BudgetExceeded { expanded } => {
                tracing::warn!(%label, expanded, "alternative search exceeded its budget");
                alternatives
                    .budget_exceeded
                    .push(BudgetExceededVariant { label, expanded });
            }
        }
    }
    alternatives
}
