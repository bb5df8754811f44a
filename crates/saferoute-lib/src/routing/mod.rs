//! Route planning entry points.
//!
//! This module provides:
//! - [`RouteRequest`] - A single routing query with options and limits
//! - [`RoutePlanOutcome`] - Found route, no route, or budget exhausted
//! - [`plan_route`] - Run one query against a graph snapshot
//! - [`RouteEngine`] - Per-region engine owning a swappable graph snapshot
//! - [`generate_route_alternatives`] - Fastest/balanced/safest variants
//!
//! # Example
//!
//! ```ignore
//! use saferoute_lib::{RouteEngine, RouteOptimizationOptions};
//!
//! let engine = RouteEngine::new(load_graph("region.json")?);
//! let options = RouteOptimizationOptions::default().with_safety_preference(80.0);
//! if let Some(route) = engine.find_optimal_route(1, 42, &options)?.into_route() {
//!     println!("{} hops", route.summary.hop_count());
//! }
//! ```

mod alternatives;

pub use alternatives::generate_route_alternatives;

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::cost::{ConditionsProvider, CostModel, RouteOptimizationOptions};
use crate::error::{Error, Result};
use crate::graph::{NodeId, NodeIndex, RouteGraph};
use crate::output::{assemble_route, OptimalRoute, RouteAlternatives, RouteSummary};
use crate::path::{search, SearchBudget, SearchOutcome};
use crate::snapshot::SharedGraph;

/// High-level route planning request.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: NodeId,
    pub goal: NodeId,
    pub options: RouteOptimizationOptions,
    /// Attach fastest/balanced/safest variants to a found route.
    pub include_alternatives: bool,
    /// Overrides the engine's default budget when set.
    pub budget: Option<SearchBudget>,
    /// Live data for the dynamic cost overlay.
    pub conditions: Option<Arc<dyn ConditionsProvider>>,
}

impl RouteRequest {
    pub fn new(start: NodeId, goal: NodeId) -> Self {
        Self {
            start,
            goal,
            options: RouteOptimizationOptions::default(),
            include_alternatives: false,
            budget: None,
            conditions: None,
        }
    }

    pub fn with_options(mut self, options: RouteOptimizationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_alternatives(mut self, include: bool) -> Self {
        self.include_alternatives = include;
        self
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_conditions(mut self, conditions: Arc<dyn ConditionsProvider>) -> Self {
        self.conditions = Some(conditions);
        self
    }
}

/// Result of a planning query that referenced valid nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutePlanOutcome {
    Found(OptimalRoute),
    /// Start and goal are not connected.
    NoRoute,
    /// The search hit its budget; a larger budget may still find a route.
    BudgetExceeded { expanded: usize },
}

impl RoutePlanOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, RoutePlanOutcome::Found(_))
    }

    pub fn route(&self) -> Option<&OptimalRoute> {
        match self {
            RoutePlanOutcome::Found(route) => Some(route),
            _ => None,
        }
    }

    pub fn into_route(self) -> Option<OptimalRoute> {
        match self {
            RoutePlanOutcome::Found(route) => Some(route),
            _ => None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Resolve node identifiers to arena handles, rejecting unknown ones.
fn resolve_endpoints(graph: &RouteGraph, start: NodeId, goal: NodeId) -> Result<(NodeIndex, NodeIndex)> {
    let start_index = graph.index_of(start).ok_or(Error::UnknownNode { id: start })?;
    let goal_index = graph.index_of(goal).ok_or(Error::UnknownNode { id: goal })?;
    Ok((start_index, goal_index))
}

/// Outcome of one search run before alternatives are attached.
enum SearchResult {
    Found(RouteSummary),
    NoRoute,
    BudgetExceeded { expanded: usize },
}

/// Search once with `options` and assemble the route if one is found.
fn search_and_assemble(
    graph: &RouteGraph,
    endpoints: (NodeIndex, NodeIndex),
    options: &RouteOptimizationOptions,
    request: &RouteRequest,
    config: &EngineConfig,
) -> SearchResult {
    let cost = CostModel::new(options).with_conditions(request.conditions.as_deref());
    let budget = request.budget.unwrap_or(config.budget);

    match search(graph, endpoints.0, endpoints.1, &cost, config.heuristic, &budget) {
        SearchOutcome::Found(path) => {
            SearchResult::Found(assemble_route(graph, &path.indices, path.cost))
        }
        SearchOutcome::Exhausted { .. } => SearchResult::NoRoute,
        SearchOutcome::BudgetExceeded { expanded } => SearchResult::BudgetExceeded { expanded },
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

/// Compute a route for `request` over a single graph snapshot.
///
/// Unknown start or goal identifiers are rejected before any search work.
/// A disconnected pair is reported as [`RoutePlanOutcome::NoRoute`], not as
/// an error.
pub fn plan_route(
    graph: &RouteGraph,
    request: &RouteRequest,
    config: &EngineConfig,
) -> Result<RoutePlanOutcome> {
    let endpoints = resolve_endpoints(graph, request.start, request.goal)?;

    let summary = match search_and_assemble(graph, endpoints, &request.options, request, config) {
        SearchResult::Found(summary) => summary,
        SearchResult::NoRoute => return Ok(RoutePlanOutcome::NoRoute),
        SearchResult::BudgetExceeded { expanded } => {
            return Ok(RoutePlanOutcome::BudgetExceeded { expanded })
        }
    };

    let mut route = OptimalRoute::new(summary);
    if request.include_alternatives {
        route = route.with_alternatives(alternatives::variants(graph, endpoints, request, config));
    }

    tracing::debug!(
        start = request.start,
        goal = request.goal,
        hops = route.summary.hop_count(),
        alternatives = route.alternatives.len(),
        alternatives_over_budget = route.alternatives_budget_exceeded.len(),
        "planned route"
    );
    Ok(RoutePlanOutcome::Found(route))
}

/// Routing engine for one region.
///
/// Owns a [`SharedGraph`] so the topology can be rebuilt and swapped while
/// other threads are searching; every query runs against the snapshot that
/// was current when it started.
#[derive(Debug, Clone)]
pub struct RouteEngine {
    graph: SharedGraph,
    config: EngineConfig,
}

impl RouteEngine {
    pub fn new(graph: RouteGraph) -> Self {
        Self::with_config(graph, EngineConfig::default())
    }

    pub fn with_config(graph: RouteGraph, config: EngineConfig) -> Self {
        Self {
            graph: SharedGraph::new(graph),
            config,
        }
    }

    pub fn from_shared(graph: SharedGraph, config: EngineConfig) -> Self {
        Self { graph, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle to the swappable graph, for data pipelines that refresh it.
    pub fn shared_graph(&self) -> &SharedGraph {
        &self.graph
    }

    /// Graph snapshot current at the time of the call.
    pub fn snapshot(&self) -> Arc<RouteGraph> {
        self.graph.load()
    }

    /// Find the lowest-cost route from `start` to `goal`.
    pub fn find_optimal_route(
        &self,
        start: NodeId,
        goal: NodeId,
        options: &RouteOptimizationOptions,
    ) -> Result<RoutePlanOutcome> {
        let request = RouteRequest::new(start, goal).with_options(options.clone());
        self.plan(&request)
    }

    /// Produce the fastest, balanced, and safest variants.
    pub fn generate_route_alternatives(
        &self,
        start: NodeId,
        goal: NodeId,
        options: &RouteOptimizationOptions,
    ) -> Result<RouteAlternatives> {
        let request = RouteRequest::new(start, goal).with_options(options.clone());
        let graph = self.graph.load();
        generate_route_alternatives(&graph, &request, &self.config)
    }

    /// Run a full request against the current snapshot.
    pub fn plan(&self, request: &RouteRequest) -> Result<RoutePlanOutcome> {
        let graph = self.graph.load();
        plan_route(&graph, request, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Coordinates, RouteEdge, RouteNode};

    fn pair_graph() -> RouteGraph {
        let mut graph = RouteGraph::new();
        graph.add_node(RouteNode::new(1, Coordinates::new(51.5, -0.12)));
        graph.add_node(RouteNode::new(2, Coordinates::new(51.5, -0.11)));
        graph.add_node(RouteNode::new(3, Coordinates::new(51.6, -0.11)));
        graph
            .add_bidirectional_edge(RouteEdge::new(1, 2, 70.0, 60.0, 700.0))
            .unwrap();
        graph
    }

    #[test]
    fn unknown_start_is_an_error() {
        let graph = pair_graph();
        let error = plan_route(&graph, &RouteRequest::new(8, 2), &EngineConfig::default())
            .expect_err("unknown start");
        assert!(format!("{error}").contains("unknown node: 8"));
    }

    #[test]
    fn unknown_goal_is_an_error() {
        let graph = pair_graph();
        let error = plan_route(&graph, &RouteRequest::new(1, 9), &EngineConfig::default())
            .expect_err("unknown goal");
        assert!(matches!(error, Error::UnknownNode { id: 9 }));
    }

    #[test]
    fn disconnected_pair_is_no_route() {
        let graph = pair_graph();
        let outcome = plan_route(&graph, &RouteRequest::new(1, 3), &EngineConfig::default())
            .expect("valid request");
        assert_eq!(outcome, RoutePlanOutcome::NoRoute);
        assert!(outcome.route().is_none());
    }

    #[test]
    fn request_budget_overrides_engine_default() {
        let graph = pair_graph();
        let request = RouteRequest::new(1, 2).with_budget(SearchBudget::unlimited().with_max_expansions(0));
        let outcome = plan_route(&graph, &request, &EngineConfig::default()).unwrap();
        assert_eq!(outcome, RoutePlanOutcome::BudgetExceeded { expanded: 0 });
    }

    #[test]
    fn alternatives_attach_only_when_requested() {
        let graph = pair_graph();
        let config = EngineConfig::default();

        let plain = plan_route(&graph, &RouteRequest::new(1, 2), &config)
            .unwrap()
            .into_route()
            .unwrap();
        assert!(plain.alternatives.is_empty());

        let with_alts = plan_route(&graph, &RouteRequest::new(1, 2).with_alternatives(true), &config)
            .unwrap()
            .into_route()
            .unwrap();
        assert_eq!(with_alts.alternatives.len(), 3);
    }
}
