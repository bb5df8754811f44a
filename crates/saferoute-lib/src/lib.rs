//! SafeRoute library entry points.
//!
//! This crate holds the safety-aware route optimizer: a graph store for the
//! routable network, a cost model that trades travel time against a safety
//! penalty, and an A* engine that produces routes with aggregated safety
//! metrics plus fastest/balanced/safest alternatives. Higher-level consumers
//! (CLI, services) should only depend on the functions exported here instead
//! of reimplementing behavior.
//!

#![deny(warnings)]

pub mod config;
pub mod cost;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod heuristic;
pub mod output;
pub mod path;
pub mod routing;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::EngineConfig;
pub use cost::{
    dynamic_edge_cost, edge_cost, safety_penalty, ConditionsProvider, CostModel, EdgeConditions,
    Incident, RealTimeConditions, RouteOptimizationOptions, TimeOfTravel, UniformConditions,
    WeatherCondition,
};
pub use dataset::{graph_from_str, load_graph, EdgeRecord, GraphDocument, NodeRecord};
pub use error::{Error, Result};
pub use graph::{
    Coordinates, Direction, NodeId, RoadType, RouteEdge, RouteGraph, RouteNode, SafetyFactors,
};
pub use heuristic::{haversine_distance, HeuristicMode, EARTH_RADIUS_METERS};
pub use output::{
    AlternativeRoute, BudgetExceededVariant, OptimalRoute, RouteAlternatives, RouteLabel,
    RouteSegment, RouteSummary,
};
pub use path::{find_path_a_star, FoundPath, SearchBudget, SearchOutcome};
pub use routing::{
    generate_route_alternatives, plan_route, RouteEngine, RoutePlanOutcome, RouteRequest,
};
pub use snapshot::SharedGraph;
