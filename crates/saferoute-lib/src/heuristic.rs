//! Heuristic estimator for the A* search.

use serde::{Deserialize, Serialize};

use crate::cost::{safety_penalty, CostModel, RouteOptimizationOptions};
use crate::graph::{Coordinates, NodeIndex, RouteGraph};

/// Mean Earth radius used by the great-circle estimate, in metres.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in metres.
pub fn haversine_distance(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// How the search converts geographic distance into an estimate of
/// remaining cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicMode {
    /// Great-circle distance scaled by the cheapest cost per metre any edge
    /// achieves under the current options. Never overestimates, so the
    /// search stays optimal at every safety preference.
    #[default]
    CostScaled,
    /// Raw great-circle distance in metres. Cheap, but it mixes units with
    /// the cost function and can overestimate when safety dominates, so
    /// returned routes are not guaranteed optimal.
    Geographic,
    /// No estimate; the search degenerates to Dijkstra's algorithm.
    None,
}

impl std::str::FromStr for HeuristicMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cost_scaled" | "cost-scaled" | "scaled" => Ok(HeuristicMode::CostScaled),
            "geographic" | "haversine" => Ok(HeuristicMode::Geographic),
            "none" | "dijkstra" => Ok(HeuristicMode::None),
            other => Err(format!("unknown heuristic mode '{other}'")),
        }
    }
}

/// Estimate of remaining cost from any node to a fixed goal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Heuristic {
    goal: Coordinates,
    scale: f64,
}

impl Heuristic {
    pub(crate) fn new(
        mode: HeuristicMode,
        graph: &RouteGraph,
        goal: NodeIndex,
        cost: &CostModel<'_>,
    ) -> Self {
        let scale = match mode {
            HeuristicMode::CostScaled => graph.span_bounds().cost_per_meter(cost.options()),
            HeuristicMode::Geographic => 1.0,
            HeuristicMode::None => 0.0,
        };
        Self {
            goal: graph.node_at(goal).coordinates,
            scale,
        }
    }

    pub(crate) fn estimate(&self, graph: &RouteGraph, node: NodeIndex) -> f64 {
        if self.scale == 0.0 {
            return 0.0;
        }
        self.scale * haversine_distance(graph.node_at(node).coordinates, self.goal)
    }
}

/// Per-metre lower bounds on the two cost terms, taken over every edge of a
/// graph and measured against the great-circle length between endpoints.
///
/// Independent of route options, so a graph computes them once and every
/// query scales them in constant time. For every edge `u -> v` and any
/// options, `cost(u, v) >= cost_per_meter * d(u, v) >= h(u) - h(v)`, which
/// keeps the scaled estimate consistent. Live conditions only ever raise
/// cost, so they cannot break the bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SpanBounds {
    /// Minimum of `travel_time * road_multiplier / span`.
    time_per_meter: f64,
    /// Minimum of `safety_penalty * road_multiplier / span`.
    penalty_per_meter: f64,
}

impl SpanBounds {
    pub(crate) fn scan(graph: &RouteGraph) -> Self {
        let mut bounds = Self {
            time_per_meter: f64::INFINITY,
            penalty_per_meter: f64::INFINITY,
        };
        for (edge, from, to) in graph.indexed_edges() {
            let span =
                haversine_distance(graph.node_at(from).coordinates, graph.node_at(to).coordinates);
            if span <= 0.0 {
                continue;
            }
            let road = edge.road_type.multiplier();
            bounds.time_per_meter = bounds.time_per_meter.min(edge.travel_time * road / span);
            bounds.penalty_per_meter = bounds
                .penalty_per_meter
                .min(safety_penalty(edge.safety_score) * road / span);
        }
        bounds
    }

    /// Lowest cost per metre any edge can have under normalised `options`.
    pub(crate) fn cost_per_meter(&self, options: &RouteOptimizationOptions) -> f64 {
        if !self.time_per_meter.is_finite() || !self.penalty_per_meter.is_finite() {
            return 0.0;
        }
        let safety_weight = options.safety_preference / 100.0;
        let blended =
            (1.0 - safety_weight) * self.time_per_meter + safety_weight * self.penalty_per_meter;
        blended * options.contextual_floor() * options.time_of_day_multiplier()
    }
}
