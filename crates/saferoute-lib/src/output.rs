//! Route assembly and the route values handed to presentation layers.

use std::fmt;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoJsonValue};
use serde::Serialize;
use serde_json::json;

use crate::graph::{Coordinates, NodeId, NodeIndex, RoadType, RouteGraph, SafetyFactors};

/// Label attached to each generated variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteLabel {
    Fastest,
    Balanced,
    Safest,
}

impl RouteLabel {
    /// Variants in the order they are generated and reported.
    pub const ALL: [RouteLabel; 3] = [RouteLabel::Fastest, RouteLabel::Balanced, RouteLabel::Safest];

    /// Safety preference used to produce this variant.
    pub fn safety_preference(self) -> f64 {
        match self {
            RouteLabel::Fastest => 0.0,
            RouteLabel::Balanced => 50.0,
            RouteLabel::Safest => 100.0,
        }
    }
}

impl fmt::Display for RouteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteLabel::Fastest => "fastest",
            RouteLabel::Balanced => "balanced",
            RouteLabel::Safest => "safest",
        };
        f.write_str(value)
    }
}

/// One traversed edge of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegment {
    pub from: NodeId,
    pub to: NodeId,
    pub distance: f64,
    pub travel_time: f64,
    pub safety_score: f64,
    pub road_type: RoadType,
}

/// Aggregated metrics and geometry of a single path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Node identifiers from start to goal, inclusive.
    pub path: Vec<NodeId>,
    /// Metres.
    pub total_distance: f64,
    /// Seconds.
    pub total_time: f64,
    /// Arithmetic mean of segment safety scores (100 for an empty route).
    pub average_safety_score: f64,
    pub safety_factors: SafetyFactors,
    pub geometry: Vec<Coordinates>,
    pub segments: Vec<RouteSegment>,
    /// Value of the objective the search minimised.
    pub total_cost: f64,
}

impl RouteSummary {
    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<NodeId> {
        self.path.first().copied()
    }

    pub fn goal(&self) -> Option<NodeId> {
        self.path.last().copied()
    }

    /// GeoJSON `LineString` feature for the route geometry.
    pub fn to_feature(&self, label: Option<RouteLabel>) -> Feature {
        let line: Vec<Vec<f64>> = self
            .geometry
            .iter()
            .map(|point| vec![point.longitude, point.latitude])
            .collect();

        let mut properties = JsonObject::new();
        properties.insert("distance_m".to_string(), json!(self.total_distance));
        properties.insert("duration_s".to_string(), json!(self.total_time));
        properties.insert("safety_score".to_string(), json!(self.average_safety_score));
        properties.insert("nodes".to_string(), json!(self.path));
        if let Some(label) = label {
            properties.insert("label".to_string(), json!(label.to_string()));
        }

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoJsonValue::LineString(line))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// Labelled variant of a route. Variants never nest further alternatives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativeRoute {
    pub label: RouteLabel,
    #[serde(flatten)]
    pub summary: RouteSummary,
}

/// Variant whose search stopped at its budget before settling the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetExceededVariant {
    pub label: RouteLabel,
    pub expanded: usize,
}

/// Labelled variants generated for one request.
///
/// A variant with no route is absent from both lists. One that ran out of
/// budget is listed in `budget_exceeded` so callers can retry it with a
/// larger budget.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteAlternatives {
    pub routes: Vec<AlternativeRoute>,
    pub budget_exceeded: Vec<BudgetExceededVariant>,
}

impl RouteAlternatives {
    pub fn get(&self, label: RouteLabel) -> Option<&AlternativeRoute> {
        self.routes.iter().find(|alt| alt.label == label)
    }

    /// True when no variant found a route and at least one hit its budget.
    pub fn is_budget_limited(&self) -> bool {
        self.routes.is_empty() && !self.budget_exceeded.is_empty()
    }

    /// True when no variant found a route and none hit its budget.
    pub fn is_no_route(&self) -> bool {
        self.routes.is_empty() && self.budget_exceeded.is_empty()
    }

    /// Largest expansion count among the variants that ran out of budget.
    pub fn max_expanded(&self) -> usize {
        self.budget_exceeded
            .iter()
            .map(|variant| variant.expanded)
            .max()
            .unwrap_or(0)
    }
}

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimalRoute {
    #[serde(flatten)]
    pub summary: RouteSummary,
    pub alternatives: Vec<AlternativeRoute>,
    /// Requested variants whose search ran out of budget.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives_budget_exceeded: Vec<BudgetExceededVariant>,
}

impl OptimalRoute {
    pub fn new(summary: RouteSummary) -> Self {
        Self {
            summary,
            alternatives: Vec::new(),
            alternatives_budget_exceeded: Vec::new(),
        }
    }

    /// Attach generated variants to this route.
    pub fn with_alternatives(mut self, alternatives: RouteAlternatives) -> Self {
        self.alternatives = alternatives.routes;
        self.alternatives_budget_exceeded = alternatives.budget_exceeded;
        self
    }

    pub fn alternative(&self, label: RouteLabel) -> Option<&AlternativeRoute> {
        self.alternatives.iter().find(|alt| alt.label == label)
    }

    /// GeoJSON collection holding the route followed by its alternatives.
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features = vec![self.summary.to_feature(None)];
        features.extend(
            self.alternatives
                .iter()
                .map(|alt| alt.summary.to_feature(Some(alt.label))),
        );

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

/// Build a [`RouteSummary`] from a node path found in `graph`.
///
/// Consecutive nodes must be joined by a directed edge; the search only
/// produces such paths.
pub(crate) fn assemble_route(graph: &RouteGraph, indices: &[NodeIndex], total_cost: f64) -> RouteSummary {
    let path: Vec<NodeId> = indices.iter().map(|&i| graph.node_at(i).id).collect();
    let geometry: Vec<Coordinates> = indices
        .iter()
        .map(|&i| graph.node_at(i).coordinates)
        .collect();

    let mut segments = Vec::with_capacity(indices.len().saturating_sub(1));
    let mut total_distance = 0.0;
    let mut total_time = 0.0;
    let mut safety_sum = 0.0;
    let mut factor_sum = SafetyFactors {
        lighting: 0.0,
        footfall: 0.0,
        hazards: 0.0,
        proximity: 0.0,
    };

    for pair in indices.windows(2) {
        let Some(edge) = graph.edge_between(pair[0], pair[1]) else {
            tracing::warn!(
                from = graph.node_at(pair[0]).id,
                to = graph.node_at(pair[1]).id,
                "path step has no backing edge"
            );
            continue;
        };

        total_distance += edge.distance;
        total_time += edge.travel_time;
        safety_sum += edge.safety_score;

        let factors = edge.safety_factors();
        factor_sum.lighting += factors.lighting;
        factor_sum.footfall += factors.footfall;
        factor_sum.hazards += factors.hazards;
        factor_sum.proximity += factors.proximity;

        segments.push(RouteSegment {
            from: edge.from,
            to: edge.to,
            distance: edge.distance,
            travel_time: edge.travel_time,
            safety_score: edge.safety_score,
            road_type: edge.road_type,
        });
    }

    let (average_safety_score, safety_factors) = if segments.is_empty() {
        (100.0, SafetyFactors::VACUOUS)
    } else {
        let count = segments.len() as f64;
        (
            safety_sum / count,
            SafetyFactors {
                lighting: factor_sum.lighting / count,
                footfall: factor_sum.footfall / count,
                hazards: factor_sum.hazards / count,
                proximity: factor_sum.proximity / count,
            },
        )
    };

    RouteSummary {
        path,
        total_distance,
        total_time,
        average_safety_score,
        safety_factors,
        geometry,
        segments,
        total_cost,
    }
}
