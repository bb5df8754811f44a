// Test-only helpers for `saferoute-lib` unit tests
#![allow(dead_code)]
use crate::graph::{NodeId, RoadType, RouteEdge, SafetyFactors};

/// Builder to create `RouteEdge` instances in tests with sensible defaults.
pub struct EdgeBuilder {
    edge: RouteEdge,
}

impl EdgeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            edge: RouteEdge::new(1, 2, 100.0, 60.0, 500.0),
        }
    }

    pub fn between(mut self, from: NodeId, to: NodeId) -> Self {
        self.edge.from = from;
        self.edge.to = to;
        self
    }

    pub fn safety(mut self, score: f64) -> Self {
        self.edge.safety_score = score;
        self
    }

    pub fn time(mut self, seconds: f64) -> Self {
        self.edge.travel_time = seconds;
        self
    }

    pub fn distance(mut self, metres: f64) -> Self {
        self.edge.distance = metres;
        self
    }

    pub fn road_type(mut self, road_type: RoadType) -> Self {
        self.edge.road_type = road_type;
        self
    }

    pub fn factors(mut self, factors: SafetyFactors) -> Self {
        self.edge.factors = Some(factors);
        self
    }

    pub fn build(self) -> RouteEdge {
        self.edge
    }
}

impl Default for EdgeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
