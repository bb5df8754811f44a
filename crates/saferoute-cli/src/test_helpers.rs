// Test utilities used across `saferoute-cli` unit tests.
// Kept under `#[cfg(test)]` so it is not part of the public crate API.
use saferoute_lib::{
    Coordinates, OptimalRoute, RoadType, RouteEdge, RouteEngine, RouteGraph, RouteNode,
    RouteRequest,
};

/// Square with a lit residential side (1 -> 2 -> 4) and a fast, poorly rated
/// side (1 -> 3 -> 4).
pub fn sample_graph() -> RouteGraph {
    let mut graph = RouteGraph::new();
    graph.add_node(RouteNode::new(1, Coordinates::new(0.0, 0.0)));
    graph.add_node(RouteNode::new(2, Coordinates::new(0.0009, 0.0)));
    graph.add_node(RouteNode::new(3, Coordinates::new(0.0, 0.0009)));
    graph.add_node(RouteNode::new(4, Coordinates::new(0.0009, 0.0009)));

    for (from, to) in [(1, 2), (2, 4)] {
        graph
            .add_bidirectional_edge(
                RouteEdge::new(from, to, 90.0, 10.0, 100.0).with_road_type(RoadType::Residential),
            )
            .expect("sample nodes exist");
    }
    for (from, to) in [(1, 3), (3, 4)] {
        graph
            .add_bidirectional_edge(RouteEdge::new(from, to, 20.0, 4.0, 100.0))
            .expect("sample nodes exist");
    }
    graph
}

pub fn sample_engine() -> RouteEngine {
    RouteEngine::new(sample_graph())
}

/// Balanced route from 1 to 4, optionally with its three alternatives.
pub fn sample_route(include_alternatives: bool) -> OptimalRoute {
    let request = RouteRequest::new(1, 4).with_alternatives(include_alternatives);
    sample_engine()
        .plan(&request)
        .expect("known endpoints")
        .into_route()
        .expect("sample graph is connected")
}
