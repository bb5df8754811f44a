//! Common test utilities and graph fixtures.
//!
//! Hand-built graphs for scenario tests plus seeded generators for the
//! property tests. Generators take an explicit `StdRng` so a failing seed can
//! be replayed.

#![allow(dead_code)]

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::Rng;
use saferoute_lib::{
    haversine_distance, Coordinates, NodeId, RoadType, RouteEdge, RouteGraph, RouteNode,
};

/// Path to fixtures directory shared with the CLI tests.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Small neighbourhood with a fast unlit corridor, a slower well-lit one,
/// an isolated depot and a one-way spur.
pub fn sample_region_path() -> PathBuf {
    fixtures_dir().join("sample_region.json")
}

pub const DIAMOND_START: NodeId = 1;
pub const DIAMOND_SAFE: NodeId = 2;
pub const DIAMOND_FAST: NodeId = 3;
pub const DIAMOND_GOAL: NodeId = 4;

/// Two symmetric routes from 1 to 4:
///
/// - `1 -> 2 -> 4`: safety 90, 10 s per edge
/// - `1 -> 3 -> 4`: safety 40, 5 s per edge
pub fn diamond_graph() -> RouteGraph {
    diamond_graph_with_safe_score(90.0)
}

pub fn diamond_graph_with_safe_score(safe_score: f64) -> RouteGraph {
    let mut graph = RouteGraph::new();
    graph.add_node(RouteNode::new(DIAMOND_START, Coordinates::new(0.0, 0.0)));
    graph.add_node(RouteNode::new(DIAMOND_SAFE, Coordinates::new(0.001, 0.001)));
    graph.add_node(RouteNode::new(DIAMOND_FAST, Coordinates::new(-0.001, 0.001)));
    graph.add_node(RouteNode::new(DIAMOND_GOAL, Coordinates::new(0.0, 0.002)));

    for (from, to) in [(DIAMOND_START, DIAMOND_SAFE), (DIAMOND_SAFE, DIAMOND_GOAL)] {
        graph
            .add_bidirectional_edge(RouteEdge::new(from, to, safe_score, 10.0, 157.0))
            .expect("diamond nodes exist");
    }
    for (from, to) in [(DIAMOND_START, DIAMOND_FAST), (DIAMOND_FAST, DIAMOND_GOAL)] {
        graph
            .add_bidirectional_edge(RouteEdge::new(from, to, 40.0, 5.0, 157.0))
            .expect("diamond nodes exist");
    }
    graph
}

pub const MIXED_START: NodeId = 1;
pub const MIXED_SPLIT: NodeId = 2;
pub const MIXED_STEADY: NodeId = 4;
pub const MIXED_GOAL: NodeId = 3;

/// Two routes from 1 to 3 where the mean score misleads:
///
/// - `1 -> 2 -> 3`: one perfect edge then one scored 0, 5 s each (mean 50)
/// - `1 -> 4 -> 3`: two edges scored 45, 50 s each (mean 45)
pub fn mixed_score_graph() -> RouteGraph {
    let mut graph = RouteGraph::new();
    graph.add_node(RouteNode::new(MIXED_START, Coordinates::new(0.0, 0.0)));
    graph.add_node(RouteNode::new(MIXED_SPLIT, Coordinates::new(0.001, 0.001)));
    graph.add_node(RouteNode::new(MIXED_STEADY, Coordinates::new(-0.001, 0.001)));
    graph.add_node(RouteNode::new(MIXED_GOAL, Coordinates::new(0.0, 0.002)));

    for (from, to, score, time) in [
        (MIXED_START, MIXED_SPLIT, 100.0, 5.0),
        (MIXED_SPLIT, MIXED_GOAL, 0.0, 5.0),
        (MIXED_START, MIXED_STEADY, 45.0, 50.0),
        (MIXED_STEADY, MIXED_GOAL, 45.0, 50.0),
    ] {
        graph
            .add_bidirectional_edge(RouteEdge::new(from, to, score, time, 157.0))
            .expect("mixed nodes exist");
    }
    graph
}

/// Nodes 1 and 2 connected, node 3 with no edges.
pub fn graph_with_isolated_node() -> RouteGraph {
    let mut graph = RouteGraph::new();
    graph.add_node(RouteNode::new(1, Coordinates::new(0.0, 0.0)));
    graph.add_node(RouteNode::new(2, Coordinates::new(0.0, 0.001)));
    graph.add_node(RouteNode::new(3, Coordinates::new(0.01, 0.01)));
    graph
        .add_bidirectional_edge(RouteEdge::new(1, 2, 70.0, 30.0, 111.0))
        .expect("nodes exist");
    graph
}

const ROAD_TYPES: [RoadType; 7] = [
    RoadType::Highway,
    RoadType::Primary,
    RoadType::Secondary,
    RoadType::Residential,
    RoadType::Footway,
    RoadType::Cycleway,
    RoadType::Path,
];

pub fn grid_node_id(cols: usize, row: usize, col: usize) -> NodeId {
    (row * cols + col + 1) as NodeId
}

/// Random 4-neighbour grid with roughly 10% one-way streets.
pub fn random_grid(rng: &mut StdRng, rows: usize, cols: usize) -> RouteGraph {
    let mut graph = RouteGraph::new();
    for row in 0..rows {
        for col in 0..cols {
            let node = RouteNode::new(
                grid_node_id(cols, row, col),
                Coordinates::new(12.9 + row as f64 * 0.001, 77.5 + col as f64 * 0.001),
            )
            .with_safety_score(rng.random_range(0.0..=100.0));
            graph.add_node(node);
        }
    }

    for row in 0..rows {
        for col in 0..cols {
            let from = grid_node_id(cols, row, col);
            let mut targets = Vec::with_capacity(2);
            if col + 1 < cols {
                targets.push(grid_node_id(cols, row, col + 1));
            }
            if row + 1 < rows {
                targets.push(grid_node_id(cols, row + 1, col));
            }

            for to in targets {
                let edge = random_edge(rng, &graph, from, to);
                if rng.random_bool(0.1) {
                    graph.add_one_way_edge(edge).expect("grid nodes exist");
                } else {
                    graph.add_bidirectional_edge(edge).expect("grid nodes exist");
                }
            }
        }
    }
    graph
}

fn random_edge(rng: &mut StdRng, graph: &RouteGraph, from: NodeId, to: NodeId) -> RouteEdge {
    let span = haversine_distance(
        graph.node(from).expect("from exists").coordinates,
        graph.node(to).expect("to exists").coordinates,
    );
    let distance = span * rng.random_range(1.0..1.3);
    let speed = rng.random_range(1.0..15.0);
    let road_type = ROAD_TYPES[rng.random_range(0..ROAD_TYPES.len())];

    RouteEdge::new(
        from,
        to,
        rng.random_range(0.0..=100.0),
        distance / speed,
        distance,
    )
    .with_road_type(road_type)
}

pub const PARALLEL_START: NodeId = 0;
pub const PARALLEL_GOAL: NodeId = 1;

/// Independent corridors from [`PARALLEL_START`] to [`PARALLEL_GOAL`].
///
/// Every corridor has `segments` edges (at least 2) and a single safety score
/// shared by all of them, so a corridor's penalty is `segments` times the
/// penalty of its score and the safest corridor is the best-scored one.
pub fn random_parallel_paths(rng: &mut StdRng, paths: usize, segments: usize) -> RouteGraph {
    assert!(segments >= 2, "corridors need an interior node");

    let mut graph = RouteGraph::new();
    graph.add_node(RouteNode::new(PARALLEL_START, Coordinates::new(0.0, 0.0)));
    graph.add_node(RouteNode::new(PARALLEL_GOAL, Coordinates::new(0.0, 0.01)));

    for path in 0..paths {
        let score = rng.random_range(0.0..=100.0);
        let offset = (path as f64 - paths as f64 / 2.0) * 0.001;

        let mut previous = PARALLEL_START;
        for step in 1..=segments {
            let next = if step == segments {
                PARALLEL_GOAL
            } else {
                let id = 100 * (path as NodeId + 1) + step as NodeId;
                let lon = step as f64 * 0.01 / segments as f64;
                graph.add_node(RouteNode::new(id, Coordinates::new(offset, lon)));
                id
            };

            let edge = RouteEdge::new(
                previous,
                next,
                score,
                rng.random_range(10.0..100.0),
                rng.random_range(100.0..400.0),
            );
            graph.add_bidirectional_edge(edge).expect("corridor nodes exist");
            previous = next;
        }
    }
    graph
}

pub fn assert_close(actual: f64, expected: f64, context: &str) {
    let tolerance = 1e-6 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "{context}: expected {expected}, got {actual}"
    );
}
