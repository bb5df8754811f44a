//! Loading routable graphs from JSON documents.
//!
//! The document is an interchange format for fixtures and the CLI: topology
//! and safety providers are expected to populate [`RouteGraph`] directly in
//! production.
//!
//! ```json
//! {
//!   "nodes": [{ "id": 1, "latitude": 12.97, "longitude": 77.59, "safety_score": 80 }],
//!   "edges": [{ "from": 1, "to": 2, "safety_score": 75, "travel_time": 60,
//!               "distance": 400, "road_type": "residential", "one_way": false }]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::{
    Coordinates, Direction, NodeId, RoadType, RouteEdge, RouteGraph, RouteNode, SafetyFactors,
};

fn default_safety_score() -> f64 {
    50.0
}

/// Node entry of a graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_safety_score")]
    pub safety_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Edge entry of a graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: NodeId,
    pub to: NodeId,
    pub safety_score: f64,
    pub travel_time: f64,
    pub distance: f64,
    /// Free-form classifier; unknown tags become [`RoadType::Other`].
    #[serde(default)]
    pub road_type: Option<String>,
    #[serde(default)]
    pub one_way: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factors: Option<SafetyFactors>,
}

/// Serialized form of a [`RouteGraph`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl GraphDocument {
    /// Build a graph, inserting all nodes before any edge.
    pub fn into_graph(self) -> Result<RouteGraph> {
        let mut graph = RouteGraph::new();

        for record in self.nodes {
            let mut node = RouteNode::new(
                record.id,
                Coordinates::new(record.latitude, record.longitude),
            )
            .with_safety_score(record.safety_score);
            if let Some(name) = record.name {
                node = node.with_name(name);
            }
            graph.add_node(node);
        }

        for record in self.edges {
            let road_type = record
                .road_type
                .as_deref()
                .map(RoadType::from_tag)
                .unwrap_or_default();
            let mut edge = RouteEdge::new(
                record.from,
                record.to,
                record.safety_score,
                record.travel_time,
                record.distance,
            )
            .with_road_type(road_type);
            if let Some(factors) = record.factors {
                edge = edge.with_factors(factors);
            }

            let direction = if record.one_way {
                Direction::OneWay
            } else {
                Direction::Bidirectional
            };
            graph.add_edge(edge, direction)?;
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built graph from document"
        );
        Ok(graph)
    }
}

/// Parse a graph document from a JSON string.
pub fn graph_from_str(json: &str) -> Result<RouteGraph> {
    let document: GraphDocument = serde_json::from_str(json)?;
    document.into_graph()
}

/// Load a graph document from disk.
pub fn load_graph(path: &Path) -> Result<RouteGraph> {
    let contents = fs::read_to_string(path).map_err(|source| Error::GraphDocument {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = graph_from_str(&contents)?;
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}
