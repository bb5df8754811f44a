//! Graph store for the routable network.
//!
//! Nodes and directed edges live in flat arenas. Public identifiers
//! ([`NodeId`]) are interned into dense `u32` handles on insertion, so the
//! search loop only touches vectors. The store is built once per region and
//! then shared read-only between searches; see [`crate::snapshot`] for the
//! swap-based refresh path.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::heuristic::SpanBounds;

/// Stable identifier of an intersection or path point.
pub type NodeId = i64;

/// Dense arena handle for a node.
pub(crate) type NodeIndex = u32;

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Road classifier attached to every edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoadType {
    Highway,
    Primary,
    #[default]
    Secondary,
    Residential,
    Footway,
    Cycleway,
    Path,
    /// Anything the data provider tagged with a classifier we do not know.
    Other,
}

impl RoadType {
    /// Cost multiplier applied by the cost evaluator.
    pub fn multiplier(self) -> f64 {
        match self {
            RoadType::Highway => 1.2,
            RoadType::Primary => 1.1,
            RoadType::Secondary => 1.0,
            RoadType::Residential => 0.9,
            RoadType::Footway => 0.8,
            RoadType::Cycleway => 0.85,
            RoadType::Path => 0.9,
            RoadType::Other => 1.0,
        }
    }

    /// Parse a provider tag, mapping unknown classifiers to [`RoadType::Other`].
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or(RoadType::Other)
    }
}

impl FromStr for RoadType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "highway" | "motorway" | "trunk" => Ok(RoadType::Highway),
            "primary" => Ok(RoadType::Primary),
            "secondary" | "tertiary" => Ok(RoadType::Secondary),
            "residential" | "living_street" => Ok(RoadType::Residential),
            "footway" | "pedestrian" => Ok(RoadType::Footway),
            "cycleway" => Ok(RoadType::Cycleway),
            "path" | "track" => Ok(RoadType::Path),
            other => Err(format!("unknown road type '{other}'")),
        }
    }
}

impl fmt::Display for RoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RoadType::Highway => "highway",
            RoadType::Primary => "primary",
            RoadType::Secondary => "secondary",
            RoadType::Residential => "residential",
            RoadType::Footway => "footway",
            RoadType::Cycleway => "cycleway",
            RoadType::Path => "path",
            RoadType::Other => "other",
        };
        f.write_str(value)
    }
}

/// Per-factor safety signals behind an edge's composite score.
///
/// All values are 0-100. `hazards` is an inverse signal: higher means more
/// hazardous.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyFactors {
    pub lighting: f64,
    pub footfall: f64,
    pub hazards: f64,
    pub proximity: f64,
}

impl SafetyFactors {
    /// Breakdown reported for routes without any segment.
    pub const VACUOUS: SafetyFactors = SafetyFactors {
        lighting: 100.0,
        footfall: 100.0,
        hazards: 0.0,
        proximity: 100.0,
    };

    /// Derive a flat breakdown from a composite score when the provider did
    /// not supply individual factors.
    pub fn from_composite(score: f64) -> Self {
        let score = clamp_score(score);
        Self {
            lighting: score,
            footfall: score,
            hazards: 100.0 - score,
            proximity: score,
        }
    }
}

/// Intersection or path point in the routable network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteNode {
    pub id: NodeId,
    pub coordinates: Coordinates,
    /// Aggregate safety score of the point itself (0-100).
    pub safety_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Outgoing adjacency, maintained by [`RouteGraph`].
    neighbours: Vec<NodeId>,
}

impl RouteNode {
    pub fn new(id: NodeId, coordinates: Coordinates) -> Self {
        Self {
            id,
            coordinates,
            safety_score: 50.0,
            name: None,
            neighbours: Vec::new(),
        }
    }

    pub fn with_safety_score(mut self, score: f64) -> Self {
        self.safety_score = clamp_score(score);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Targets of outgoing edges, in edge insertion order.
    pub fn neighbours(&self) -> &[NodeId] {
        &self.neighbours
    }
}

/// Directed road or path segment keyed by `(from, to)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// Composite safety score, 0-100 (higher is safer).
    pub safety_score: f64,
    /// Travel time in seconds.
    pub travel_time: f64,
    /// Length in metres.
    pub distance: f64,
    pub road_type: RoadType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factors: Option<SafetyFactors>,
}

impl RouteEdge {
    pub fn new(
        from: NodeId,
        to: NodeId,
        safety_score: f64,
        travel_time: f64,
        distance: f64,
    ) -> Self {
        Self {
            from,
            to,
            safety_score,
            travel_time,
            distance,
            road_type: RoadType::default(),
            factors: None,
        }
    }

    pub fn with_road_type(mut self, road_type: RoadType) -> Self {
        self.road_type = road_type;
        self
    }

    pub fn with_factors(mut self, factors: SafetyFactors) -> Self {
        self.factors = Some(factors);
        self
    }

    /// Mirror of this edge travelling `to -> from` with identical attributes.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            ..self.clone()
        }
    }

    /// Safety breakdown for this segment, falling back to the composite score.
    pub fn safety_factors(&self) -> SafetyFactors {
        self.factors
            .unwrap_or_else(|| SafetyFactors::from_composite(self.safety_score))
    }

    fn validate(&self) -> Result<()> {
        let reason = if !self.travel_time.is_finite() || self.travel_time < 0.0 {
            Some(format!("travel time {} is not a finite non-negative value", self.travel_time))
        } else if !self.distance.is_finite() || self.distance < 0.0 {
            Some(format!("distance {} is not a finite non-negative value", self.distance))
        } else if self.safety_score.is_nan() {
            Some("safety score is NaN".to_string())
        } else {
            None
        };

        match reason {
            Some(reason) => Err(Error::InvalidEdge {
                from: self.from,
                to: self.to,
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// Whether an inserted segment may be travelled in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Bidirectional,
    OneWay,
}

/// Routable network for a single region.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    nodes: Vec<RouteNode>,
    node_index: HashMap<NodeId, NodeIndex>,
    edges: Vec<RouteEdge>,
    /// `(from, to)` arena handles for each edge, parallel to `edges`.
    endpoints: Vec<(NodeIndex, NodeIndex)>,
    edge_index: HashMap<(NodeIndex, NodeIndex), usize>,
    /// Outgoing edge handles per node, in insertion order.
    adjacency: Vec<Vec<usize>>,
    /// Heuristic bounds, computed on first use and reset on any mutation.
    span_bounds: OnceLock<SpanBounds>,
}

impl RouteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, or replace the attributes of an existing one.
    ///
    /// Replacing a node keeps its adjacency; the `neighbours` carried by the
    /// argument are ignored since only edges define adjacency.
    pub fn add_node(&mut self, mut node: RouteNode) {
        self.span_bounds = OnceLock::new();
        node.safety_score = clamp_score(node.safety_score);
        if let Some(&index) = self.node_index.get(&node.id) {
            let existing = &mut self.nodes[index as usize];
            node.neighbours = std::mem::take(&mut existing.neighbours);
            *existing = node;
            return;
        }

        node.neighbours.clear();
        let index = self.nodes.len() as NodeIndex;
        self.node_index.insert(node.id, index);
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
    }

    /// Insert an edge, mirroring it when `direction` is bidirectional.
    pub fn add_edge(&mut self, edge: RouteEdge, direction: Direction) -> Result<()> {
        edge.validate()?;
        // Resolve both endpoints first so a failure leaves the store untouched.
        let from = self.require(edge.from)?;
        let to = self.require(edge.to)?;

        if direction == Direction::Bidirectional {
            let mirror = edge.reversed();
            self.insert_directed(edge, from, to);
            self.insert_directed(mirror, to, from);
        } else {
            self.insert_directed(edge, from, to);
        }
        Ok(())
    }

    /// Insert `edge` together with its reverse.
    pub fn add_bidirectional_edge(&mut self, edge: RouteEdge) -> Result<()> {
        self.add_edge(edge, Direction::Bidirectional)
    }

    /// Insert `edge` only in its stated direction.
    pub fn add_one_way_edge(&mut self, edge: RouteEdge) -> Result<()> {
        self.add_edge(edge, Direction::OneWay)
    }

    fn insert_directed(&mut self, mut edge: RouteEdge, from: NodeIndex, to: NodeIndex) {
        self.span_bounds = OnceLock::new();
        edge.safety_score = clamp_score(edge.safety_score);
        if let Some(&existing) = self.edge_index.get(&(from, to)) {
            self.edges[existing] = edge;
            return;
        }

        let handle = self.edges.len();
        let target = edge.to;
        self.edges.push(edge);
        self.endpoints.push((from, to));
        self.edge_index.insert((from, to), handle);
        self.adjacency[from as usize].push(handle);
        self.nodes[from as usize].neighbours.push(target);
    }

    fn require(&self, id: NodeId) -> Result<NodeIndex> {
        self.index_of(id).ok_or(Error::UnknownNode { id })
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&RouteNode> {
        self.index_of(id).map(|index| self.node_at(index))
    }

    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&RouteEdge> {
        let key = (self.index_of(from)?, self.index_of(to)?);
        self.edge_index.get(&key).map(|&handle| &self.edges[handle])
    }

    /// Edges leaving `id`, in insertion order. Unknown nodes have none.
    pub fn neighbours(&self, id: NodeId) -> Vec<&RouteEdge> {
        self.index_of(id)
            .map(|index| self.out_edges(index).map(|(edge, _)| edge).collect())
            .unwrap_or_default()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RouteNode> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &RouteEdge> {
        self.edges.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_index.get(&id).copied()
    }

    pub(crate) fn node_at(&self, index: NodeIndex) -> &RouteNode {
        &self.nodes[index as usize]
    }

    pub(crate) fn edge_between(&self, from: NodeIndex, to: NodeIndex) -> Option<&RouteEdge> {
        self.edge_index
            .get(&(from, to))
            .map(|&handle| &self.edges[handle])
    }

    /// Outgoing edges of `index` with the arena handle of their target.
    pub(crate) fn out_edges(
        &self,
        index: NodeIndex,
    ) -> impl Iterator<Item = (&RouteEdge, NodeIndex)> + '_ {
        self.adjacency[index as usize]
            .iter()
            .map(move |&handle| (&self.edges[handle], self.endpoints[handle].1))
    }

    pub(crate) fn span_bounds(&self) -> SpanBounds {
        *self.span_bounds.get_or_init(|| SpanBounds::scan(self))
    }

    /// Every edge with the arena handles of both endpoints.
    pub(crate) fn indexed_edges(
        &self,
    ) -> impl Iterator<Item = (&RouteEdge, NodeIndex, NodeIndex)> + '_ {
        self.edges
            .iter()
            .zip(self.endpoints.iter())
            .map(|(edge, &(from, to))| (edge, from, to))
    }
}

/// Clamp a safety score into 0-100.
pub(crate) fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}
