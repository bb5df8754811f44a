//! A* search over a [`RouteGraph`].
//!
//! The open set is a binary min-heap keyed by `f = g + h`. Stale heap entries
//! are skipped lazily when popped instead of being decreased in place. Ties
//! on `f` are broken by the lowest [`NodeId`], and neighbours are relaxed in
//! edge insertion order, so identical inputs always yield the same path.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::cost::CostModel;
use crate::graph::{NodeId, NodeIndex, RouteGraph};
use crate::heuristic::{Heuristic, HeuristicMode};

/// Caller-imposed limits on a single search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    /// Maximum number of nodes moved to the closed set.
    pub max_expansions: Option<usize>,
    /// Wall-clock limit in milliseconds.
    pub max_duration_ms: Option<u64>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    pub fn with_max_duration(mut self, limit: Duration) -> Self {
        self.max_duration_ms = Some(limit.as_millis().min(u64::MAX as u128) as u64);
        self
    }

    fn deadline(&self, started: Instant) -> Option<Instant> {
        self.max_duration_ms
            .map(|ms| started + Duration::from_millis(ms))
    }
}

/// Node sequence found by the search.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundPath {
    pub nodes: Vec<NodeId>,
    /// Sum of edge costs along `nodes`.
    pub cost: f64,
    /// Nodes expanded before the goal was reached.
    pub expanded: usize,
    pub(crate) indices: Vec<NodeIndex>,
}

/// Terminal state of a search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(FoundPath),
    /// The open set emptied without reaching the goal.
    Exhausted { expanded: usize },
    /// The search was cut short by its [`SearchBudget`].
    BudgetExceeded { expanded: usize },
}

/// Run A* from `start` to `goal` under `cost`.
///
/// Returns `None` when either endpoint is unknown to the graph.
pub fn find_path_a_star(
    graph: &RouteGraph,
    start: NodeId,
    goal: NodeId,
    cost: &CostModel<'_>,
    heuristic: HeuristicMode,
    budget: &SearchBudget,
) -> Option<SearchOutcome> {
    let start_index = graph.index_of(start)?;
    let goal_index = graph.index_of(goal)?;
    Some(search(graph, start_index, goal_index, cost, heuristic, budget))
}

pub(crate) fn search(
    graph: &RouteGraph,
    start: NodeIndex,
    goal: NodeIndex,
    cost: &CostModel<'_>,
    mode: HeuristicMode,
    budget: &SearchBudget,
) -> SearchOutcome {
    let started = Instant::now();
    let deadline = budget.deadline(started);
    let node_count = graph.node_count();

    let mut g_score = vec![f64::INFINITY; node_count];
    let mut parents: Vec<Option<NodeIndex>> = vec![None; node_count];
    let mut closed = vec![false; node_count];
    let mut open = BinaryHeap::new();
    let mut expanded = 0usize;

    // Cost-scaled estimates need a pass over every edge; skip it when the
    // answer is trivially the start node.
    let heuristic = if start == goal {
        Heuristic::new(HeuristicMode::None, graph, goal, cost)
    } else {
        Heuristic::new(mode, graph, goal, cost)
    };

    g_score[start as usize] = 0.0;
    open.push(AStarEntry::new(
        start,
        graph.node_at(start).id,
        0.0,
        heuristic.estimate(graph, start),
    ));

    while let Some(entry) = open.pop() {
        let current = entry.index;
        if closed[current as usize] || entry.cost.0 > g_score[current as usize] {
            continue;
        }

        if current == goal {
            let indices = reconstruct_path(&parents, start, goal);
            let nodes = indices.iter().map(|&i| graph.node_at(i).id).collect();
            tracing::debug!(
                expanded,
                cost = entry.cost.0,
                elapsed_us = started.elapsed().as_micros() as u64,
                "route found"
            );
            return SearchOutcome::Found(FoundPath {
                nodes,
                cost: entry.cost.0,
                expanded,
                indices,
            });
        }

        if budget.max_expansions.is_some_and(|limit| expanded >= limit)
            || deadline.is_some_and(|deadline| Instant::now() >= deadline)
        {
            tracing::warn!(expanded, "search budget exceeded before reaching goal");
            return SearchOutcome::BudgetExceeded { expanded };
        }

        closed[current as usize] = true;
        expanded += 1;

        let current_g = g_score[current as usize];
        for (edge, next) in graph.out_edges(current) {
            if closed[next as usize] {
                continue;
            }

            let tentative_g = current_g + cost.cost(edge);
            if tentative_g < g_score[next as usize] {
                tracing::trace!(from = edge.from, to = edge.to, tentative_g, "relaxed edge");
                g_score[next as usize] = tentative_g;
                parents[next as usize] = Some(current);
                open.push(AStarEntry::new(
                    next,
                    edge.to,
                    tentative_g,
                    heuristic.estimate(graph, next),
                ));
            }
        }
    }

    tracing::debug!(expanded, "open set exhausted without reaching goal");
    SearchOutcome::Exhausted { expanded }
}

fn reconstruct_path(
    parents: &[Option<NodeIndex>],
    start: NodeIndex,
    goal: NodeIndex,
) -> Vec<NodeIndex> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match parents[current as usize] {
            Some(parent) => {
                path.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct AStarEntry {
    index: NodeIndex,
    id: NodeId,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl AStarEntry {
    fn new(index: NodeIndex, id: NodeId, cost: f64, heuristic: f64) -> Self {
        Self {
            index,
            id,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for AStarEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap pops the lowest estimate, then the
        // lowest node id.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.id.cmp(&self.id))
            .then_with(|| other.cost.cmp(&self.cost))
    }
}

impl PartialOrd for AStarEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
