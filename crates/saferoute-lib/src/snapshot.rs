//! Atomically swappable graph snapshots.
//!
//! Searches never observe a graph mid-update: writers build a new
//! [`RouteGraph`] and swap the shared pointer, while readers keep the `Arc`
//! they loaded for the whole search.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::error::Result;
use crate::graph::RouteGraph;

/// Cloneable handle to the current graph of a region.
#[derive(Debug, Clone, Default)]
pub struct SharedGraph {
    current: Arc<RwLock<Arc<RouteGraph>>>,
    /// Serialises copy-on-write updates so concurrent writers do not lose
    /// each other's changes.
    writer: Arc<Mutex<()>>,
}

impl SharedGraph {
    pub fn new(graph: RouteGraph) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(graph))),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// The snapshot current at the time of the call.
    pub fn load(&self) -> Arc<RouteGraph> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the graph wholesale, returning the previous snapshot.
    pub fn swap(&self, graph: RouteGraph) -> Arc<RouteGraph> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.store(Arc::new(graph))
    }

    /// Apply an incremental change to a copy of the current graph and
    /// publish it. On error the current snapshot is left untouched.
    pub fn update<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut RouteGraph) -> Result<()>,
    {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = RouteGraph::clone(&self.load());
        apply(&mut next)?;
        tracing::debug!(
            nodes = next.node_count(),
            edges = next.edge_count(),
            "publishing updated graph snapshot"
        );
        self.store(Arc::new(next));
        Ok(())
    }

    fn store(&self, graph: Arc<RouteGraph>) -> Arc<RouteGraph> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Coordinates, RouteEdge, RouteNode};

    fn graph_with(ids: &[i64]) -> RouteGraph {
        let mut graph = RouteGraph::new();
        for &id in ids {
            graph.add_node(RouteNode::new(id, Coordinates::new(0.0, 0.0)));
        }
        graph
    }

    #[test]
    fn loaded_snapshot_survives_swap() {
        let shared = SharedGraph::new(graph_with(&[1]));
        let before = shared.load();

        let previous = shared.swap(graph_with(&[1, 2, 3]));

        assert_eq!(before.node_count(), 1);
        assert_eq!(previous.node_count(), 1);
        assert_eq!(shared.load().node_count(), 3);
    }

    #[test]
    fn failed_update_keeps_current_snapshot() {
        let shared = SharedGraph::new(graph_with(&[1, 2]));
        let result = shared.update(|graph| {
            graph.add_bidirectional_edge(RouteEdge::new(1, 2, 50.0, 1.0, 1.0))?;
            graph.add_bidirectional_edge(RouteEdge::new(1, 7, 50.0, 1.0, 1.0))
        });

        assert!(result.is_err());
        assert_eq!(shared.load().edge_count(), 0);
    }

    #[test]
    fn update_publishes_copy() {
        let shared = SharedGraph::new(graph_with(&[1, 2]));
        let before = shared.load();
        shared
            .update(|graph| graph.add_one_way_edge(RouteEdge::new(1, 2, 50.0, 1.0, 1.0)))
            .unwrap();

        assert_eq!(before.edge_count(), 0);
        assert_eq!(shared.load().edge_count(), 1);
    }

    #[test]
    fn clones_share_the_same_slot() {
        let shared = SharedGraph::new(graph_with(&[1]));
        let other = shared.clone();
        other.swap(graph_with(&[1, 2]));
        assert_eq!(shared.load().node_count(), 2);
    }
}
