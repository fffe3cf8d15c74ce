//! In-memory graph store
//!
//! HashMap-based implementation for tests and short-lived sessions.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use kgraph_core::Graph;
use parking_lot::RwLock;

use crate::domain::{validate_graph_name, GraphSnapshot, GraphStore};
use crate::{Result, StorageError};

/// Snapshots of one graph, oldest first
type History = Vec<(GraphSnapshot, Graph)>;

#[derive(Clone, Default)]
pub struct InMemoryGraphStore {
    graphs: Arc<RwLock<HashMap<String, History>>>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn save_graph(&self, name: &str, graph: &Graph) -> Result<GraphSnapshot> {
        validate_graph_name(name)?;
        let mut graphs = self.graphs.write();
        let history = graphs.entry(name.to_string()).or_default();
        let (snapshot, _) = GraphSnapshot::prepare(name, history.len() as u64 + 1, graph)?;
        history.push((snapshot.clone(), graph.clone()));
        Ok(snapshot)
    }

    async fn load_latest(&self, name: &str) -> Result<Option<Graph>> {
        Ok(self
            .graphs
            .read()
            .get(name)
            .and_then(|h| h.last())
            .map(|(_, g)| g.clone()))
    }

    async fn load_snapshot(&self, name: &str, snapshot_id: &str) -> Result<Graph> {
        let graphs = self.graphs.read();
        let history = graphs
            .get(name)
            .ok_or_else(|| StorageError::graph_not_found(name))?;
        history
            .iter()
            .find(|(s, _)| s.snapshot_id == snapshot_id)
            .map(|(_, g)| g.clone())
            .ok_or_else(|| StorageError::snapshot_not_found(name, snapshot_id))
    }

    async fn list_snapshots(&self, name: &str, limit: Option<usize>) -> Result<Vec<GraphSnapshot>> {
        Ok(self
            .graphs
            .read()
            .get(name)
            .map(|h| {
                h.iter()
                    .rev()
                    .take(limit.unwrap_or(usize::MAX))
                    .map(|(s, _)| s.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_graphs(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.graphs.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
