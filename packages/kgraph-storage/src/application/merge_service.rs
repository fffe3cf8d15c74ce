//! Merge use case
//!
//! Loads the newest snapshot of a named graph, folds a candidate graph into
//! it and saves the result as the next snapshot. Merges against one name
//! run one at a time; different names proceed concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use kgraph_core::features::reconcile::{replace_node, ReconcileStats, Reconciler};
use kgraph_core::{Graph, Node};
use parking_lot::Mutex;
use tracing::info;

use crate::domain::{GraphSnapshot, GraphStore};
use crate::{Result, StorageError};

/// Saved snapshot plus the reconciliation numbers that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub snapshot: GraphSnapshot,
    pub stats: ReconcileStats,
}

pub struct MergeService<S> {
    store: Arc<S>,
    reconciler: Reconciler,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S: GraphStore> MergeService<S> {
    pub fn new(store: S, reconciler: Reconciler) -> Self {
        Self::with_shared_store(Arc::new(store), reconciler)
    }

    pub fn with_shared_store(store: Arc<S>, reconciler: Reconciler) -> Self {
        Self {
            store,
            reconciler,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    fn lock_for(&self, name: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.locks
            .lock()
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    /// Drop the lock entry for `name` once no other task holds it
    fn release(&self, name: &str, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.locks.lock();
        // the map's copy plus ours
        if Arc::strong_count(&lock) == 2 {
            locks.remove(name);
        }
    }

    /// Graph names with a merge or update in flight
    pub fn active_locks(&self) -> usize {
        self.locks.lock().len()
    }

    /// Fold `candidate` into the newest snapshot of `name` (empty if none)
    pub async fn merge_into(&self, name: &str, candidate: &Graph) -> Result<MergeOutcome> {
        let lock = self.lock_for(name);
        let outcome = {
            let _guard = lock.lock().await;
            self.merge_locked(name, candidate).await
        };
        self.release(name, lock);
        outcome
    }

    async fn merge_locked(&self, name: &str, candidate: &Graph) -> Result<MergeOutcome> {
        let accumulated = self.store.load_latest(name).await?.unwrap_or_default();
        let merged = self.reconciler.merge(&accumulated, candidate)?;
        let snapshot = self.store.save_graph(name, &merged.graph).await?;

        info!(
            graph = name,
            snapshot = %snapshot.snapshot_id,
            nodes = snapshot.node_count,
            edges = snapshot.edge_count,
            collapsed = merged.stats.nodes_collapsed(),
            "Merged into stored graph"
        );

        Ok(MergeOutcome {
            snapshot,
            stats: merged.stats,
        })
    }

    /// Write back one node (e.g. a new layout position) as a new snapshot
    pub async fn update_node(&self, name: &str, node: &Node) -> Result<GraphSnapshot> {
        let lock = self.lock_for(name);
        let snapshot = {
            let _guard = lock.lock().await;
            match self.store.load_latest(name).await {
                Ok(Some(current)) => self.store.save_graph(name, &replace_node(&current, node)).await,
                Ok(None) => Err(StorageError::graph_not_found(name)),
                Err(e) => Err(e),
            }
        };
        self.release(name, lock);
        snapshot
    }
}
