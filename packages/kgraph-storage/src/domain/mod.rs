//! Domain layer for GraphStore
//!
//! # Domain Models
//!
//! - `GraphSnapshot`: metadata of one saved version of a named graph
//!
//! # Port Trait
//!
//! - `GraphStore`: primary storage abstraction, implemented by the adapters in
//!   `infrastructure`

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kgraph_core::Graph;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Result, StorageError};

// ═══════════════════════════════════════════════════════════════════════════
// Domain Models
// ═══════════════════════════════════════════════════════════════════════════

/// One saved version of a named graph
///
/// # Identity
///
/// - `snapshot_id`: zero-padded sequence number plus a content hash prefix,
///   e.g. `000003-9f86d081884c`. Ids sort in save order.
/// - `sequence`: 1 for the first save of a graph, incremented per save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub graph_name: String,
    pub snapshot_id: String,
    pub sequence: u64,
    /// SHA256 of the graph record JSON
    pub content_hash: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub created_at: DateTime<Utc>,
}

impl GraphSnapshot {
    /// Snapshot metadata plus the record JSON it describes
    pub fn prepare(graph_name: &str, sequence: u64, graph: &Graph) -> Result<(Self, String)> {
        let json = graph.to_json()?;
        let content_hash = content_hash(&json);
        let snapshot = Self {
            graph_name: graph_name.to_string(),
            snapshot_id: format!("{:06}-{}", sequence, &content_hash[..12]),
            sequence,
            content_hash,
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            created_at: Utc::now(),
        };
        Ok((snapshot, json))
    }
}

/// Decode a stored graph record
///
/// Any failure, including an edge pointing at a missing node, is a
/// serialization error of the stored data.
pub fn decode_graph(json: &str) -> Result<Graph> {
    Graph::from_json(json).map_err(StorageError::corrupt_record)
}

/// Lowercase hex SHA256
pub fn content_hash(json: &str) -> String {
    format!("{:x}", Sha256::digest(json.as_bytes()))
}

/// Graph names double as directory names and keys
///
/// Accepted: non-empty, ASCII letters, digits, `-`, `_` and `.`, not
/// starting with `.`.
pub fn validate_graph_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::invalid_name(name))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Port Trait: GraphStore
// ═══════════════════════════════════════════════════════════════════════════

/// Snapshot storage for named graphs
///
/// # Core Operations
///
/// 1. **Write**: `save_graph` stores a new snapshot; the previous one stays as backup
/// 2. **Read**: `load_latest`, `load_snapshot`
/// 3. **Catalog**: `list_snapshots` (newest first), `list_graphs`
///
/// # Implementations
///
/// - `InMemoryGraphStore`: tests and short-lived sessions
/// - `JsonFileGraphStore`: directory per graph, readable by the graph viewer
/// - `SqliteGraphStore`: single database file
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Save `graph` as the newest snapshot of `name`
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if:
    /// - `name` fails [`validate_graph_name`]
    /// - the backend cannot write
    async fn save_graph(&self, name: &str, graph: &Graph) -> Result<GraphSnapshot>;

    /// Newest snapshot of `name`, `None` if nothing was saved yet
    async fn load_latest(&self, name: &str) -> Result<Option<Graph>>;

    /// A specific snapshot
    ///
    /// # Errors
    ///
    /// `GraphNotFound` or `SnapshotNotFound`
    async fn load_snapshot(&self, name: &str, snapshot_id: &str) -> Result<Graph>;

    /// Snapshots of `name`, newest first
    ///
    /// # Arguments
    ///
    /// - `limit`: Maximum number of snapshots to return (None = unlimited)
    async fn list_snapshots(&self, name: &str, limit: Option<usize>) -> Result<Vec<GraphSnapshot>>;

    /// Names with at least one snapshot, sorted
    async fn list_graphs(&self) -> Result<Vec<String>>;
}
