//! SQLite graph store
//!
//! One row per snapshot; the graph record is stored as JSON text.
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kgraph_core::Graph;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::domain::{decode_graph, validate_graph_name, GraphSnapshot, GraphStore};
use crate::{Result, StorageError};

const SNAPSHOT_COLUMNS: &str =
    "graph_name, snapshot_id, sequence, content_hash, node_count, edge_count, created_at";

/// SQLite-based GraphStore implementation
#[derive(Clone)]
pub struct SqliteGraphStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteGraphStore {
    /// Create a new SQLite store at the given path
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(db_path)?)
    }

    /// Create an in-memory SQLite store (for testing)
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS graph_snapshots (
                graph_name TEXT NOT NULL,
                snapshot_id TEXT NOT NULL,
                sequence INTEGER NOT NULL,
                content_hash TEXT NOT NULL,
                node_count INTEGER NOT NULL,
                edge_count INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                record TEXT NOT NULL,
                PRIMARY KEY (graph_name, snapshot_id),
                UNIQUE (graph_name, sequence)
            )",
            [],
        )?;
        Ok(())
    }
}

fn snapshot_from_row(row: &Row<'_>) -> rusqlite::Result<GraphSnapshot> {
    let sequence: i64 = row.get(2)?;
    let node_count: i64 = row.get(4)?;
    let edge_count: i64 = row.get(5)?;
    let created_at: DateTime<Utc> = row.get(6)?;
    Ok(GraphSnapshot {
        graph_name: row.get(0)?,
        snapshot_id: row.get(1)?,
        sequence: sequence as u64,
        content_hash: row.get(3)?,
        node_count: node_count as usize,
        edge_count: edge_count as usize,
        created_at,
    })
}

#[async_trait]
impl GraphStore for SqliteGraphStore {
    async fn save_graph(&self, name: &str, graph: &Graph) -> Result<GraphSnapshot> {
        validate_graph_name(name)?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let last: i64 = tx.query_row(
            "SELECT COALESCE(MAX(sequence), 0) FROM graph_snapshots WHERE graph_name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        let (snapshot, json) = GraphSnapshot::prepare(name, last as u64 + 1, graph)?;

        tx.execute(
            "INSERT INTO graph_snapshots
                (graph_name, snapshot_id, sequence, content_hash, node_count, edge_count, created_at, record)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &snapshot.graph_name,
                &snapshot.snapshot_id,
                snapshot.sequence as i64,
                &snapshot.content_hash,
                snapshot.node_count as i64,
                snapshot.edge_count as i64,
                snapshot.created_at,
                json
            ],
        )?;
        tx.commit()?;

        debug!(graph = name, snapshot = %snapshot.snapshot_id, "Saved graph snapshot");
        Ok(snapshot)
    }

    async fn load_latest(&self, name: &str) -> Result<Option<Graph>> {
        let conn = self.conn.lock();
        let record: Option<String> = conn
            .query_row(
                "SELECT record FROM graph_snapshots WHERE graph_name = ?1
                 ORDER BY sequence DESC LIMIT 1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        record.map(|json| decode_graph(&json)).transpose()
    }

    async fn load_snapshot(&self, name: &str, snapshot_id: &str) -> Result<Graph> {
        let conn = self.conn.lock();
        let record: Option<String> = conn
            .query_row(
                "SELECT record FROM graph_snapshots WHERE graph_name = ?1 AND snapshot_id = ?2",
                params![name, snapshot_id],
                |row| row.get(0),
            )
            .optional()?;

        match record {
            Some(json) => decode_graph(&json),
            None => {
                let known: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM graph_snapshots WHERE graph_name = ?1)",
                    params![name],
                    |row| row.get(0),
                )?;
                Err(if known {
                    StorageError::snapshot_not_found(name, snapshot_id)
                } else {
                    StorageError::graph_not_found(name)
                })
            }
        }
    }

    async fn list_snapshots(&self, name: &str, limit: Option<usize>) -> Result<Vec<GraphSnapshot>> {
        let conn = self.conn.lock();
        // SQLite treats a negative LIMIT as unlimited
        let limit = limit.map_or(-1, |l| l.min(i64::MAX as usize) as i64);
        let mut stmt = conn.prepare(&format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM graph_snapshots WHERE graph_name = ?1
             ORDER BY sequence DESC LIMIT ?2"
        ))?;
        let snapshots = stmt
            .query_map(params![name, limit], snapshot_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(snapshots)
    }

    async fn list_graphs(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT DISTINCT graph_name FROM graph_snapshots ORDER BY graph_name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgraph_core::Node;

    #[tokio::test]
    async fn test_file_database_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("graphs.db");
        let graph = Graph::new(vec![Node::new("n1", "Pump", "Resource")], Vec::new()).unwrap();

        let saved = {
            let store = SqliteGraphStore::new(&path).unwrap();
            store.save_graph("printer", &graph).await.unwrap()
        };

        let reopened = SqliteGraphStore::new(&path).unwrap();
        assert_eq!(reopened.load_latest("printer").await.unwrap(), Some(graph));
        assert_eq!(
            reopened.list_snapshots("printer", None).await.unwrap(),
            vec![saved]
        );
    }
}
