//! JSON file graph store
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/<graph name>/current.json          newest graph record
//! <root>/<graph name>/backups/<id>.json     every saved snapshot
//! <root>/<graph name>/snapshots.json        snapshot metadata, oldest first
//! ```
//!
//! `current.json` is the plain graph record the viewer loads.
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use kgraph_core::Graph;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::{decode_graph, validate_graph_name, GraphSnapshot, GraphStore};
use crate::{Result, StorageError};

const CURRENT_FILE: &str = "current.json";
const INDEX_FILE: &str = "snapshots.json";
const BACKUP_DIR: &str = "backups";

pub struct JsonFileGraphStore {
    root: PathBuf,
    /// Serializes index updates
    write_lock: Mutex<()>,
}

impl JsonFileGraphStore {
    /// Store rooted at `root`; the directory is created on first save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn graph_dir(&self, name: &str) -> Result<PathBuf> {
        validate_graph_name(name)?;
        Ok(self.root.join(name))
    }

    async fn read_index(dir: &Path) -> Result<Vec<GraphSnapshot>> {
        match fs::read_to_string(dir.join(INDEX_FILE)).await {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write through a temporary file so readers never see a partial file
    async fn write_atomic(path: &Path, content: &str) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn read_graph(path: &Path) -> Result<Graph> {
        let json = fs::read_to_string(path).await?;
        decode_graph(&json)
    }
}

#[async_trait]
impl GraphStore for JsonFileGraphStore {
    async fn save_graph(&self, name: &str, graph: &Graph) -> Result<GraphSnapshot> {
        let dir = self.graph_dir(name)?;
        let _guard = self.write_lock.lock().await;

        fs::create_dir_all(dir.join(BACKUP_DIR)).await?;
        let mut index = Self::read_index(&dir).await?;
        let (snapshot, json) = GraphSnapshot::prepare(name, index.len() as u64 + 1, graph)?;

        let backup = dir
            .join(BACKUP_DIR)
            .join(format!("{}.json", snapshot.snapshot_id));
        fs::write(&backup, &json).await?;
        Self::write_atomic(&dir.join(CURRENT_FILE), &json).await?;

        index.push(snapshot.clone());
        Self::write_atomic(&dir.join(INDEX_FILE), &serde_json::to_string_pretty(&index)?).await?;

        debug!(
            graph = name,
            snapshot = %snapshot.snapshot_id,
            path = %backup.display(),
            "Saved graph snapshot"
        );
        Ok(snapshot)
    }

    async fn load_latest(&self, name: &str) -> Result<Option<Graph>> {
        let path = self.graph_dir(name)?.join(CURRENT_FILE);
        match Self::read_graph(&path).await {
            Ok(graph) => Ok(Some(graph)),
            Err(e) if is_missing(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn load_snapshot(&self, name: &str, snapshot_id: &str) -> Result<Graph> {
        let dir = self.graph_dir(name)?;
        let index = Self::read_index(&dir).await?;
        if index.is_empty() {
            return Err(StorageError::graph_not_found(name));
        }
        if !index.iter().any(|s| s.snapshot_id == snapshot_id) {
            return Err(StorageError::snapshot_not_found(name, snapshot_id));
        }
        Self::read_graph(&dir.join(BACKUP_DIR).join(format!("{snapshot_id}.json"))).await
    }

    async fn list_snapshots(&self, name: &str, limit: Option<usize>) -> Result<Vec<GraphSnapshot>> {
        let index = Self::read_index(&self.graph_dir(name)?).await?;
        Ok(index
            .into_iter()
            .rev()
            .take(limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn list_graphs(&self) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if validate_graph_name(&name).is_ok()
                && fs::try_exists(entry.path().join(INDEX_FILE)).await?
            {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

fn is_missing(err: &StorageError) -> bool {
    use std::error::Error;

    err.source()
        .and_then(|s| s.downcast_ref::<std::io::Error>())
        .is_some_and(|io| io.kind() == IoErrorKind::NotFound)
}
