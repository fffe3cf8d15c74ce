//! GraphStore - Snapshot storage for accumulated knowledge graphs
//!
//! ## Core Principles
//!
//! 1. **Whole-graph snapshots**: every save stores the complete graph; nothing is patched in place
//! 2. **Backups for free**: older snapshots are kept and stay loadable by id
//! 3. **One merge at a time per graph**: `MergeService` serializes merges against the same name
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kgraph_storage::{InMemoryGraphStore, MergeService};
//!
//! let service = MergeService::new(InMemoryGraphStore::new(), Reconciler::default());
//!
//! // Fold each extraction result into "printer"
//! for candidate in extracted {
//!     service.merge_into("printer", &candidate).await?;
//! }
//!
//! let latest = service.store().load_latest("printer").await?;
//! ```

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{ErrorKind, Result, StorageError};

pub use application::{MergeOutcome, MergeService};
pub use domain::{decode_graph, validate_graph_name, GraphSnapshot, GraphStore};
pub use infrastructure::{InMemoryGraphStore, JsonFileGraphStore};

#[cfg(feature = "sqlite")]
pub use infrastructure::SqliteGraphStore;
