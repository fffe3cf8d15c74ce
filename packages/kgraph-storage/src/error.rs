//! Error types for kgraph-storage

use std::fmt;

use kgraph_core::KnowledgeGraphError;
use thiserror::Error;

/// Storage error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Database errors (SQLite)
    Database,
    /// Serialization/deserialization errors, including unreadable graph records
    Serialization,
    /// No snapshot was ever saved under the graph name
    GraphNotFound,
    /// Snapshot not found
    SnapshotNotFound,
    /// Graph name unusable as a storage key
    InvalidName,
    /// Reconciliation failed during a merge
    Reconcile,
    /// I/O errors
    IO,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Database => "database",
            ErrorKind::Serialization => "serialization",
            ErrorKind::GraphNotFound => "graph_not_found",
            ErrorKind::SnapshotNotFound => "snapshot_not_found",
            ErrorKind::InvalidName => "invalid_name",
            ErrorKind::Reconcile => "reconcile",
            ErrorKind::IO => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Storage error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct StorageError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl StorageError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    pub fn graph_not_found(name: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::GraphNotFound,
            format!("Graph not found: {}", name.into()),
        )
    }

    pub fn snapshot_not_found(name: &str, snapshot_id: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::SnapshotNotFound,
            format!("Snapshot not found: {}@{}", name, snapshot_id.into()),
        )
    }

    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::InvalidName,
            format!("Invalid graph name: {:?}", name.into()),
        )
    }

    /// A stored record that no longer decodes into a valid graph
    pub fn corrupt_record(err: KnowledgeGraphError) -> Self {
        StorageError::serialization(format!("Corrupt graph record: {}", err)).with_source(err)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::GraphNotFound | ErrorKind::SnapshotNotFound
        )
    }
}

// SQLite error conversions
#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::database(format!("SQLite error: {}", err)).with_source(err)
    }
}

// JSON error conversions
impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::serialization(format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::new(ErrorKind::IO, format!("I/O error: {}", err)).with_source(err)
    }
}

impl From<KnowledgeGraphError> for StorageError {
    fn from(err: KnowledgeGraphError) -> Self {
        let kind = match &err {
            KnowledgeGraphError::Serialization(_) => ErrorKind::Serialization,
            KnowledgeGraphError::Io(_) => ErrorKind::IO,
            _ => ErrorKind::Reconcile,
        };
        StorageError::new(kind, err.to_string()).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    // ═══════════════════════════════════════════════════════════════════════
    // Error Construction Tests
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_error_display() {
        let err = StorageError::snapshot_not_found("printer", "000003-abc123");
        let msg = format!("{}", err);
        assert!(msg.contains("snapshot_not_found"));
        assert!(msg.contains("printer@000003-abc123"));
    }

    #[test]
    fn test_database_error() {
        let err = StorageError::database("Connection failed");
        assert_eq!(err.kind, ErrorKind::Database);
        assert!(err.source.is_none());
        assert_eq!(format!("{}", err), "[database] Connection failed");
    }

    #[test]
    fn test_not_found_kinds() {
        assert!(StorageError::graph_not_found("printer").is_not_found());
        assert!(StorageError::snapshot_not_found("printer", "x").is_not_found());
        assert!(!StorageError::invalid_name("../etc").is_not_found());
    }

    #[test]
    fn test_invalid_name_is_quoted() {
        let err = StorageError::invalid_name("a/b");
        assert_eq!(format!("{}", err), "[invalid_name] Invalid graph name: \"a/b\"");
    }

    #[test]
    fn test_with_source() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = StorageError::database("DB file missing").with_source(io_err);

        let source = err.source().unwrap();
        assert!(source.to_string().contains("file not found"));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Conversion Tests
    // ═══════════════════════════════════════════════════════════════════════

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_from_rusqlite_error() {
        let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(err.kind, ErrorKind::Database);
        assert!(err.message.contains("SQLite error"));
        assert!(err.source.is_some());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json")
            .err()
            .unwrap();
        let err: StorageError = json_err.into();
        assert_eq!(err.kind, ErrorKind::Serialization);
        assert!(err.message.contains("JSON error"));
    }

    #[test]
    fn test_from_graph_error() {
        let err: StorageError = KnowledgeGraphError::dangling("e1", "n9").into();
        assert_eq!(err.kind, ErrorKind::Reconcile);
        assert!(err.message.contains("n9"));

        let json_err = kgraph_core::Graph::from_json("{").unwrap_err();
        let err: StorageError = json_err.into();
        assert_eq!(err.kind, ErrorKind::Serialization);
    }

    #[test]
    fn test_corrupt_record_is_serialization() {
        let err = StorageError::corrupt_record(KnowledgeGraphError::dangling("e1", "n9"));
        assert_eq!(err.kind, ErrorKind::Serialization);
        assert!(err.message.contains("Corrupt graph record"));
        assert!(err.message.contains("n9"));
    }

    #[test]
    fn test_error_kind_as_str() {
        assert_eq!(ErrorKind::GraphNotFound.as_str(), "graph_not_found");
        assert_eq!(ErrorKind::Reconcile.as_str(), "reconcile");
        assert_eq!(ErrorKind::IO.as_str(), "io");
    }
}
