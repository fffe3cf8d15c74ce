//! Error types for kgraph-core
//!
//! Provides unified error handling across the crate.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for knowledge graph operations
#[derive(Debug, Error)]
pub enum KnowledgeGraphError {
    /// An edge endpoint does not resolve to a node of the same graph
    #[error("Dangling reference: edge '{edge_id}' points at missing node '{node_id}'")]
    DanglingReference { edge_id: String, node_id: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KnowledgeGraphError {
    /// Create a dangling reference error
    pub fn dangling(edge_id: impl Into<String>, node_id: impl Into<String>) -> Self {
        KnowledgeGraphError::DanglingReference {
            edge_id: edge_id.into(),
            node_id: node_id.into(),
        }
    }

    /// True for errors caused by a graph that violates the endpoint invariant
    pub fn is_dangling_reference(&self) -> bool {
        matches!(self, KnowledgeGraphError::DanglingReference { .. })
    }
}

/// Result type alias for knowledge graph operations
pub type Result<T> = std::result::Result<T, KnowledgeGraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangling_display() {
        let err = KnowledgeGraphError::dangling("e1", "n7");
        let msg = err.to_string();
        assert!(msg.contains("e1"));
        assert!(msg.contains("n7"));
        assert!(err.is_dangling_reference());
    }

    #[test]
    fn test_config_conversion() {
        let err: KnowledgeGraphError = ConfigError::UnknownPreset("turbo".to_string()).into();
        assert!(matches!(err, KnowledgeGraphError::Configuration(_)));
        assert!(!err.is_dangling_reference());
    }
}
