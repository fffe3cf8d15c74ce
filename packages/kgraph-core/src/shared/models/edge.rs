//! Knowledge graph edge
//!
//! Edges do not own their endpoints. They store the position of the
//! endpoint node in the owning [`Graph`](super::Graph)'s node arena, so two
//! edges pointing at the same node share it instead of carrying copies.

use std::fmt;

use super::node::Node;

/// Stable position of a node inside one graph's node list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Directed, typed relation between two nodes of the same graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: String,
    pub source: NodeIndex,
    pub target: NodeIndex,
    /// Meta-model relation label
    pub relation_type: String,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: NodeIndex,
        target: NodeIndex,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            target,
            relation_type: relation_type.into(),
        }
    }
}

/// Edge described by endpoint node ids instead of arena positions
///
/// Used when a graph is assembled from externally produced data (extraction
/// output, persisted records) where only ids are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub relation_type: String,
}

impl IdEdge {
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            relation_type: relation_type.into(),
        }
    }
}

/// Edge with its endpoints resolved against the owning graph
#[derive(Debug, Clone, Copy)]
pub struct EdgeRef<'a> {
    pub edge: &'a Edge,
    pub source: &'a Node,
    pub target: &'a Node,
}

impl<'a> EdgeRef<'a> {
    pub fn id(&self) -> &'a str {
        &self.edge.id
    }

    pub fn relation_type(&self) -> &'a str {
        &self.edge.relation_type
    }
}
