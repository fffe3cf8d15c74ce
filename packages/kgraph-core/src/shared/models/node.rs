//! Knowledge graph node
//!
//! A node is an extracted entity mention: display name plus a type label
//! taken from the meta-model (e.g. `"Resource"`, `"Condition"`).

use serde::{Deserialize, Serialize};

/// 2D canvas position (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Provenance of an extracted node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    /// Source document name
    pub file: String,
    pub page_start: u32,
    pub page_end: u32,
}

impl DataSource {
    pub fn new(file: impl Into<String>, page_start: u32, page_end: u32) -> Self {
        Self {
            file: file.into(),
            page_start,
            page_end,
        }
    }
}

/// Graph vertex
///
/// Equality is full structural equality (id, name, type, position, source).
/// Reconciliation and evaluation only ever look at `name` and `entity_type`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique within the graph it was created in
    pub id: String,
    /// Display name (free text)
    pub name: String,
    /// Meta-model entity label
    pub entity_type: String,
    pub position: Option<Position>,
    pub source: Option<DataSource>,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entity_type: entity_type.into(),
            position: None,
            source: None,
        }
    }

    /// Copy of this node placed at `position`
    pub fn with_position(&self, position: Position) -> Self {
        Self {
            position: Some(position),
            ..self.clone()
        }
    }

    /// Copy of this node with provenance attached
    pub fn with_source(&self, source: DataSource) -> Self {
        Self {
            source: Some(source),
            ..self.clone()
        }
    }

    /// Display name length in characters (representative selection key)
    pub fn name_len(&self) -> usize {
        self.name.chars().count()
    }

    /// Compare type labels, optionally ignoring case
    pub fn same_type(&self, other: &Node, case_sensitive: bool) -> bool {
        if case_sensitive {
            self.entity_type == other.entity_type
        } else {
            self.entity_type.to_lowercase() == other.entity_type.to_lowercase()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_position_keeps_identity() {
        let node = Node::new("n1", "Vacuum chamber", "Resource");
        let moved = node.with_position(Position::new(3.0, 4.0));

        assert_eq!(moved.id, "n1");
        assert_eq!(moved.name, node.name);
        assert_eq!(moved.position, Some(Position::new(3.0, 4.0)));
        assert_ne!(moved, node);
    }

    #[test]
    fn test_name_len_counts_chars() {
        assert_eq!(Node::new("n", "Ventil", "t").name_len(), 6);
        assert_eq!(Node::new("n", "Prüfstand", "t").name_len(), 9);
    }

    #[test]
    fn test_same_type() {
        let a = Node::new("a", "x", "Resource");
        let b = Node::new("b", "y", "resource");
        assert!(a.same_type(&b, false));
        assert!(!a.same_type(&b, true));
    }
}
