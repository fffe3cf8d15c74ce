//! Edge equivalence predicates
//!
//! Edges are compared with their endpoints resolved, so a matcher can look at
//! the endpoint nodes after they have been remapped to cluster
//! representatives.

use crate::shared::models::EdgeRef;

/// Decides whether two edges denote the same relation
pub trait EdgeMatch: Send + Sync {
    fn matches(&self, a: EdgeRef<'_>, b: EdgeRef<'_>) -> bool;
}

impl<F> EdgeMatch for F
where
    F: Fn(EdgeRef<'_>, EdgeRef<'_>) -> bool + Send + Sync,
{
    fn matches(&self, a: EdgeRef<'_>, b: EdgeRef<'_>) -> bool {
        self(a, b)
    }
}

/// Equal relation type and value-equal endpoints
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictEdgeMatcher;

impl EdgeMatch for StrictEdgeMatcher {
    fn matches(&self, a: EdgeRef<'_>, b: EdgeRef<'_>) -> bool {
        a.relation_type() == b.relation_type() && a.source == b.source && a.target == b.target
    }
}

/// Relation type equality ignoring case; endpoints are not compared
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationTypeEdgeMatcher;

impl EdgeMatch for RelationTypeEdgeMatcher {
    fn matches(&self, a: EdgeRef<'_>, b: EdgeRef<'_>) -> bool {
        a.relation_type().to_lowercase() == b.relation_type().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Graph, Node};

    fn graph() -> Graph {
        let mut b = Graph::builder();
        let pump = b.add_node(Node::new("n1", "Pump", "Resource"));
        let leak = b.add_node(Node::new("n2", "Leak", "Condition"));
        let pump_copy = b.add_node(Node::new("n1", "Pump", "Resource"));
        b.add_edge("e1", pump, leak, "has condition");
        b.add_edge("e2", pump_copy, leak, "has condition");
        b.add_edge("e3", pump, leak, "Has Condition");
        b.add_edge("e4", leak, pump, "has condition");
        b.build().unwrap()
    }

    #[test]
    fn test_strict_compares_endpoint_values() {
        let g = graph();
        let edges: Vec<_> = g.edge_refs().collect();
        // distinct node slots, equal values
        assert!(StrictEdgeMatcher.matches(edges[0], edges[1]));
        assert!(!StrictEdgeMatcher.matches(edges[0], edges[2]));
        assert!(!StrictEdgeMatcher.matches(edges[0], edges[3]));
    }

    #[test]
    fn test_relation_type_matcher() {
        let g = graph();
        let edges: Vec<_> = g.edge_refs().collect();
        assert!(RelationTypeEdgeMatcher.matches(edges[0], edges[2]));
        assert!(RelationTypeEdgeMatcher.matches(edges[0], edges[3]));
    }
}
