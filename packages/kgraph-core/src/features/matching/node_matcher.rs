//! Node equivalence predicates

use std::fmt;
use std::sync::Arc;

use crate::features::similarity::{char_similarity, TextSimilarity};
use crate::shared::models::Node;

/// Decides whether two nodes denote the same entity
pub trait NodeMatch: Send + Sync {
    fn matches(&self, a: &Node, b: &Node) -> bool;
}

impl<F> NodeMatch for F
where
    F: Fn(&Node, &Node) -> bool + Send + Sync,
{
    fn matches(&self, a: &Node, b: &Node) -> bool {
        self(a, b)
    }
}

/// Same type label and name similarity at or above a threshold
///
/// Position and provenance never take part in the decision.
#[derive(Clone)]
pub struct SimilarityNodeMatcher {
    similarity: Arc<dyn TextSimilarity>,
    threshold: f64,
    case_sensitive: bool,
}

impl SimilarityNodeMatcher {
    pub fn new(similarity: Arc<dyn TextSimilarity>, threshold: f64, case_sensitive: bool) -> Self {
        Self {
            similarity,
            threshold,
            case_sensitive,
        }
    }

    /// Character similarity with case-sensitive type labels
    pub fn character(threshold: f64) -> Self {
        Self::new(Arc::new(char_similarity), threshold, true)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

impl fmt::Debug for SimilarityNodeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityNodeMatcher")
            .field("threshold", &self.threshold)
            .field("case_sensitive", &self.case_sensitive)
            .finish_non_exhaustive()
    }
}

impl NodeMatch for SimilarityNodeMatcher {
    fn matches(&self, a: &Node, b: &Node) -> bool {
        a.same_type(b, self.case_sensitive)
            && self.similarity.similarity(&a.name, &b.name) >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{DataSource, Position};

    #[test]
    fn test_threshold_is_inclusive() {
        // char ratio("abcd", "abc") = 6/7
        let m = SimilarityNodeMatcher::character(6.0 / 7.0);
        assert!(m.matches(&Node::new("a", "abcd", "t1"), &Node::new("b", "abc", "t1")));

        let m = SimilarityNodeMatcher::character(0.9);
        assert!(!m.matches(&Node::new("a", "abcd", "t1"), &Node::new("b", "abc", "t1")));
    }

    #[test]
    fn test_type_gate_even_for_identical_names() {
        let m = SimilarityNodeMatcher::character(0.0);
        assert!(!m.matches(
            &Node::new("a", "Pump", "Resource"),
            &Node::new("b", "Pump", "Condition")
        ));
    }

    #[test]
    fn test_case_folded_types() {
        let a = Node::new("a", "Pump", "Resource");
        let b = Node::new("b", "Pump", "resource");
        let strict = SimilarityNodeMatcher::new(Arc::new(char_similarity), 0.5, true);
        let folded = SimilarityNodeMatcher::new(Arc::new(char_similarity), 0.5, false);
        assert!(!strict.matches(&a, &b));
        assert!(folded.matches(&a, &b));
    }

    #[test]
    fn test_position_and_source_ignored() {
        let m = SimilarityNodeMatcher::character(1.0);
        let a = Node::new("a", "Pump", "Resource").with_position(Position::new(1.0, 2.0));
        let b = Node::new("b", "Pump", "Resource").with_source(DataSource::new("x.pdf", 1, 2));
        assert!(m.matches(&a, &b));
    }

    #[test]
    fn test_closure_matcher() {
        let by_id = |a: &Node, b: &Node| a.id == b.id;
        let m: &dyn NodeMatch = &by_id;
        assert!(m.matches(&Node::new("x", "a", "t"), &Node::new("x", "b", "u")));
    }
}
