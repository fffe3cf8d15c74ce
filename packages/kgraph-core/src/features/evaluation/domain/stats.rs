//! Precision, recall and F-scores over a node alignment

use serde::{Deserialize, Serialize};

use super::alignment::NodeAlignment;
use crate::config::{ConfigError, ConfigResult};
use crate::shared::models::Graph;

/// Alignment counts
///
/// `num_pred` and `num_gold` are node counts before padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub num_correct: usize,
    pub num_wrong: usize,
    pub num_pred: usize,
    pub num_gold: usize,
}

impl Stats {
    /// Count correct alignments
    ///
    /// An alignment is correct when both sides are real nodes with equal
    /// type labels and the score reaches `threshold`. Labels are compared
    /// exactly, unlike the matrix type gate.
    pub fn compute(
        predicted: &Graph,
        reference: &Graph,
        alignments: &[NodeAlignment<'_>],
        threshold: f64,
    ) -> Self {
        let num_correct = alignments
            .iter()
            .filter(|a| Self::is_correct(a, threshold))
            .count();
        Self {
            num_correct,
            num_wrong: alignments.len() - num_correct,
            num_pred: predicted.node_count(),
            num_gold: reference.node_count(),
        }
    }

    pub fn from_counts(num_correct: usize, num_wrong: usize, num_pred: usize, num_gold: usize) -> Self {
        Self {
            num_correct,
            num_wrong,
            num_pred,
            num_gold,
        }
    }

    pub fn is_correct(alignment: &NodeAlignment<'_>, threshold: f64) -> bool {
        match (alignment.predicted, alignment.reference) {
            (Some(p), Some(r)) => p.same_type(r, true) && alignment.score >= threshold,
            _ => false,
        }
    }

    /// `num_correct / num_pred`; with no predictions 1.0 if nothing is correct
    pub fn precision(&self) -> f64 {
        ratio(self.num_correct, self.num_pred)
    }

    /// `num_correct / num_gold`; with no reference nodes 1.0 if nothing is correct
    pub fn recall(&self) -> f64 {
        ratio(self.num_correct, self.num_gold)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// `(1 + b^2) * p * r / (b^2 * p + r)`; `beta` must be positive and finite
    pub fn f_beta(&self, beta: f64) -> ConfigResult<f64> {
        f_beta(self.precision(), self.recall(), beta)
    }
}

fn ratio(correct: usize, total: usize) -> f64 {
    if total > 0 {
        correct as f64 / total as f64
    } else if correct == 0 {
        1.0
    } else {
        0.0
    }
}

/// F-beta score from precision and recall
pub fn f_beta(precision: f64, recall: f64, beta: f64) -> ConfigResult<f64> {
    if !beta.is_finite() || beta <= 0.0 {
        return Err(ConfigError::range_with_hint(
            "beta",
            beta,
            "0 (exclusive)",
            "inf",
            "F-beta is undefined for beta <= 0",
        ));
    }
    let b2 = beta * beta;
    let denominator = b2 * precision + recall;
    if denominator == 0.0 {
        return Ok(0.0);
    }
    Ok((1.0 + b2) * precision * recall / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::evaluation::domain::alignment::optimal_matching;
    use crate::features::similarity::token_similarity;
    use crate::shared::models::Node;

    fn graph(nodes: &[(&str, &str)]) -> Graph {
        let mut b = Graph::builder();
        for (i, (name, ty)) in nodes.iter().enumerate() {
            b.add_node(Node::new(format!("n{i}"), *name, *ty));
        }
        b.build().unwrap()
    }

    fn stats(predicted: &Graph, reference: &Graph, threshold: f64) -> Stats {
        let alignments = optimal_matching(predicted, reference, &token_similarity, true);
        Stats::compute(predicted, reference, &alignments, threshold)
    }

    #[test]
    fn test_perfect_prediction() {
        let g = graph(&[("Pump", "Resource")]);
        let s = stats(&g, &g, 0.4);
        assert_eq!(s, Stats::from_counts(1, 0, 1, 1));
        assert_eq!(s.precision(), 1.0);
        assert_eq!(s.recall(), 1.0);
        assert_eq!(s.f1(), 1.0);
    }

    #[test]
    fn test_empty_prediction() {
        let s = stats(&Graph::empty(), &graph(&[("Pump", "Resource")]), 0.4);
        assert_eq!(s, Stats::from_counts(0, 1, 0, 1));
        assert_eq!(s.precision(), 1.0);
        assert_eq!(s.recall(), 0.0);
        assert_eq!(s.f1(), 0.0);
    }

    #[test]
    fn test_both_empty() {
        let s = stats(&Graph::empty(), &Graph::empty(), 0.4);
        assert_eq!(s.precision(), 1.0);
        assert_eq!(s.recall(), 1.0);
    }

    #[test]
    fn test_type_mismatch_never_correct() {
        let s = stats(&graph(&[("Pump", "Resource")]), &graph(&[("Pump", "Condition")]), 0.0);
        assert_eq!(s.num_correct, 0);
        assert_eq!(s.num_wrong, 1);
    }

    #[test]
    fn test_type_labels_compared_exactly() {
        // the gate lets the pair through, correctness does not
        let p = graph(&[("Pump", "resource")]);
        let r = graph(&[("Pump", "Resource")]);
        let alignments = optimal_matching(&p, &r, &token_similarity, true);
        assert_eq!(alignments[0].score, 1.0);
        assert_eq!(Stats::compute(&p, &r, &alignments, 0.4).num_correct, 0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // tokens [vacuum, chamber, door] vs [vacuum, chamber] -> 0.8
        let p = graph(&[("vacuum chamber door", "Resource")]);
        let r = graph(&[("vacuum chamber", "Resource")]);
        assert_eq!(stats(&p, &r, 0.8).num_correct, 1);
        assert_eq!(stats(&p, &r, 0.81).num_correct, 0);
    }

    #[test]
    fn test_mixed_counts() {
        let p = graph(&[("Pump", "Resource"), ("Valve", "Resource"), ("Noise", "Condition")]);
        let r = graph(&[("Pump", "Resource"), ("Leak", "Condition")]);
        let s = stats(&p, &r, 0.4);
        assert_eq!(s, Stats::from_counts(1, 2, 3, 2));
        assert!((s.precision() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(s.recall(), 0.5);
    }

    #[test]
    fn test_f_beta_equal_precision_recall() {
        for beta in [0.5, 1.0, 2.0, 3.0] {
            assert!((f_beta(0.5, 0.5, beta).unwrap() - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_f_beta_weights_recall() {
        let f2 = f_beta(1.0, 0.5, 2.0).unwrap();
        // 5 * 0.5 / (4 + 0.5)
        assert!((f2 - 2.5 / 4.5).abs() < 1e-12);
        assert_eq!(f_beta(0.0, 0.0, 2.0).unwrap(), 0.0);
    }

    #[test]
    fn test_f_beta_rejects_non_positive_beta() {
        let s = Stats::from_counts(1, 0, 1, 1);
        for beta in [0.0, -2.0, f64::INFINITY, f64::NAN] {
            assert!(matches!(s.f_beta(beta), Err(ConfigError::Range { .. })));
        }
    }

    #[test]
    fn test_f1_matches_f_beta_one() {
        let s = Stats::from_counts(2, 3, 4, 5);
        assert!((s.f1() - s.f_beta(1.0).unwrap()).abs() < 1e-12);
    }
}
