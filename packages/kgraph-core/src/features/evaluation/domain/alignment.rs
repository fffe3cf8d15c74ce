//! Optimal one-to-one node alignment
//!
//! The shorter node list is padded with placeholders so the similarity
//! matrix is square, then the assignment with maximum total similarity is
//! found with the Kuhn-Munkres (Hungarian) algorithm.

use pathfinding::kuhn_munkres::kuhn_munkres;
use pathfinding::matrix::Matrix;

use crate::features::similarity::TextSimilarity;
use crate::shared::models::{Graph, Node};

/// Fixed-point scale for the integer assignment solver
const SCORE_SCALE: f64 = 1_000_000.0;

/// One row of the assignment
///
/// A `None` side is a placeholder: a missing reference node when
/// `predicted` is `None`, a superfluous prediction when `reference` is `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeAlignment<'a> {
    pub predicted: Option<&'a Node>,
    pub reference: Option<&'a Node>,
    pub score: f64,
}

impl<'a> NodeAlignment<'a> {
    /// Both sides are real nodes
    pub fn is_pair(&self) -> bool {
        self.predicted.is_some() && self.reference.is_some()
    }

    pub fn detach(&self) -> OwnedAlignment {
        OwnedAlignment {
            predicted: self.predicted.cloned(),
            reference: self.reference.cloned(),
            score: self.score,
        }
    }
}

/// [`NodeAlignment`] detached from the graphs it was computed on
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedAlignment {
    pub predicted: Option<Node>,
    pub reference: Option<Node>,
    pub score: f64,
}

impl OwnedAlignment {
    pub fn as_alignment(&self) -> NodeAlignment<'_> {
        NodeAlignment {
            predicted: self.predicted.as_ref(),
            reference: self.reference.as_ref(),
            score: self.score,
        }
    }
}

/// Pair score: 0 against a placeholder or (with `type_gate`) across types
pub fn pair_score(
    predicted: Option<&Node>,
    reference: Option<&Node>,
    similarity: &dyn TextSimilarity,
    type_gate: bool,
) -> f64 {
    match (predicted, reference) {
        (Some(p), Some(r)) => {
            if type_gate && !p.same_type(r, false) {
                0.0
            } else {
                similarity.similarity(&p.name, &r.name)
            }
        }
        _ => 0.0,
    }
}

/// Globally optimal pairing of predicted and reference nodes
///
/// Returns one alignment per row of the padded square matrix, in predicted
/// node order followed by placeholder rows.
pub fn optimal_matching<'a>(
    predicted: &'a Graph,
    reference: &'a Graph,
    similarity: &dyn TextSimilarity,
    type_gate: bool,
) -> Vec<NodeAlignment<'a>> {
    align_nodes(predicted.nodes(), reference.nodes(), similarity, type_gate)
}

pub fn align_nodes<'a>(
    predicted: &'a [Node],
    reference: &'a [Node],
    similarity: &dyn TextSimilarity,
    type_gate: bool,
) -> Vec<NodeAlignment<'a>> {
    let n = predicted.len().max(reference.len());
    if n == 0 {
        return Vec::new();
    }

    let mut scores = vec![vec![0.0_f64; n]; n];
    let mut weights = Matrix::new(n, n, 0_i64);
    for (i, p) in predicted.iter().enumerate() {
        for (j, r) in reference.iter().enumerate() {
            let score = pair_score(Some(p), Some(r), similarity, type_gate);
            scores[i][j] = score;
            weights[(i, j)] = (score * SCORE_SCALE).round() as i64;
        }
    }

    let (_, assignment) = kuhn_munkres(&weights);

    assignment
        .into_iter()
        .enumerate()
        .map(|(i, j)| NodeAlignment {
            predicted: predicted.get(i),
            reference: reference.get(j),
            score: scores[i][j],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::similarity::char_similarity;

    fn nodes(items: &[(&str, &str)]) -> Vec<Node> {
        items
            .iter()
            .enumerate()
            .map(|(i, (name, ty))| Node::new(format!("n{i}"), *name, *ty))
            .collect()
    }

    #[test]
    fn test_maximises_total_similarity() {
        let predicted = nodes(&[("abcd", "t"), ("abce", "t")]);
        let reference = nodes(&[("abcd", "t"), ("abcf", "t")]);
        let alignments = align_nodes(&predicted, &reference, &char_similarity, true);

        let total: f64 = alignments.iter().map(|a| a.score).sum();
        assert!((total - (1.0 + 0.75)).abs() < 1e-9);
        assert_eq!(alignments[0].reference.unwrap().name, "abcd");
    }

    #[test]
    fn test_optimum_not_row_greedy() {
        // row 0 prefers col 0 (0.9 vs 0.8) but row 1 only scores on col 0
        let score = |a: &str, b: &str| match (a, b) {
            ("p0", "r0") => 0.9,
            ("p0", "r1") => 0.8,
            ("p1", "r0") => 0.7,
            _ => 0.0,
        };
        let predicted = nodes(&[("p0", "t"), ("p1", "t")]);
        let reference = nodes(&[("r0", "t"), ("r1", "t")]);
        let alignments = align_nodes(&predicted, &reference, &score, true);

        assert_eq!(alignments[0].reference.unwrap().name, "r1");
        assert_eq!(alignments[1].reference.unwrap().name, "r0");
    }

    #[test]
    fn test_padding_with_placeholders() {
        let predicted = nodes(&[("Pump", "Resource")]);
        let reference = nodes(&[("Leak", "Condition"), ("Pump", "Resource")]);
        let alignments = align_nodes(&predicted, &reference, &char_similarity, true);

        assert_eq!(alignments.len(), 2);
        assert_eq!(alignments[0].reference.unwrap().name, "Pump");
        assert_eq!(alignments[0].score, 1.0);
        assert!(alignments[1].predicted.is_none());
        assert_eq!(alignments[1].reference.unwrap().name, "Leak");
        assert_eq!(alignments[1].score, 0.0);
    }

    #[test]
    fn test_type_gate() {
        let predicted = nodes(&[("Pump", "Resource")]);
        let reference = nodes(&[("Pump", "Condition")]);

        let gated = align_nodes(&predicted, &reference, &char_similarity, true);
        assert_eq!(gated[0].score, 0.0);

        let ungated = align_nodes(&predicted, &reference, &char_similarity, false);
        assert_eq!(ungated[0].score, 1.0);
    }

    #[test]
    fn test_type_gate_ignores_case() {
        let predicted = nodes(&[("Pump", "resource")]);
        let reference = nodes(&[("Pump", "Resource")]);
        let alignments = align_nodes(&predicted, &reference, &char_similarity, true);
        assert_eq!(alignments[0].score, 1.0);
    }

    #[test]
    fn test_both_empty() {
        assert!(align_nodes(&[], &[], &char_similarity, true).is_empty());
    }

    #[test]
    fn test_detach_roundtrip() {
        let predicted = nodes(&[("Pump", "Resource")]);
        let alignments = align_nodes(&predicted, &[], &char_similarity, true);
        let owned = alignments[0].detach();
        assert_eq!(owned.as_alignment(), alignments[0]);
        assert!(!owned.as_alignment().is_pair());
    }
}
