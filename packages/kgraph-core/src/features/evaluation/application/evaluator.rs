//! Evaluation use case
//!
//! Scores a predicted graph against a hand-labelled reference graph with the
//! settings of an [`EvaluationConfig`].

use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{ConfigResult, EvaluationConfig};
use crate::errors::Result;
use crate::features::evaluation::domain::{
    graph_edit_distance, optimal_matching, EditDistance, OwnedAlignment, Stats,
};
use crate::features::matching::{RelationTypeEdgeMatcher, SimilarityNodeMatcher};
use crate::features::similarity::{token_similarity, TextSimilarity};
use crate::shared::models::{Graph, Node};

/// Scores of one predicted graph
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub stats: Stats,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub f_beta: f64,
    pub beta: f64,
    pub edit_distance: EditDistance,
    pub alignments: Vec<OwnedAlignment>,
}

impl EvaluationReport {
    pub fn buckets(&self, threshold: f64) -> MatchBuckets {
        MatchBuckets::from_alignments(&self.alignments, threshold)
    }
}

/// Alignments grouped by score for manual review
///
/// `confident` holds scores above the threshold, `partial` those in
/// `(0.5, threshold]`, `weak` the remaining positive scores, `unmatched` zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchBuckets {
    pub threshold: f64,
    pub confident: Vec<OwnedAlignment>,
    pub partial: Vec<OwnedAlignment>,
    pub weak: Vec<OwnedAlignment>,
    pub unmatched: Vec<OwnedAlignment>,
}

impl MatchBuckets {
    pub fn from_alignments(alignments: &[OwnedAlignment], threshold: f64) -> Self {
        let mut buckets = Self {
            threshold,
            ..Default::default()
        };
        for alignment in alignments {
            let bucket = if alignment.score > threshold {
                &mut buckets.confident
            } else if alignment.score > 0.5 {
                &mut buckets.partial
            } else if alignment.score > 0.0 {
                &mut buckets.weak
            } else {
                &mut buckets.unmatched
            };
            bucket.push(alignment.clone());
        }
        buckets
    }

    pub fn len(&self) -> usize {
        self.confident.len() + self.partial.len() + self.weak.len() + self.unmatched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text listing of every bucket
    pub fn render(&self) -> String {
        let sections = [
            (format!("> {}", self.threshold), &self.confident),
            (format!("<= {} and > 0.5", self.threshold), &self.partial),
            ("<= 0.5".to_string(), &self.weak),
            ("= 0.0".to_string(), &self.unmatched),
        ];

        let mut out = String::new();
        for (title, alignments) in sections {
            let _ = writeln!(out, "### {title} {}", "#".repeat(40usize.saturating_sub(title.len())));
            for alignment in alignments {
                let _ = writeln!(out, "--- {:.4} ---------------------------", alignment.score);
                let _ = writeln!(out, "Pred: {}", describe(alignment.predicted.as_ref()));
                let _ = writeln!(out, "True: {}", describe(alignment.reference.as_ref()));
            }
            out.push('\n');
        }
        out
    }
}

fn describe(node: Option<&Node>) -> String {
    match node {
        Some(node) => {
            let name = node.name.split_whitespace().collect::<Vec<_>>().join(" ");
            format!("{name} ({})", node.entity_type)
        }
        None => "---".to_string(),
    }
}

/// Means over several documents
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub documents: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub f_beta: f64,
    /// Mean over the documents whose edit distance is known
    pub edit_distance: Option<f64>,
    pub unknown_edit_distances: usize,
}

impl EvaluationSummary {
    pub fn from_reports(reports: &[EvaluationReport]) -> Self {
        if reports.is_empty() {
            return Self::default();
        }
        let n = reports.len() as f64;
        let mean = |f: fn(&EvaluationReport) -> f64| reports.iter().map(f).sum::<f64>() / n;

        let known: Vec<f64> = reports
            .iter()
            .filter_map(|r| r.edit_distance.value())
            .collect();
        let edit_distance =
            (!known.is_empty()).then(|| known.iter().sum::<f64>() / known.len() as f64);

        Self {
            documents: reports.len(),
            precision: mean(|r| r.precision),
            recall: mean(|r| r.recall),
            f1: mean(|r| r.f1),
            f_beta: mean(|r| r.f_beta),
            edit_distance,
            unknown_edit_distances: reports.len() - known.len(),
        }
    }
}

/// Configured evaluator
pub struct GraphEvaluator {
    config: EvaluationConfig,
    similarity: Arc<dyn TextSimilarity>,
    ged_node_matcher: SimilarityNodeMatcher,
}

impl GraphEvaluator {
    pub fn new(config: EvaluationConfig) -> ConfigResult<Self> {
        config.validate()?;
        let similarity = config.similarity.scorer(&config.pos_tags()?);
        let ged_similarity = |a: &str, b: &str| token_similarity(&a.to_lowercase(), &b.to_lowercase());
        let ged_node_matcher =
            SimilarityNodeMatcher::new(Arc::new(ged_similarity), config.ged_node_threshold, false);
        Ok(Self {
            config,
            similarity,
            ged_node_matcher,
        })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn evaluate(&self, predicted: &Graph, reference: &Graph) -> Result<EvaluationReport> {
        let alignments = optimal_matching(
            predicted,
            reference,
            self.similarity.as_ref(),
            self.config.type_gate,
        );
        let stats = Stats::compute(predicted, reference, &alignments, self.config.match_threshold);

        let edit_distance = graph_edit_distance(
            predicted,
            reference,
            &self.ged_node_matcher,
            &RelationTypeEdgeMatcher,
            self.config.ged_timeout(),
        );

        let report = EvaluationReport {
            stats,
            precision: stats.precision(),
            recall: stats.recall(),
            f1: stats.f1(),
            f_beta: stats.f_beta(self.config.beta)?,
            beta: self.config.beta,
            edit_distance,
            alignments: alignments.iter().map(|a| a.detach()).collect(),
        };

        info!(
            predicted = predicted.node_count(),
            reference = reference.node_count(),
            correct = stats.num_correct,
            precision = report.precision,
            recall = report.recall,
            "Evaluated graph"
        );
        Ok(report)
    }
}
