//! Per-concern configuration structs
//!
//! Each struct has preset defaults, chainable setters for the builder
//! closures and a `validate()` range check.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{check_unit_interval, ConfigError, ConfigResult};
use super::preset::Preset;
use crate::features::similarity::{PosTag, SimilarityKind};

// ═══════════════════════════════════════════════════════════════════════════
// Reconciliation
// ═══════════════════════════════════════════════════════════════════════════

/// Node and edge matching used when compacting or merging graphs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconcileConfig {
    /// Name similarity used by the node matcher
    #[serde(default = "default_reconcile_similarity")]
    pub similarity: SimilarityKind,

    /// Minimum name similarity for two nodes of the same type to merge
    pub node_threshold: f64,

    /// Compare type labels case-sensitively
    #[serde(default = "default_true")]
    pub case_sensitive: bool,

    /// Drop edges equal (type and endpoints) to an already kept edge
    #[serde(default = "default_true")]
    pub deduplicate_edges: bool,
}

fn default_true() -> bool {
    true
}

fn default_reconcile_similarity() -> SimilarityKind {
    SimilarityKind::Character
}

impl ReconcileConfig {
    pub fn from_preset(preset: Preset) -> Self {
        let node_threshold = match preset {
            Preset::Strict => 0.8,
            Preset::Balanced | Preset::Custom => 0.6,
            Preset::Lenient => 0.5,
        };
        Self {
            similarity: default_reconcile_similarity(),
            node_threshold,
            case_sensitive: true,
            deduplicate_edges: true,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        check_unit_interval(
            "reconcile.node_threshold",
            self.node_threshold,
            "Similarity ratios lie in 0.0..=1.0",
        )
    }

    pub fn similarity(mut self, v: SimilarityKind) -> Self {
        self.similarity = v;
        self
    }

    pub fn node_threshold(mut self, v: f64) -> Self {
        self.node_threshold = v;
        self
    }

    pub fn case_sensitive(mut self, v: bool) -> Self {
        self.case_sensitive = v;
        self
    }

    pub fn deduplicate_edges(mut self, v: bool) -> Self {
        self.deduplicate_edges = v;
        self
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Evaluation
// ═══════════════════════════════════════════════════════════════════════════

/// Scoring of a predicted graph against a reference graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationConfig {
    /// Name similarity used to build the assignment matrix
    #[serde(default = "default_evaluation_similarity")]
    pub similarity: SimilarityKind,

    /// Minimum score for an aligned pair to count as correct
    pub match_threshold: f64,

    /// Score pairs with different type labels as 0
    #[serde(default = "default_true")]
    pub type_gate: bool,

    /// Penn Treebank tags dropped before overlap similarity
    #[serde(default = "default_ignored_pos_tags")]
    pub ignored_pos_tags: Vec<String>,

    /// Wall-clock budget for graph edit distance (0 disables it)
    #[serde(default = "default_ged_timeout")]
    pub ged_timeout_secs: f64,

    /// Name similarity at which graph edit distance treats nodes as equal
    #[serde(default = "default_ged_node_threshold")]
    pub ged_node_threshold: f64,

    /// Recall weight of the F-beta score
    #[serde(default = "default_beta")]
    pub beta: f64,
}

fn default_evaluation_similarity() -> SimilarityKind {
    SimilarityKind::Token
}

fn default_ignored_pos_tags() -> Vec<String> {
    ["DT", "IN", "CC", "TO"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

fn default_ged_timeout() -> f64 {
    120.0
}

fn default_ged_node_threshold() -> f64 {
    0.6
}

fn default_beta() -> f64 {
    2.0
}

impl EvaluationConfig {
    pub fn from_preset(preset: Preset) -> Self {
        let match_threshold = match preset {
            Preset::Strict => 0.6,
            Preset::Balanced | Preset::Custom => 0.4,
            Preset::Lenient => 0.2,
        };
        Self {
            similarity: default_evaluation_similarity(),
            match_threshold,
            type_gate: true,
            ignored_pos_tags: default_ignored_pos_tags(),
            ged_timeout_secs: default_ged_timeout(),
            ged_node_threshold: default_ged_node_threshold(),
            beta: default_beta(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        check_unit_interval(
            "evaluation.match_threshold",
            self.match_threshold,
            "Similarity ratios lie in 0.0..=1.0",
        )?;
        check_unit_interval(
            "evaluation.ged_node_threshold",
            self.ged_node_threshold,
            "Similarity ratios lie in 0.0..=1.0",
        )?;

        if !self.ged_timeout_secs.is_finite() || self.ged_timeout_secs < 0.0 {
            return Err(ConfigError::range_with_hint(
                "evaluation.ged_timeout_secs",
                self.ged_timeout_secs,
                0,
                "inf",
                "Edit distance needs a finite deadline",
            ));
        }

        if !self.beta.is_finite() || self.beta <= 0.0 {
            return Err(ConfigError::range_with_hint(
                "evaluation.beta",
                self.beta,
                "0 (exclusive)",
                "inf",
                "F-beta is undefined for beta <= 0",
            ));
        }

        self.pos_tags()?;
        Ok(())
    }

    /// Edit distance deadline; timeouts too long for a `Duration` mean no deadline
    pub fn ged_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.ged_timeout_secs).unwrap_or(Duration::MAX)
    }

    /// Parsed ignore list
    pub fn pos_tags(&self) -> ConfigResult<Vec<PosTag>> {
        self.ignored_pos_tags
            .iter()
            .map(|t| t.parse::<PosTag>())
            .collect()
    }

    pub fn similarity(mut self, v: SimilarityKind) -> Self {
        self.similarity = v;
        self
    }

    pub fn match_threshold(mut self, v: f64) -> Self {
        self.match_threshold = v;
        self
    }

    pub fn type_gate(mut self, v: bool) -> Self {
        self.type_gate = v;
        self
    }

    pub fn ignored_pos_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_pos_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn ged_timeout_secs(mut self, v: f64) -> Self {
        self.ged_timeout_secs = v;
        self
    }

    pub fn ged_node_threshold(mut self, v: f64) -> Self {
        self.ged_node_threshold = v;
        self
    }

    pub fn beta(mut self, v: f64) -> Self {
        self.beta = v;
        self
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_presets() {
        assert_eq!(ReconcileConfig::from_preset(Preset::Strict).node_threshold, 0.8);
        assert_eq!(ReconcileConfig::from_preset(Preset::Balanced).node_threshold, 0.6);
        assert_eq!(ReconcileConfig::from_preset(Preset::Lenient).node_threshold, 0.5);
        assert_eq!(
            ReconcileConfig::from_preset(Preset::Custom),
            ReconcileConfig::from_preset(Preset::Balanced)
        );
    }

    #[test]
    fn test_reconcile_validate() {
        assert!(ReconcileConfig::default().validate().is_ok());
        let err = ReconcileConfig::default()
            .node_threshold(1.2)
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), Some("reconcile.node_threshold"));
    }

    #[test]
    fn test_evaluation_defaults() {
        let cfg = EvaluationConfig::from_preset(Preset::Lenient);
        assert_eq!(cfg.match_threshold, 0.2);
        assert_eq!(cfg.similarity, SimilarityKind::Token);
        assert_eq!(cfg.beta, 2.0);
        assert!(cfg.type_gate);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_evaluation_rejects_non_positive_beta() {
        for beta in [0.0, -1.0, f64::NAN] {
            let err = EvaluationConfig::default().beta(beta).validate().unwrap_err();
            assert_eq!(err.field(), Some("evaluation.beta"));
        }
    }

    #[test]
    fn test_evaluation_rejects_negative_timeout() {
        let err = EvaluationConfig::default()
            .ged_timeout_secs(-1.0)
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), Some("evaluation.ged_timeout_secs"));
    }

    #[test]
    fn test_evaluation_rejects_unknown_tag() {
        let err = EvaluationConfig::default()
            .ignored_pos_tags(["DT", "XYZ"])
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPosTag(tag) if tag == "XYZ"));
    }

    #[test]
    fn test_ged_timeout_saturates() {
        let huge = EvaluationConfig::default().ged_timeout_secs(1e20);
        assert!(huge.validate().is_ok());
        assert_eq!(huge.ged_timeout(), Duration::MAX);

        let short = EvaluationConfig::default().ged_timeout_secs(1.5);
        assert_eq!(short.ged_timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn test_pos_tags_parse() {
        let tags = EvaluationConfig::default()
            .ignored_pos_tags(["DT", "prp"])
            .pos_tags()
            .unwrap();
        assert_eq!(tags, vec![PosTag::Determiner, PosTag::Pronoun]);
    }
}
