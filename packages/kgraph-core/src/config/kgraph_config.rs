//! Top-level configuration with preset defaults and override support

use std::path::Path;

use tracing::debug;

use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigFileV1, SUPPORTED_VERSIONS};
use super::preset::Preset;
use super::stage_configs::{EvaluationConfig, ReconcileConfig};

/// Unvalidated configuration under construction
///
/// ```
/// use kgraph_core::config::{KnowledgeGraphConfig, Preset};
///
/// let config = KnowledgeGraphConfig::preset(Preset::Lenient)
///     .reconcile(|c| c.node_threshold(0.7))
///     .build()
///     .unwrap();
/// assert_eq!(config.reconcile().node_threshold, 0.7);
/// assert_eq!(config.evaluation().match_threshold, 0.2);
/// ```
#[derive(Debug, Clone)]
pub struct KnowledgeGraphConfig {
    preset: Preset,
    reconcile: Option<ReconcileConfig>,
    evaluation: Option<EvaluationConfig>,
}

impl KnowledgeGraphConfig {
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            reconcile: None,
            evaluation: None,
        }
    }

    /// Override reconciliation settings, starting from the preset values
    pub fn reconcile<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ReconcileConfig) -> ReconcileConfig,
    {
        let base = self
            .reconcile
            .take()
            .unwrap_or_else(|| ReconcileConfig::from_preset(self.preset));
        self.reconcile = Some(f(base));
        self
    }

    /// Override evaluation settings, starting from the preset values
    pub fn evaluation<F>(mut self, f: F) -> Self
    where
        F: FnOnce(EvaluationConfig) -> EvaluationConfig,
    {
        let base = self
            .evaluation
            .take()
            .unwrap_or_else(|| EvaluationConfig::from_preset(self.preset));
        self.evaluation = Some(f(base));
        self
    }

    pub fn get_preset(&self) -> Preset {
        self.preset
    }

    pub fn build(self) -> ConfigResult<ValidatedConfig> {
        let reconcile = self
            .reconcile
            .unwrap_or_else(|| ReconcileConfig::from_preset(self.preset));
        let evaluation = self
            .evaluation
            .unwrap_or_else(|| EvaluationConfig::from_preset(self.preset));

        reconcile.validate()?;
        evaluation.validate()?;

        Ok(ValidatedConfig {
            preset: self.preset,
            reconcile,
            evaluation,
        })
    }

    /// Load and validate a YAML v1 file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<ValidatedConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "Loading configuration");
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<ValidatedConfig> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        if !SUPPORTED_VERSIONS.contains(&file.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: file.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset: Preset = file.preset.parse()?;
        let mut config = Self::preset(preset);
        config.reconcile = file.reconcile;
        config.evaluation = file.evaluation;
        config.build()
    }
}

/// Configuration that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    preset: Preset,
    reconcile: ReconcileConfig,
    evaluation: EvaluationConfig,
}

impl ValidatedConfig {
    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn reconcile(&self) -> &ReconcileConfig {
        &self.reconcile
    }

    pub fn evaluation(&self) -> &EvaluationConfig {
        &self.evaluation
    }

    pub fn into_parts(self) -> (ReconcileConfig, EvaluationConfig) {
        (self.reconcile, self.evaluation)
    }

    /// Export as YAML v1 with every section spelled out
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: 1,
            preset: self.preset.to_string(),
            reconcile: Some(self.reconcile.clone()),
            evaluation: Some(self.evaluation.clone()),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    pub fn describe(&self) -> String {
        format!(
            "preset={} reconcile(similarity={}, node_threshold={}) evaluation(similarity={}, match_threshold={}, beta={}, ged_timeout={}s)",
            self.preset,
            self.reconcile.similarity,
            self.reconcile.node_threshold,
            self.evaluation.similarity,
            self.evaluation.match_threshold,
            self.evaluation.beta,
            self.evaluation.ged_timeout_secs,
        )
    }
}

impl Default for ValidatedConfig {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            reconcile: ReconcileConfig::default(),
            evaluation: EvaluationConfig::default(),
        }
    }
}
