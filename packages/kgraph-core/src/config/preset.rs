//! Preset configurations
//!
//! Presets provide complete default configurations for reconciliation and
//! evaluation. They differ mainly in how similar two names must be before
//! they are treated as the same entity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Few false merges
    ///
    /// - Reconcile: node threshold 0.8
    /// - Evaluation: match threshold 0.6
    Strict,

    /// Default thresholds of the extraction pipeline
    ///
    /// - Reconcile: node threshold 0.6
    /// - Evaluation: match threshold 0.4
    Balanced,

    /// Aggressive merging and lenient scoring
    ///
    /// - Reconcile: node threshold 0.5
    /// - Evaluation: match threshold 0.2
    Lenient,

    /// User-defined (YAML or builder). Starts from balanced values.
    Custom,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Balanced => "balanced",
            Self::Lenient => "lenient",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "balanced" => Ok(Self::Balanced),
            "lenient" => Ok(Self::Lenient),
            "custom" => Ok(Self::Custom),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Balanced
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_str() {
        assert_eq!("strict".parse::<Preset>().unwrap(), Preset::Strict);
        assert_eq!("BALANCED".parse::<Preset>().unwrap(), Preset::Balanced);
        assert_eq!("Lenient".parse::<Preset>().unwrap(), Preset::Lenient);
        assert!(matches!(
            "turbo".parse::<Preset>(),
            Err(ConfigError::UnknownPreset(name)) if name == "turbo"
        ));
    }

    #[test]
    fn test_preset_roundtrip() {
        for preset in [Preset::Strict, Preset::Balanced, Preset::Lenient, Preset::Custom] {
            assert_eq!(preset.as_str().parse::<Preset>().unwrap(), preset);
            assert_eq!(preset.to_string(), preset.as_str());
        }
    }

    #[test]
    fn test_default_is_balanced() {
        assert_eq!(Preset::default(), Preset::Balanced);
    }
}
