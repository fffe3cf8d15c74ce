//! Configuration error types

use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Range validation error
    #[error("Invalid range for field '{field}': {value} not in {min}..={max}. {hint}")]
    Range {
        field: String,
        value: String,
        min: String,
        max: String,
        hint: String,
    },

    /// Unsupported version
    #[error("Unsupported configuration version {found}. Supported versions: {}", supported.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    /// Unknown preset name
    #[error("Unknown preset '{0}'. Valid presets: strict, balanced, lenient, custom")]
    UnknownPreset(String),

    /// Unknown similarity function name
    #[error("Unknown similarity '{0}'. Valid similarities: character, token, overlap")]
    UnknownSimilarity(String),

    /// Unknown part-of-speech tag in an ignore list
    #[error("Unknown part-of-speech tag '{0}'. Use Penn Treebank tags such as DT, IN, CC")]
    UnknownPosTag(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Create a range error with a hint
    pub fn range_with_hint(
        field: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
        hint: impl Into<String>,
    ) -> Self {
        Self::Range {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
            hint: hint.into(),
        }
    }

    /// Field name for range errors
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Range { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Check that a threshold lies in `0.0..=1.0`
pub(crate) fn check_unit_interval(field: &str, value: f64, hint: &str) -> ConfigResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::range_with_hint(field, value, 0.0, 1.0, hint));
    }
    Ok(())
}
