//! Configuration System
//!
//! Three levels, from simple to complete:
//! - Preset: `KnowledgeGraphConfig::preset(Preset::Balanced).build()?`
//! - Section override: `.reconcile(|c| c.node_threshold(0.7))`
//! - YAML v1 file: `KnowledgeGraphConfig::from_yaml("kgraph.yaml")?`
//!
//! ```yaml
//! version: 1
//! preset: lenient
//! evaluation:
//!   match_threshold: 0.3
//!   similarity: overlap
//! ```

pub mod error;
pub mod io;
pub mod kgraph_config;
pub mod preset;
pub mod stage_configs;

pub use error::{ConfigError, ConfigResult};
pub use io::ConfigFileV1;
pub use kgraph_config::{KnowledgeGraphConfig, ValidatedConfig};
pub use preset::Preset;
pub use stage_configs::{EvaluationConfig, ReconcileConfig};
