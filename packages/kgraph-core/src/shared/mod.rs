//! Shared module - Common types
//!
//! Graph value types used by every feature. No feature depends on another
//! feature's internals, only on these models.

pub mod models;

// Re-exports for convenience
pub use models::*;
