/*
 * kgraph-core - Knowledge Graph Reconciliation & Evaluation
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Graph value types (Node, Edge, Graph, persistence record)
 * - features/    : Vertical slices (similarity → matching → reconcile / evaluation, listing)
 * - config/      : Presets, per-concern configs, YAML v1
 * - errors       : Crate error type
 *
 * The library performs no file I/O besides reading YAML configuration;
 * graphs move in and out as values or JSON strings.
 */

#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::needless_range_loop)] // Range loop for matrix indexing

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{KnowledgeGraphConfig, Preset, ValidatedConfig};
pub use errors::{KnowledgeGraphError, Result};
pub use features::evaluation::{EditDistance, EvaluationReport, EvaluationSummary, GraphEvaluator};
pub use features::reconcile::{ReconcileOutput, Reconciler};
pub use shared::models::{Edge, EdgeRef, Graph, GraphBuilder, Node, NodeIndex};
