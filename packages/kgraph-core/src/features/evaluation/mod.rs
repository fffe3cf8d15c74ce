//! Extraction Quality Evaluation
//!
//! Compares a predicted graph with a hand-labelled reference graph:
//! optimal one-to-one node alignment, precision / recall / F-scores over the
//! aligned pairs, and a bounded graph edit distance.
//!
//! # Hexagonal Architecture
//!
//! ```text
//! application/ (GraphEvaluator use case, reports and summaries)
//!           ↓
//! domain/ (alignment, stats, edit_distance)
//! ```
//!
//! # Usage
//!
//! ```
//! use kgraph_core::config::EvaluationConfig;
//! use kgraph_core::features::evaluation::{EditDistance, GraphEvaluator};
//! use kgraph_core::shared::models::{Graph, Node};
//!
//! let mut reference = Graph::builder();
//! reference.add_node(Node::new("r1", "Turbo pump", "Resource"));
//! let reference = reference.build().unwrap();
//!
//! let mut predicted = Graph::builder();
//! predicted.add_node(Node::new("p1", "turbo pump", "Resource"));
//! let predicted = predicted.build().unwrap();
//!
//! let report = GraphEvaluator::new(EvaluationConfig::default())
//!     .unwrap()
//!     .evaluate(&predicted, &reference)
//!     .unwrap();
//! assert_eq!(report.stats.num_correct, 1);
//! assert_eq!(report.edit_distance, EditDistance::Exact(0.0));
//! ```

pub mod application;
pub mod domain;

pub use application::{EvaluationReport, EvaluationSummary, GraphEvaluator, MatchBuckets};
pub use domain::{
    align_nodes, f_beta, graph_edit_distance, optimal_matching, pair_score, EditDistance,
    NodeAlignment, OwnedAlignment, Stats,
};
