//! Graph Reconciliation
//!
//! Folds newly extracted subgraphs into an accumulated graph, collapsing
//! nodes and edges that denote the same entity or relation.
//!
//! # Hexagonal Architecture
//!
//! ```text
//! application/ (Reconciler use case, config driven)
//!           ↓
//! domain/ (clustering, union / compact / merge / replace_node)
//! ```
//!
//! # Usage
//!
//! ```
//! use kgraph_core::config::ReconcileConfig;
//! use kgraph_core::features::reconcile::Reconciler;
//! use kgraph_core::shared::models::{Graph, Node};
//!
//! let mut accumulated = Graph::builder();
//! accumulated.add_node(Node::new("n1", "Vacuum pump", "Resource"));
//! let accumulated = accumulated.build().unwrap();
//!
//! let mut candidate = Graph::builder();
//! candidate.add_node(Node::new("m1", "Vacuum pumps", "Resource"));
//! let candidate = candidate.build().unwrap();
//!
//! let output = Reconciler::new(ReconcileConfig::default())
//!     .merge(&accumulated, &candidate)
//!     .unwrap();
//! assert_eq!(output.graph.node_count(), 1);
//! assert_eq!(output.graph.nodes()[0].name, "Vacuum pumps");
//! ```

pub mod application;
pub mod domain;

pub use application::{ReconcileOutput, ReconcileStats, Reconciler};
pub use domain::{cluster_nodes, compact, merge, replace_node, union, NodeClusters};
