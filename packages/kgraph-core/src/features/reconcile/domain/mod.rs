//! Reconciliation domain: clustering and graph operations

pub mod clustering;
pub mod operations;

pub use clustering::{cluster_nodes, NodeClusters};
pub use operations::{compact, merge, replace_node, union};
