//! Graph listing
//!
//! Read-only helpers used when reviewing an extracted graph by hand:
//! selecting nodes by type, finding roots, and printing the graph as a tree
//! grown backwards along its edges.

mod traversal;

pub use traversal::{bfs_tree, entities_by_type, neighbours_of, render_tree, root_nodes, TraversalTree};
