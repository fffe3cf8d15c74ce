//! Evaluation domain: alignment, counts and edit distance

pub mod alignment;
pub mod edit_distance;
pub mod stats;

pub use alignment::{align_nodes, optimal_matching, pair_score, NodeAlignment, OwnedAlignment};
pub use edit_distance::{graph_edit_distance, EditDistance};
pub use stats::{f_beta, Stats};
