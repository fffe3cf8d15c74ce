//! Injectable equivalence predicates for nodes and edges
//!
//! Both traits are implemented for plain closures, so callers can pass any
//! `Fn(&Node, &Node) -> bool` or `Fn(EdgeRef, EdgeRef) -> bool`.

pub mod edge_matcher;
pub mod node_matcher;

pub use edge_matcher::{EdgeMatch, RelationTypeEdgeMatcher, StrictEdgeMatcher};
pub use node_matcher::{NodeMatch, SimilarityNodeMatcher};
