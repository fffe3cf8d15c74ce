//! Shared models

mod edge;
mod graph;
mod node;
pub mod record;

pub use edge::{Edge, EdgeRef, IdEdge, NodeIndex};
pub use graph::{Graph, GraphBuilder};
pub use node::{DataSource, Node, Position};
pub use record::{EdgeRecord, GraphRecord, NodeRecord};
