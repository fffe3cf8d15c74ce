//! Immutable knowledge graph snapshot
//!
//! # Invariant
//!
//! Every edge endpoint refers to a node of the same graph. All public
//! constructors check this and fail with
//! [`KnowledgeGraphError::DanglingReference`]; transformations return new
//! graphs and never mutate an existing one.

use rustc_hash::FxHashMap;

use super::edge::{Edge, EdgeRef, IdEdge, NodeIndex};
use super::node::Node;
use crate::errors::{KnowledgeGraphError, Result};

/// Order-preserving sequence of nodes and edges
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Graph without nodes or edges
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a graph from nodes and index-based edges
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        let graph = Self { nodes, edges };
        graph.validate()?;
        Ok(graph)
    }

    /// Build a graph whose edges name their endpoints by node id
    ///
    /// An id resolves to the first node carrying it.
    pub fn from_id_edges(nodes: Vec<Node>, edges: Vec<IdEdge>) -> Result<Self> {
        let lookup = first_index_by_id(&nodes);
        let resolve = |edge_id: &str, node_id: &str| {
            lookup
                .get(node_id)
                .copied()
                .ok_or_else(|| KnowledgeGraphError::dangling(edge_id, node_id))
        };

        let mut resolved = Vec::with_capacity(edges.len());
        for edge in edges {
            let source = resolve(&edge.id, &edge.source_id)?;
            let target = resolve(&edge.id, &edge.target_id)?;
            resolved.push(Edge {
                id: edge.id,
                source,
                target,
                relation_type: edge.relation_type,
            });
        }

        Ok(Self {
            nodes,
            edges: resolved,
        })
    }

    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    /// Crate-internal constructor for callers that already guarantee the invariant
    pub(crate) fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        debug_assert!(edges
            .iter()
            .all(|e| e.source.index() < nodes.len() && e.target.index() < nodes.len()));
        Self { nodes, edges }
    }

    pub(crate) fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }

    /// Check the endpoint invariant
    pub fn validate(&self) -> Result<()> {
        for edge in &self.edges {
            for endpoint in [edge.source, edge.target] {
                if endpoint.index() >= self.nodes.len() {
                    return Err(KnowledgeGraphError::dangling(
                        edge.id.clone(),
                        endpoint.to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.index())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// First node with the given id
    pub fn find_node(&self, id: &str) -> Option<(NodeIndex, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .find(|(_, n)| n.id == id)
            .map(|(i, n)| (NodeIndex::new(i), n))
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = &str> {
        self.edges.iter().map(|e| e.id.as_str())
    }

    /// Resolve an edge of this graph to its endpoint nodes
    pub fn edge_ref<'a>(&'a self, edge: &'a Edge) -> Option<EdgeRef<'a>> {
        Some(EdgeRef {
            edge,
            source: self.node(edge.source)?,
            target: self.node(edge.target)?,
        })
    }

    /// All edges with resolved endpoints
    pub fn edge_refs(&self) -> impl Iterator<Item = EdgeRef<'_>> {
        self.edges.iter().filter_map(move |e| self.edge_ref(e))
    }
}

fn first_index_by_id(nodes: &[Node]) -> FxHashMap<&str, NodeIndex> {
    let mut lookup = FxHashMap::default();
    for (i, node) in nodes.iter().enumerate() {
        lookup.entry(node.id.as_str()).or_insert(NodeIndex::new(i));
    }
    lookup
}

/// Incremental graph construction
///
/// ```
/// use kgraph_core::shared::models::{Graph, Node};
///
/// let mut builder = Graph::builder();
/// let pump = builder.add_node(Node::new("n1", "Pump", "Resource"));
/// let valve = builder.add_node(Node::new("n2", "Valve", "Resource"));
/// builder.add_edge("e1", pump, valve, "connected to");
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    id_edges: Vec<IdEdge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        self.nodes.push(node);
        NodeIndex::new(self.nodes.len() - 1)
    }

    pub fn add_edge(
        &mut self,
        id: impl Into<String>,
        source: NodeIndex,
        target: NodeIndex,
        relation_type: impl Into<String>,
    ) -> &mut Self {
        self.edges.push(Edge::new(id, source, target, relation_type));
        self
    }

    /// Add an edge by endpoint ids, resolved when the graph is built
    pub fn add_edge_by_id(
        &mut self,
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relation_type: impl Into<String>,
    ) -> &mut Self {
        self.id_edges
            .push(IdEdge::new(id, source_id, target_id, relation_type));
        self
    }

    pub fn build(self) -> Result<Graph> {
        let Self {
            nodes,
            mut edges,
            id_edges,
        } = self;

        if !id_edges.is_empty() {
            let lookup = first_index_by_id(&nodes);
            for edge in id_edges {
                let source = *lookup
                    .get(edge.source_id.as_str())
                    .ok_or_else(|| KnowledgeGraphError::dangling(&edge.id, &edge.source_id))?;
                let target = *lookup
                    .get(edge.target_id.as_str())
                    .ok_or_else(|| KnowledgeGraphError::dangling(&edge.id, &edge.target_id))?;
                edges.push(Edge::new(edge.id, source, target, edge.relation_type));
            }
        }

        Graph::new(nodes, edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Graph {
        let mut b = Graph::builder();
        let a = b.add_node(Node::new("a", "Pump", "Resource"));
        let c = b.add_node(Node::new("c", "Leak", "Condition"));
        b.add_edge("e1", a, c, "has condition");
        b.build().unwrap()
    }

    #[test]
    fn test_builder_and_accessors() {
        let g = sample();
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.node_ids().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(g.edge_ids().collect::<Vec<_>>(), vec!["e1"]);

        let edge = g.edge_refs().next().unwrap();
        assert_eq!(edge.source.name, "Pump");
        assert_eq!(edge.target.name, "Leak");
        assert_eq!(edge.relation_type(), "has condition");
    }

    #[test]
    fn test_out_of_range_index_is_dangling() {
        let nodes = vec![Node::new("a", "Pump", "Resource")];
        let edges = vec![Edge::new("e1", NodeIndex::new(0), NodeIndex::new(3), "r")];

        let err = Graph::new(nodes, edges).unwrap_err();
        match err {
            KnowledgeGraphError::DanglingReference { edge_id, node_id } => {
                assert_eq!(edge_id, "e1");
                assert_eq!(node_id, "#3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_id_edges_unknown_id() {
        let nodes = vec![Node::new("a", "Pump", "Resource")];
        let edges = vec![IdEdge::new("e1", "a", "ghost", "r")];

        let err = Graph::from_id_edges(nodes, edges).unwrap_err();
        assert!(err.is_dangling_reference());
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_from_id_edges_resolves_first_occurrence() {
        let nodes = vec![
            Node::new("dup", "first", "t"),
            Node::new("dup", "second", "t"),
        ];
        let edges = vec![IdEdge::new("e1", "dup", "dup", "self")];

        let g = Graph::from_id_edges(nodes, edges).unwrap();
        assert_eq!(g.edges()[0].source, NodeIndex::new(0));
        assert_eq!(g.edges()[0].target, NodeIndex::new(0));
    }

    #[test]
    fn test_builder_by_id_dangling() {
        let mut b = Graph::builder();
        b.add_node(Node::new("a", "Pump", "Resource"));
        b.add_edge_by_id("e1", "a", "missing", "r");
        assert!(b.build().unwrap_err().is_dangling_reference());
    }

    #[test]
    fn test_find_node() {
        let g = sample();
        let (ix, node) = g.find_node("c").unwrap();
        assert_eq!(ix, NodeIndex::new(1));
        assert_eq!(node.name, "Leak");
        assert!(g.find_node("zzz").is_none());
    }

    #[test]
    fn test_empty() {
        let g = Graph::empty();
        assert!(g.is_empty());
        assert!(g.validate().is_ok());
    }
}
