//! Graph reconciliation operations
//!
//! All operations take graphs by reference and return new graphs.

use tracing::debug;

use super::clustering::cluster_nodes;
use crate::errors::{KnowledgeGraphError, Result};
use crate::features::matching::{EdgeMatch, NodeMatch};
use crate::shared::models::{Edge, EdgeRef, Graph, Node, NodeIndex};

/// Concatenate nodes and edges without deduplication
///
/// Edges of `second` are shifted past the nodes of `first`. Duplicate ids
/// across the inputs are kept as they are.
pub fn union(first: &Graph, second: &Graph) -> Graph {
    let offset = first.node_count();

    let mut nodes = Vec::with_capacity(first.node_count() + second.node_count());
    nodes.extend_from_slice(first.nodes());
    nodes.extend_from_slice(second.nodes());

    let mut edges = Vec::with_capacity(first.edge_count() + second.edge_count());
    edges.extend_from_slice(first.edges());
    edges.extend(second.edges().iter().map(|e| Edge {
        id: e.id.clone(),
        source: NodeIndex::new(e.source.index() + offset),
        target: NodeIndex::new(e.target.index() + offset),
        relation_type: e.relation_type.clone(),
    }));

    Graph::from_parts(nodes, edges)
}

/// Collapse equivalent nodes and edges
///
/// 1. Cluster nodes under `node_match` (transitive).
/// 2. Keep the longest-named node of each cluster.
/// 3. Point every edge at the representatives of its endpoints.
/// 4. Keep an edge unless `edge_match` accepts it against an edge already
///    kept (not transitive).
///
/// Fails with [`KnowledgeGraphError::DanglingReference`] if an edge endpoint
/// has no representative; no partial graph is returned in that case.
pub fn compact(
    graph: &Graph,
    node_match: Option<&dyn NodeMatch>,
    edge_match: Option<&dyn EdgeMatch>,
) -> Result<Graph> {
    let clusters = cluster_nodes(graph.nodes(), node_match);
    let representatives: Vec<Node> = clusters
        .representatives(graph.nodes())
        .into_iter()
        .map(|ix| graph.nodes()[ix.index()].clone())
        .collect();

    let remap = |edge: &Edge, endpoint: NodeIndex| {
        clusters
            .cluster_of(endpoint)
            .map(NodeIndex::new)
            .ok_or_else(|| KnowledgeGraphError::dangling(&edge.id, endpoint.to_string()))
    };

    let mut rewritten = Vec::with_capacity(graph.edge_count());
    for edge in graph.edges() {
        rewritten.push(Edge {
            id: edge.id.clone(),
            source: remap(edge, edge.source)?,
            target: remap(edge, edge.target)?,
            relation_type: edge.relation_type.clone(),
        });
    }

    let edges = match edge_match {
        Some(edge_match) => deduplicate_edges(&representatives, rewritten, edge_match),
        None => rewritten,
    };

    debug!(
        nodes_in = graph.node_count(),
        nodes_out = representatives.len(),
        edges_in = graph.edge_count(),
        edges_out = edges.len(),
        "Compacted graph"
    );

    Ok(Graph::from_parts(representatives, edges))
}

/// Endpoints of `edges` must index into `nodes`
fn deduplicate_edges(nodes: &[Node], edges: Vec<Edge>, edge_match: &dyn EdgeMatch) -> Vec<Edge> {
    let mut kept: Vec<Edge> = Vec::with_capacity(edges.len());
    for edge in edges {
        let candidate = resolve(nodes, &edge);
        let duplicate = kept
            .iter()
            .any(|other| edge_match.matches(candidate, resolve(nodes, other)));
        if !duplicate {
            kept.push(edge);
        }
    }
    kept
}

fn resolve<'a>(nodes: &'a [Node], edge: &'a Edge) -> EdgeRef<'a> {
    EdgeRef {
        edge,
        source: &nodes[edge.source.index()],
        target: &nodes[edge.target.index()],
    }
}

/// `compact(union(accumulated, candidate))`
pub fn merge(
    accumulated: &Graph,
    candidate: &Graph,
    node_match: Option<&dyn NodeMatch>,
    edge_match: Option<&dyn EdgeMatch>,
) -> Result<Graph> {
    compact(&union(accumulated, candidate), node_match, edge_match)
}

/// Replace every node carrying `updated.id` with `updated`
///
/// Edges keep pointing at the same slots and therefore see the new value.
pub fn replace_node(graph: &Graph, updated: &Node) -> Graph {
    let nodes = graph
        .nodes()
        .iter()
        .map(|n| {
            if n.id == updated.id {
                updated.clone()
            } else {
                n.clone()
            }
        })
        .collect();
    Graph::from_parts(nodes, graph.edges().to_vec())
}
