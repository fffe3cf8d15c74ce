//! Persistence record for graphs
//!
//! The record is a plain nested structure (strings, numbers, `{x, y}`
//! positions) that round-trips through JSON. Edges embed full copies of
//! their endpoint records, which is the file format the graph viewer reads.
//! Loading maps each embedded endpoint back onto the node list so that edges
//! which referenced one node share it again. Records written here also carry
//! the endpoint positions, which keeps value-identical nodes apart; files
//! without them are resolved by id and value.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::edge::{Edge, NodeIndex};
use super::graph::Graph;
use super::node::{DataSource, Node, Position};
use crate::errors::{KnowledgeGraphError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub source: Option<DataSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: String,
    pub source: NodeRecord,
    pub target: NodeRecord,
    #[serde(rename = "type")]
    pub relation_type: String,
    /// Position of `source` in the node list
    #[serde(rename = "sourceIndex", default, skip_serializing_if = "Option::is_none")]
    pub source_index: Option<usize>,
    #[serde(rename = "targetIndex", default, skip_serializing_if = "Option::is_none")]
    pub target_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphRecord {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            entity_type: node.entity_type.clone(),
            position: node.position,
            source: node.source.clone(),
        }
    }
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            entity_type: record.entity_type,
            position: record.position,
            source: record.source,
        }
    }
}

impl Graph {
    pub fn to_record(&self) -> GraphRecord {
        let nodes = self.nodes().iter().map(NodeRecord::from).collect();
        let edges = self
            .edge_refs()
            .map(|e| EdgeRecord {
                id: e.edge.id.clone(),
                source: NodeRecord::from(e.source),
                target: NodeRecord::from(e.target),
                relation_type: e.edge.relation_type.clone(),
                source_index: Some(e.edge.source.index()),
                target_index: Some(e.edge.target.index()),
            })
            .collect();
        GraphRecord { nodes, edges }
    }

    /// Rebuild a graph from its record
    ///
    /// An embedded endpoint resolves to its recorded position when that
    /// node has the endpoint's id. Otherwise it resolves to the node with the
    /// same id that is value-equal to it, falling back to the first node with
    /// that id.
    pub fn from_record(record: GraphRecord) -> Result<Self> {
        let edges = {
            let mut by_id: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
            for (i, node) in record.nodes.iter().enumerate() {
                by_id.entry(node.id.as_str()).or_default().push(i);
            }

            let resolve = |edge_id: &str,
                           endpoint: &NodeRecord,
                           position: Option<usize>|
             -> Result<NodeIndex> {
                if let Some(i) = position {
                    if record.nodes.get(i).is_some_and(|n| n.id == endpoint.id) {
                        return Ok(NodeIndex::new(i));
                    }
                }
                let candidates = by_id.get(endpoint.id.as_str()).ok_or_else(|| {
                    KnowledgeGraphError::dangling(edge_id, endpoint.id.as_str())
                })?;
                let exact = candidates
                    .iter()
                    .copied()
                    .find(|&i| record.nodes[i] == *endpoint);
                Ok(NodeIndex::new(exact.unwrap_or(candidates[0])))
            };

            let mut edges = Vec::with_capacity(record.edges.len());
            for edge in &record.edges {
                let source = resolve(&edge.id, &edge.source, edge.source_index)?;
                let target = resolve(&edge.id, &edge.target, edge.target_index)?;
                edges.push(Edge::new(
                    edge.id.clone(),
                    source,
                    target,
                    edge.relation_type.clone(),
                ));
            }
            edges
        };

        let nodes = record.nodes.into_iter().map(Node::from).collect();
        Graph::new(nodes, edges)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_record())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let record: GraphRecord = serde_json::from_str(json)?;
        Self::from_record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn provenance_graph() -> Graph {
        let mut b = Graph::builder();
        let pump = b.add_node(
            Node::new("n1", "Pump", "Resource")
                .with_position(Position::new(10.0, -2.5))
                .with_source(DataSource::new("manual.pdf", 3, 4)),
        );
        let leak = b.add_node(Node::new("n2", "Leak", "Condition"));
        let seal = b.add_node(Node::new("n3", "Seal", "Resource"));
        b.add_edge("e1", pump, leak, "has condition");
        b.add_edge("e2", seal, leak, "has condition");
        b.add_edge("e3", pump, seal, "contains");
        b.build().unwrap()
    }

    #[test]
    fn test_json_roundtrip_is_lossless() {
        let graph = provenance_graph();
        let json = graph.to_json().unwrap();
        let restored = Graph::from_json(&json).unwrap();
        assert_eq!(restored, graph);
    }

    #[test]
    fn test_field_names() {
        let json = provenance_graph().to_json().unwrap();
        assert!(json.contains("\"pageStart\":3"));
        assert!(json.contains("\"pageEnd\":4"));
        assert!(json.contains("\"type\":\"Resource\""));
        assert!(json.contains("\"position\":{\"x\":10.0,\"y\":-2.5}"));
        assert!(json.contains("\"position\":null"));
    }

    #[test]
    fn test_shared_endpoint_restored_as_shared_node() {
        let restored = Graph::from_json(&provenance_graph().to_json().unwrap()).unwrap();
        // e1 and e2 both point at "Leak"; only one Leak node exists
        assert_eq!(restored.node_count(), 3);
        assert_eq!(restored.edges()[0].target, restored.edges()[1].target);
    }

    #[test]
    fn test_duplicate_ids_resolve_by_value() {
        let record = GraphRecord {
            nodes: vec![
                NodeRecord::from(&Node::new("x", "first", "t")),
                NodeRecord::from(&Node::new("x", "second", "t")),
            ],
            edges: vec![EdgeRecord {
                id: "e".to_string(),
                source: NodeRecord::from(&Node::new("x", "second", "t")),
                target: NodeRecord::from(&Node::new("x", "stale copy", "t")),
                relation_type: "r".to_string(),
                source_index: None,
                target_index: None,
            }],
        };

        let graph = Graph::from_record(record).unwrap();
        assert_eq!(graph.edges()[0].source, NodeIndex::new(1));
        assert_eq!(graph.edges()[0].target, NodeIndex::new(0));
    }

    #[test]
    fn test_value_identical_nodes_roundtrip() {
        // two copies of the same pump/leak pair, as union produces
        let mut b = Graph::builder();
        for _ in 0..2 {
            let pump = b.add_node(Node::new("n1", "Pump", "Resource"));
            let leak = b.add_node(Node::new("n2", "Leak", "Condition"));
            b.add_edge("e1", pump, leak, "has condition");
        }
        let graph = b.build().unwrap();

        let restored = Graph::from_json(&graph.to_json().unwrap()).unwrap();
        assert_eq!(restored, graph);
        assert_eq!(restored.edges()[1].source, NodeIndex::new(2));
        assert_eq!(restored.edges()[1].target, NodeIndex::new(3));
    }

    #[test]
    fn test_stale_position_falls_back_to_id() {
        let json = r#"{
            "nodes": [{"id": "a", "name": "A", "type": "t"}, {"id": "b", "name": "B", "type": "t"}],
            "edges": [{
                "id": "e1",
                "source": {"id": "a", "name": "A", "type": "t"},
                "target": {"id": "b", "name": "B", "type": "t"},
                "type": "r",
                "sourceIndex": 1,
                "targetIndex": 7
            }]
        }"#;

        let graph = Graph::from_json(json).unwrap();
        assert_eq!(graph.edges()[0].source, NodeIndex::new(0));
        assert_eq!(graph.edges()[0].target, NodeIndex::new(1));
    }

    #[test]
    fn test_missing_endpoint_is_dangling() {
        let json = r#"{
            "nodes": [{"id": "a", "name": "A", "type": "t"}],
            "edges": [{
                "id": "e1",
                "source": {"id": "a", "name": "A", "type": "t"},
                "target": {"id": "b", "name": "B", "type": "t"},
                "type": "r"
            }]
        }"#;

        let err = Graph::from_json(json).unwrap_err();
        assert!(err.is_dangling_reference());
    }
}
