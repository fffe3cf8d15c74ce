//! Node selection and backward breadth-first trees
//!
//! Trees start at chosen roots and follow each edge from its target to its
//! source, so a root lists everything that points at it.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::shared::models::{Graph, NodeIndex};

/// Nodes whose type label equals `entity_type`
pub fn entities_by_type(graph: &Graph, entity_type: &str) -> Vec<NodeIndex> {
    graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, n)| n.entity_type == entity_type)
        .map(|(i, _)| NodeIndex::new(i))
        .collect()
}

/// Nodes that are never the source of an edge
pub fn root_nodes(graph: &Graph) -> Vec<NodeIndex> {
    let mut is_source = vec![false; graph.node_count()];
    for edge in graph.edges() {
        is_source[edge.source.index()] = true;
    }
    is_source
        .iter()
        .enumerate()
        .filter(|(_, &s)| !s)
        .map(|(i, _)| NodeIndex::new(i))
        .collect()
}

/// Distinct nodes sharing an edge with any of `roots`, in edge order
pub fn neighbours_of(graph: &Graph, roots: &[NodeIndex]) -> Vec<NodeIndex> {
    let roots: FxHashSet<NodeIndex> = roots.iter().copied().collect();
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    for edge in graph.edges() {
        if roots.contains(&edge.source) && seen.insert(edge.target) {
            out.push(edge.target);
        }
        if roots.contains(&edge.target) && seen.insert(edge.source) {
            out.push(edge.source);
        }
    }
    out
}

/// Breadth-first spanning forest
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraversalTree {
    roots: Vec<NodeIndex>,
    children: Vec<Vec<NodeIndex>>,
}

impl TraversalTree {
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn children(&self, node: NodeIndex) -> &[NodeIndex] {
        self.children
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of nodes reached, roots included
    pub fn len(&self) -> usize {
        self.roots.len() + self.children.iter().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Walk edges backwards (target to source) from `roots`
///
/// Every node appears at most once. Duplicate roots and roots outside the
/// graph are skipped.
pub fn bfs_tree(graph: &Graph, roots: &[NodeIndex]) -> TraversalTree {
    let n = graph.node_count();
    let mut incoming: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
    for edge in graph.edges() {
        incoming[edge.target.index()].push(edge.source);
    }

    let mut tree = TraversalTree {
        roots: Vec::new(),
        children: vec![Vec::new(); n],
    };
    let mut explored = vec![false; n];
    let mut queue = VecDeque::new();

    for &root in roots {
        if root.index() >= n || explored[root.index()] {
            continue;
        }
        explored[root.index()] = true;
        tree.roots.push(root);
        queue.push_back(root);
    }

    while let Some(v) = queue.pop_front() {
        for &w in &incoming[v.index()] {
            if explored[w.index()] {
                continue;
            }
            explored[w.index()] = true;
            tree.children[v.index()].push(w);
            queue.push_back(w);
        }
    }

    tree
}

/// One line per node: `├── name (type)` for roots, indented `└──` below
pub fn render_tree(graph: &Graph, tree: &TraversalTree) -> Vec<String> {
    let mut lines = Vec::with_capacity(tree.len());
    let mut stack: Vec<(NodeIndex, usize)> = tree.roots().iter().rev().map(|&r| (r, 0)).collect();

    while let Some((ix, level)) = stack.pop() {
        if let Some(node) = graph.node(ix) {
            if level == 0 {
                lines.push(format!("├── {} ({})", node.name, node.entity_type));
            } else {
                lines.push(format!(
                    "| {} └── {} ({})",
                    "   ".repeat(level),
                    node.name,
                    node.entity_type
                ));
            }
        }
        stack.extend(tree.children(ix).iter().rev().map(|&c| (c, level + 1)));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::Node;
    use pretty_assertions::assert_eq;

    // printer <- nozzle <- heater, printer <- frame, spool (isolated)
    fn printer() -> Graph {
        let mut b = Graph::builder();
        let printer = b.add_node(Node::new("p", "3D printer", "Product"));
        let nozzle = b.add_node(Node::new("n", "Nozzle", "Resource"));
        let heater = b.add_node(Node::new("h", "Heater", "Resource"));
        let frame = b.add_node(Node::new("f", "Frame", "Resource"));
        b.add_node(Node::new("s", "Spool", "Resource"));
        b.add_edge("e1", nozzle, printer, "part of");
        b.add_edge("e2", heater, nozzle, "part of");
        b.add_edge("e3", frame, printer, "part of");
        b.add_edge("e4", heater, printer, "part of");
        b.build().unwrap()
    }

    fn ix(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn test_entities_by_type() {
        let g = printer();
        assert_eq!(entities_by_type(&g, "Product"), vec![ix(0)]);
        assert_eq!(entities_by_type(&g, "Resource").len(), 4);
        assert!(entities_by_type(&g, "product").is_empty());
    }

    #[test]
    fn test_root_nodes() {
        assert_eq!(root_nodes(&printer()), vec![ix(0), ix(4)]);
    }

    #[test]
    fn test_neighbours_are_distinct() {
        let g = printer();
        assert_eq!(neighbours_of(&g, &[ix(0)]), vec![ix(1), ix(3), ix(2)]);
        assert_eq!(neighbours_of(&g, &[ix(1), ix(2)]), vec![ix(0), ix(1), ix(2)]);
    }

    #[test]
    fn test_bfs_visits_each_node_once() {
        let g = printer();
        let tree = bfs_tree(&g, &[ix(0), ix(4), ix(0)]);

        assert_eq!(tree.roots(), &[ix(0), ix(4)]);
        // heater is reached directly from the printer, not through the nozzle
        assert_eq!(tree.children(ix(0)), &[ix(1), ix(3), ix(2)]);
        assert!(tree.children(ix(1)).is_empty());
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_render_tree() {
        let g = printer();
        let lines = render_tree(&g, &bfs_tree(&g, &[ix(1)]));
        assert_eq!(
            lines,
            vec![
                "├── Nozzle (Resource)".to_string(),
                "|     └── Heater (Resource)".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_graph() {
        let g = Graph::empty();
        assert!(root_nodes(&g).is_empty());
        assert!(bfs_tree(&g, &[ix(0)]).is_empty());
        assert!(render_tree(&g, &TraversalTree::default()).is_empty());
    }
}
