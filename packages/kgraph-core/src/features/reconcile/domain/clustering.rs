//! Node clustering and representative selection
//!
//! Two nodes are linked when the node matcher accepts them in either order;
//! clusters are the connected components of that relation (transitive
//! closure), computed with a disjoint-set forest.

use petgraph::unionfind::UnionFind;

use crate::features::matching::NodeMatch;
use crate::shared::models::{Node, NodeIndex};

/// Partition of a node list into equivalence clusters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeClusters {
    /// Members in encounter order; clusters ordered by their first member
    clusters: Vec<Vec<NodeIndex>>,
    /// Cluster position of every input node
    assignment: Vec<usize>,
}

impl NodeClusters {
    /// Every node in a cluster of its own
    pub fn singletons(node_count: usize) -> Self {
        Self {
            clusters: (0..node_count).map(|i| vec![NodeIndex::new(i)]).collect(),
            assignment: (0..node_count).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn clusters(&self) -> &[Vec<NodeIndex>] {
        &self.clusters
    }

    /// Cluster position of an input node
    pub fn cluster_of(&self, node: NodeIndex) -> Option<usize> {
        self.assignment.get(node.index()).copied()
    }

    /// Longest display name per cluster, earliest member on ties
    pub fn representatives(&self, nodes: &[Node]) -> Vec<NodeIndex> {
        self.clusters
            .iter()
            .filter_map(|members| {
                members.iter().copied().reduce(|best, candidate| {
                    if nodes[candidate.index()].name_len() > nodes[best.index()].name_len() {
                        candidate
                    } else {
                        best
                    }
                })
            })
            .collect()
    }
}

/// Cluster `nodes`; without a matcher every node stays a singleton
pub fn cluster_nodes(nodes: &[Node], node_match: Option<&dyn NodeMatch>) -> NodeClusters {
    let Some(node_match) = node_match else {
        return NodeClusters::singletons(nodes.len());
    };

    let n = nodes.len();
    let mut forest = UnionFind::<usize>::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            if forest.equiv(i, j) {
                continue;
            }
            let (a, b) = (&nodes[i], &nodes[j]);
            if node_match.matches(a, b) || node_match.matches(b, a) {
                forest.union(i, j);
            }
        }
    }

    let mut cluster_by_root: Vec<Option<usize>> = vec![None; n];
    let mut clusters: Vec<Vec<NodeIndex>> = Vec::new();
    let mut assignment = Vec::with_capacity(n);
    for i in 0..n {
        let root = forest.find_mut(i);
        let position = match cluster_by_root[root] {
            Some(position) => position,
            None => {
                clusters.push(Vec::new());
                let position = clusters.len() - 1;
                cluster_by_root[root] = Some(position);
                position
            }
        };
        clusters[position].push(NodeIndex::new(i));
        assignment.push(position);
    }

    NodeClusters {
        clusters,
        assignment,
    }
}
