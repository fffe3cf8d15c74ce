//! Reconciliation use case
//!
//! Builds the node and edge matchers from a [`ReconcileConfig`] and applies
//! them to compact or merge graphs.

use std::time::Instant;

use tracing::info;

use crate::config::ReconcileConfig;
use crate::errors::Result;
use crate::features::matching::{EdgeMatch, NodeMatch, SimilarityNodeMatcher, StrictEdgeMatcher};
use crate::features::reconcile::domain::operations;
use crate::shared::models::Graph;

/// Result of a reconciliation run
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutput {
    pub graph: Graph,
    pub stats: ReconcileStats,
}

/// Size of the graph before and after reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileStats {
    pub nodes_in: usize,
    pub nodes_out: usize,
    pub edges_in: usize,
    pub edges_out: usize,
    pub execution_time_ms: u64,
}

impl ReconcileStats {
    fn between(input: &Graph, output: &Graph, started: Instant) -> Self {
        Self {
            nodes_in: input.node_count(),
            nodes_out: output.node_count(),
            edges_in: input.edge_count(),
            edges_out: output.edge_count(),
            execution_time_ms: started.elapsed().as_millis() as u64,
        }
    }

    pub fn nodes_collapsed(&self) -> usize {
        self.nodes_in - self.nodes_out
    }

    pub fn edges_dropped(&self) -> usize {
        self.edges_in - self.edges_out
    }
}

/// Configured reconciler
pub struct Reconciler {
    config: ReconcileConfig,
    node_matcher: SimilarityNodeMatcher,
    edge_matcher: Option<StrictEdgeMatcher>,
}

impl Reconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        let node_matcher = SimilarityNodeMatcher::new(
            config.similarity.scorer(&[]),
            config.node_threshold,
            config.case_sensitive,
        );
        let edge_matcher = config.deduplicate_edges.then_some(StrictEdgeMatcher);
        Self {
            config,
            node_matcher,
            edge_matcher,
        }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn node_matcher(&self) -> &dyn NodeMatch {
        &self.node_matcher
    }

    pub fn edge_matcher(&self) -> Option<&dyn EdgeMatch> {
        self.edge_matcher.as_ref().map(|m| m as &dyn EdgeMatch)
    }

    pub fn compact(&self, graph: &Graph) -> Result<ReconcileOutput> {
        let started = Instant::now();
        let compacted = operations::compact(graph, Some(self.node_matcher()), self.edge_matcher())?;
        let stats = ReconcileStats::between(graph, &compacted, started);
        Ok(ReconcileOutput {
            graph: compacted,
            stats,
        })
    }

    /// Fold `candidate` into `accumulated`
    pub fn merge(&self, accumulated: &Graph, candidate: &Graph) -> Result<ReconcileOutput> {
        let started = Instant::now();
        let union = operations::union(accumulated, candidate);
        let merged = operations::compact(&union, Some(self.node_matcher()), self.edge_matcher())?;
        let stats = ReconcileStats::between(&union, &merged, started);

        info!(
            accumulated_nodes = accumulated.node_count(),
            candidate_nodes = candidate.node_count(),
            merged_nodes = stats.nodes_out,
            merged_edges = stats.edges_out,
            elapsed_ms = stats.execution_time_ms,
            "Merged candidate graph"
        );

        Ok(ReconcileOutput {
            graph: merged,
            stats,
        })
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(ReconcileConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use crate::shared::models::Node;

    fn graph(nodes: &[(&str, &str, &str)], edges: &[(&str, usize, usize, &str)]) -> Graph {
        let mut b = Graph::builder();
        let ixs: Vec<_> = nodes
            .iter()
            .map(|(id, name, ty)| b.add_node(Node::new(*id, *name, *ty)))
            .collect();
        for (id, s, t, rel) in edges {
            b.add_edge(*id, ixs[*s], ixs[*t], *rel);
        }
        b.build().unwrap()
    }

    #[test]
    fn test_merge_stats() {
        let reconciler = Reconciler::new(ReconcileConfig::from_preset(Preset::Lenient));
        let a = graph(&[("a1", "Pump", "Resource"), ("a2", "Leak", "Condition")], &[("e1", 0, 1, "has")]);
        let b = graph(&[("b1", "Pumps", "Resource"), ("b2", "Leak", "Condition")], &[("e2", 0, 1, "has")]);

        let output = reconciler.merge(&a, &b).unwrap();
        assert_eq!(output.graph.node_count(), 2);
        assert_eq!(output.graph.edge_count(), 1);
        assert_eq!(output.stats.nodes_in, 4);
        assert_eq!(output.stats.nodes_collapsed(), 2);
        assert_eq!(output.stats.edges_dropped(), 1);
        assert_eq!(output.graph.nodes()[0].name, "Pumps");
    }

    #[test]
    fn test_edge_dedup_can_be_disabled() {
        let config = ReconcileConfig::default().deduplicate_edges(false);
        let reconciler = Reconciler::new(config);
        assert!(reconciler.edge_matcher().is_none());

        let a = graph(&[("a1", "Pump", "Resource"), ("a2", "Leak", "Condition")], &[("e1", 0, 1, "has")]);
        let output = reconciler.merge(&a, &a).unwrap();
        assert_eq!(output.graph.node_count(), 2);
        assert_eq!(output.graph.edge_count(), 2);
    }

    #[test]
    fn test_case_insensitive_types() {
        let a = graph(&[("a1", "Pump", "Resource")], &[]);
        let b = graph(&[("b1", "Pump", "resource")], &[]);

        let sensitive = Reconciler::default();
        assert_eq!(sensitive.merge(&a, &b).unwrap().graph.node_count(), 2);

        let folded = Reconciler::new(ReconcileConfig::default().case_sensitive(false));
        assert_eq!(folded.merge(&a, &b).unwrap().graph.node_count(), 1);
    }

    #[test]
    fn test_compact_is_idempotent() {
        let reconciler = Reconciler::default();
        let g = graph(
            &[
                ("n1", "vacuum pump", "Resource"),
                ("n2", "vacuum pumps", "Resource"),
                ("n3", "seal", "Resource"),
            ],
            &[("e1", 0, 2, "contains"), ("e2", 1, 2, "contains")],
        );
        let once = reconciler.compact(&g).unwrap().graph;
        let twice = reconciler.compact(&once).unwrap().graph;
        assert_eq!(once, twice);
        assert_eq!(once.node_count(), 2);
        assert_eq!(once.edge_count(), 1);
    }
}
