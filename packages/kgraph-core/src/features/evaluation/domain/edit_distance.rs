//! Bounded graph edit distance
//!
//! Exact depth-first branch and bound over node mappings. Every node of the
//! first graph is either substituted by an unused node of the second graph or
//! deleted; nodes of the second graph left over at the end are inserted.
//!
//! Costs (all unit):
//! - node substitution: 0 if the node matcher accepts the pair, else 1
//! - node insertion / deletion: 1
//! - edges between a mapped node pair: with `k1` edges on one side, `k2` on
//!   the other and `m` of them pairable under the edge matcher, `max(k1, k2) - m`
//! - edges touching a deleted or inserted node: 1 each
//!
//! Edges are directed and parallel edges are counted individually.
//!
//! The search is anytime: when the deadline passes it stops and reports the
//! cheapest complete mapping found so far, or [`EditDistance::Unknown`].

use std::time::{Duration, Instant};

use pathfinding::kuhn_munkres::kuhn_munkres;
use pathfinding::matrix::Matrix;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::features::matching::{EdgeMatch, NodeMatch};
use crate::shared::models::{EdgeRef, Graph};

/// Outcome of a bounded edit distance search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EditDistance {
    /// Search completed; the value is minimal
    Exact(f64),
    /// Deadline hit; cheapest edit path found before it
    BestEffort(f64),
    /// Deadline hit before any complete edit path was found
    Unknown,
}

impl EditDistance {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Exact(v) | Self::BestEffort(v) => Some(*v),
            Self::Unknown => None,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

/// Edit distance from `g1` to `g2`, giving up after `timeout`
pub fn graph_edit_distance(
    g1: &Graph,
    g2: &Graph,
    node_match: &dyn NodeMatch,
    edge_match: &dyn EdgeMatch,
    timeout: Duration,
) -> EditDistance {
    let started = Instant::now();
    let deadline = started.checked_add(timeout);
    let mut search = Search::new(g1, g2, node_match, edge_match, deadline);
    search.expand(0, 0);

    let result = match (search.timed_out, search.best) {
        (false, Some(cost)) => EditDistance::Exact(cost as f64),
        (true, Some(cost)) => EditDistance::BestEffort(cost as f64),
        (_, None) => EditDistance::Unknown,
    };

    if search.timed_out {
        warn!(
            timeout_ms = timeout.as_millis() as u64,
            nodes = g1.node_count() + g2.node_count(),
            ?result,
            "Graph edit distance timed out"
        );
    } else {
        debug!(
            expansions = search.expansions,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ?result,
            "Graph edit distance finished"
        );
    }
    result
}

type NodePair = (usize, usize);

struct Search<'a> {
    g1: &'a Graph,
    g2: &'a Graph,
    edge_match: &'a dyn EdgeMatch,
    deadline: Option<Instant>,

    /// `node_cost[i][j]`: substitution cost of g1 node `i` by g2 node `j`
    node_cost: Vec<Vec<u64>>,
    /// Edge positions grouped by ordered endpoint pair
    groups1: FxHashMap<NodePair, Vec<usize>>,
    groups2: FxHashMap<NodePair, Vec<usize>>,
    pair_costs: FxHashMap<(NodePair, NodePair), u64>,

    /// Target of each assigned g1 node (`None` = deleted)
    mapping: Vec<Option<usize>>,
    used: Vec<bool>,
    used_count: usize,

    best: Option<u64>,
    timed_out: bool,
    expansions: u64,
}

impl<'a> Search<'a> {
    fn new(
        g1: &'a Graph,
        g2: &'a Graph,
        node_match: &dyn NodeMatch,
        edge_match: &'a dyn EdgeMatch,
        deadline: Option<Instant>,
    ) -> Self {
        let node_cost = g1
            .nodes()
            .iter()
            .map(|a| {
                g2.nodes()
                    .iter()
                    .map(|b| u64::from(!node_match.matches(a, b)))
                    .collect()
            })
            .collect();

        Self {
            g1,
            g2,
            edge_match,
            deadline,
            node_cost,
            groups1: group_edges(g1),
            groups2: group_edges(g2),
            pair_costs: FxHashMap::default(),
            mapping: Vec::with_capacity(g1.node_count()),
            used: vec![false; g2.node_count()],
            used_count: 0,
            best: None,
            timed_out: false,
            expansions: 0,
        }
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Extend a partial mapping of the first `depth` g1 nodes costing `cost`
    fn expand(&mut self, depth: usize, cost: u64) {
        if self.timed_out {
            return;
        }

        if depth == self.g1.node_count() {
            let total = cost + self.completion_cost();
            if self.best.map_or(true, |best| total < best) {
                self.best = Some(total);
            }
            return;
        }

        if self.deadline_passed() {
            self.timed_out = true;
            return;
        }
        self.expansions += 1;

        let targets: Vec<Option<usize>> = (0..self.g2.node_count())
            .filter(|&j| !self.used[j])
            .map(Some)
            .chain(std::iter::once(None))
            .collect();
        let mut children = Vec::with_capacity(targets.len());
        for target in targets {
            children.push((self.step_cost(depth, target), target));
        }
        children.sort_by_key(|(step, _)| *step);

        for (step, target) in children {
            let next_cost = cost + step;
            let remaining_g1 = self.g1.node_count() - depth - 1;
            let remaining_g2 = self.g2.node_count() - self.used_count - usize::from(target.is_some());
            let bound = next_cost + remaining_g1.abs_diff(remaining_g2) as u64;
            if self.best.is_some_and(|best| bound >= best) {
                continue;
            }

            self.mapping.push(target);
            if let Some(j) = target {
                self.used[j] = true;
                self.used_count += 1;
            }

            self.expand(depth + 1, next_cost);

            if let Some(j) = target {
                self.used[j] = false;
                self.used_count -= 1;
            }
            self.mapping.pop();

            if self.timed_out {
                return;
            }
        }
    }

    /// Cost of mapping g1 node `i` to `target`, including edges to the
    /// already mapped nodes `0..i` and self-loops
    fn step_cost(&mut self, i: usize, target: Option<usize>) -> u64 {
        let mut cost = match target {
            Some(j) => self.node_cost[i][j],
            None => 1,
        };

        cost += self.pair_cost((i, i), target.map(|j| (j, j)));
        for k in 0..i {
            let mapped = self.mapping[k];
            cost += self.pair_cost((i, k), target.zip(mapped));
            cost += self.pair_cost((k, i), mapped.zip(target));
        }
        cost
    }

    /// Edge cost between the g1 edges on `p1` and the g2 edges on `p2`
    /// (`None` when an endpoint was deleted)
    fn pair_cost(&mut self, p1: NodePair, p2: Option<NodePair>) -> u64 {
        let k1 = self.groups1.get(&p1).map_or(0, Vec::len) as u64;
        let Some(p2) = p2 else {
            return k1;
        };
        let k2 = self.groups2.get(&p2).map_or(0, Vec::len) as u64;
        if k1 == 0 || k2 == 0 {
            return k1 + k2;
        }

        if let Some(&cached) = self.pair_costs.get(&(p1, p2)) {
            return cached;
        }
        let cost = k1.max(k2) - self.max_edge_pairing(p1, p2);
        self.pair_costs.insert((p1, p2), cost);
        cost
    }

    /// Largest number of g1/g2 edge pairs accepted by the edge matcher
    fn max_edge_pairing(&self, p1: NodePair, p2: NodePair) -> u64 {
        let (Some(e1), Some(e2)) = (self.groups1.get(&p1), self.groups2.get(&p2)) else {
            return 0;
        };

        let n = e1.len().max(e2.len());
        let mut weights = Matrix::new(n, n, 0_i64);
        let mut any = false;
        for (row, &a) in e1.iter().enumerate() {
            for (col, &b) in e2.iter().enumerate() {
                let (Some(ra), Some(rb)) = (edge_ref(self.g1, a), edge_ref(self.g2, b)) else {
                    continue;
                };
                if self.edge_match.matches(ra, rb) {
                    weights[(row, col)] = 1;
                    any = true;
                }
            }
        }
        if !any {
            return 0;
        }

        let (total, _) = kuhn_munkres(&weights);
        total.max(0) as u64
    }

    /// Insert the g2 nodes no g1 node was mapped to, with their edges
    fn completion_cost(&self) -> u64 {
        let inserted_nodes = (self.g2.node_count() - self.used_count) as u64;
        let inserted_edges = self
            .g2
            .edges()
            .iter()
            .filter(|e| !self.used[e.source.index()] || !self.used[e.target.index()])
            .count() as u64;
        inserted_nodes + inserted_edges
    }
}

fn group_edges(graph: &Graph) -> FxHashMap<NodePair, Vec<usize>> {
    let mut groups: FxHashMap<NodePair, Vec<usize>> = FxHashMap::default();
    for (position, edge) in graph.edges().iter().enumerate() {
        groups
            .entry((edge.source.index(), edge.target.index()))
            .or_default()
            .push(position);
    }
    groups
}

fn edge_ref(graph: &Graph, position: usize) -> Option<EdgeRef<'_>> {
    graph.edge_ref(graph.edges().get(position)?)
}
