//! Transition graph connectivity: strong connectivity and period.
//!
//! An edge `i -> j` exists iff `|T[i,j]| > tol`. The graph is strongly
//! connected iff Tarjan's algorithm finds a single component. The period of a
//! strongly connected graph is the gcd of `level[u] + 1 - level[v]` over all
//! edges, where `level` is the BFS distance from node 0.

use std::collections::VecDeque;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

/// Directed graph of the non-negligible transitions of a matrix.
#[derive(Debug, Clone)]
pub(crate) struct TransitionGraph {
    graph: DiGraph<(), ()>,
}

impl TransitionGraph {
    /// Builds a graph on `n` nodes from `(from, to)` edges.
    pub(crate) fn from_edges(n: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut graph = DiGraph::with_capacity(n, 0);
        for _ in 0..n {
            graph.add_node(());
        }
        for (from, to) in edges {
            graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
        }
        Self { graph }
    }

    /// Returns `true` if every node reaches every other node.
    pub(crate) fn is_strongly_connected(&self) -> bool {
        self.graph.node_count() > 0 && tarjan_scc(&self.graph).len() == 1
    }

    /// Period of the graph, assuming strong connectivity.
    ///
    /// Returns `None` when the graph has no cycle at all.
    pub(crate) fn period(&self) -> Option<usize> {
        let n = self.graph.node_count();
        if n == 0 {
            return None;
        }
        let mut level: Vec<Option<usize>> = vec![None; n];
        let mut queue = VecDeque::from([NodeIndex::new(0)]);
        level[0] = Some(0);
        while let Some(u) = queue.pop_front() {
            let lu = level[u.index()].unwrap_or(0);
            for v in self.graph.neighbors(u) {
                if level[v.index()].is_none() {
                    level[v.index()] = Some(lu + 1);
                    queue.push_back(v);
                }
            }
        }

        let mut g = 0usize;
        for edge in self.graph.raw_edges() {
            let (Some(lu), Some(lv)) = (level[edge.source().index()], level[edge.target().index()])
            else {
                continue;
            };
            g = gcd(g, (lu + 1).abs_diff(lv));
        }
        (g > 0).then_some(g)
    }

    /// Strongly connected with period one.
    pub(crate) fn is_ergodic(&self) -> bool {
        self.is_strongly_connected() && self.period() == Some(1)
    }

    /// Number of closed classes: strongly connected components with no edge
    /// leaving them. A chain has a unique stationary distribution iff this is 1.
    pub(crate) fn closed_class_count(&self) -> usize {
        let components = tarjan_scc(&self.graph);
        let mut component_of = vec![0; self.graph.node_count()];
        for (c, nodes) in components.iter().enumerate() {
            for node in nodes {
                component_of[node.index()] = c;
            }
        }
        let mut open = vec![false; components.len()];
        for edge in self.graph.raw_edges() {
            let from = component_of[edge.source().index()];
            if from != component_of[edge.target().index()] {
                open[from] = true;
            }
        }
        open.iter().filter(|&&o| !o).count()
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
