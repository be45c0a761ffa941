//! Flat, array-indexed representation of a ranking problem.
//!
//! The feasible-ranking and network-simplex algorithms (§4.3.2, §4.3.3) only
//! ever need "how many nodes, and what are the weighted min-len edges
//! between them" — they don't touch node/edge *payloads* at all. Rather than
//! running them directly over `petgraph::Graph<NodeWeight<N,E>, ..>` (which
//! would drag the generic payload types through code that never reads them),
//! we project down to this flat struct first and broadcast the resulting
//! ranks back onto the working graph afterwards (`expand_ranks`).

/// One weighted, min-len-constrained edge between two problem-local indices.
#[derive(Debug, Clone, Copy)]
pub struct RankEdge {
    pub src: usize,
    pub dst: usize,
    pub min_len: i64,
    pub weight: f64,
}

/// A self-contained instance of the rank-assignment problem: minimize
/// `sum(weight * (rank(dst) - rank(src)))` subject to
/// `rank(dst) - rank(src) >= min_len` for every edge.
#[derive(Debug, Clone)]
pub struct RankProblem {
    pub node_count: usize,
    pub edges: Vec<RankEdge>,
}

impl RankProblem {
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            edges: Vec::new(),
        }
    }

    pub fn add_edge(&mut self, src: usize, dst: usize, min_len: i64, weight: f64) {
        debug_assert_ne!(src, dst, "rank problem edges must not be self-loops");
        self.edges.push(RankEdge {
            src,
            dst,
            min_len,
            weight,
        });
    }

    pub fn out_edges(&self, node: usize) -> impl Iterator<Item = &RankEdge> + '_ {
        self.edges.iter().filter(move |e| e.src == node)
    }

    pub fn in_edges(&self, node: usize) -> impl Iterator<Item = &RankEdge> + '_ {
        self.edges.iter().filter(move |e| e.dst == node)
    }
}
