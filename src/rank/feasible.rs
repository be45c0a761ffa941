//! Initial feasible ranking (§4.3.2): Kahn-style topological assignment
//! over a decrease-key priority queue, keyed by remaining in-degree.
//!
//! This phase only has to satisfy `min_len`; it doesn't read edge `weight`
//! because feasibility doesn't depend on it — Gansner's objective
//! (minimizing Σ weight(u,v)·(rank(v)-rank(u))) is optimized entirely by the
//! `simplex` refinement that follows, via weighted cut values. When
//! `Config::use_simplex` is `false` this feasible ranking is the final
//! answer and edge weight has no effect on it, which matches the documented
//! meaning of that knob (skip the optimization pass, not just a speed-up of
//! it).

use std::cmp::Reverse;

use log::error;
use priority_queue::PriorityQueue;

use crate::error::{Error, InvariantViolationKind};

use super::problem::RankProblem;

/// Produce a feasible (not necessarily tight) ranking: every edge satisfies
/// `rank(dst) - rank(src) >= min_len`.
pub fn initial_ranking(problem: &RankProblem) -> Result<Vec<i64>, Error> {
    let n = problem.node_count;
    let mut indegree = vec![0usize; n];
    for e in &problem.edges {
        indegree[e.dst] += 1;
    }

    // out_adjacency[v] = outgoing (dst, min_len) pairs, built once so the
    // relax step below doesn't re-scan the whole edge list per node.
    let mut out_adjacency: Vec<Vec<(usize, i64)>> = vec![Vec::new(); n];
    for e in &problem.edges {
        out_adjacency[e.src].push((e.dst, e.min_len));
    }

    let mut queue = PriorityQueue::new();
    for v in 0..n {
        queue.push(v, Reverse(indegree[v]));
    }

    let mut candidate = vec![0i64; n];
    let mut rank = vec![0i64; n];
    let mut resolved = 0usize;

    while let Some((v, Reverse(d))) = queue.pop() {
        if d > 0 {
            error!(
                target: "sugiyama::pipeline",
                "feasible: node {v} still has {d} unresolved predecessors after queue drain"
            );
            return Err(Error::InvariantViolation(InvariantViolationKind::NotAcyclic));
        }
        rank[v] = candidate[v];
        resolved += 1;
        for &(w, min_len) in &out_adjacency[v] {
            let proposed = rank[v] + min_len;
            if proposed > candidate[w] {
                candidate[w] = proposed;
            }
            indegree[w] -= 1;
            queue.change_priority(&w, Reverse(indegree[w]));
        }
    }
    debug_assert_eq!(resolved, n, "every node must be ranked exactly once");

    Ok(rank)
}
