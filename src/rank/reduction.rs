//! Rank-constraint reduction (§4.3.1): collapse every node sharing a
//! `pref_rank` into one compound node, redirect incident edges so `min`
//! compounds only ever have outgoing edges and `max` compounds only ever
//! have incoming edges, then re-break any cycles the redirection
//! introduced.
//!
//! Grounded on the teacher crate's `prepare_rank_assignment`/`RankSets`:
//! the same "ensure all edges go out of min rank and into max rank, then
//! make acyclic again" shape, generalized from the teacher's anonymous
//! rank-index grouping to the richer `PrefRank::Fixed/Min/Max` model and
//! wired all the way through to produce a solvable [`RankProblem`] instead
//! of stopping at a `TODO`.

use std::collections::HashMap;

use petgraph::graph::{Graph, NodeIndex};
use petgraph::Directed;

use crate::error::Error;
use crate::graph::{NodeId, PrefRank, Working};

use super::problem::RankProblem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GroupKey {
    Fixed(i64),
    Min,
    Max,
    Singleton(NodeId),
}

/// The reduced problem plus, for each group index, the original node ids
/// that were collapsed into it (so ranks can be broadcast back).
pub struct Reduction {
    pub problem: RankProblem,
    pub members: Vec<Vec<NodeId>>,
}

pub fn reduce<N, E>(working: &Working<N, E>) -> Result<Reduction, Error> {
    let mut group_of: HashMap<GroupKey, usize> = HashMap::new();
    let mut members: Vec<Vec<NodeId>> = Vec::new();
    let mut node_group: HashMap<NodeId, usize> = HashMap::new();

    for node in working.graph.node_indices() {
        let key = match working.graph[node].pref_rank {
            Some(PrefRank::Fixed(v)) => GroupKey::Fixed(v),
            Some(PrefRank::Min) => GroupKey::Min,
            Some(PrefRank::Max) => GroupKey::Max,
            None => GroupKey::Singleton(node),
        };
        let idx = *group_of.entry(key).or_insert_with(|| {
            members.push(Vec::new());
            members.len() - 1
        });
        members[idx].push(node);
        node_group.insert(node, idx);
    }

    let min_group = group_of.get(&GroupKey::Min).copied();
    let max_group = group_of.get(&GroupKey::Max).copied();

    let mut problem = RankProblem::new(members.len());
    for edge in working.graph.edge_indices() {
        let (src, dst) = working.graph.edge_endpoints(edge).unwrap();
        let sg = node_group[&src];
        let dg = node_group[&dst];
        let w = &working.graph[edge];

        let (eff_src, eff_dst) = if Some(dg) == min_group {
            (dg, sg) // in-edge of a `min` member becomes an out-edge of `min`.
        } else if Some(sg) == max_group {
            (dg, sg) // out-edge of a `max` member becomes an in-edge of `max`.
        } else {
            (sg, dg)
        };
        if eff_src == eff_dst {
            continue;
        }
        problem.add_edge(eff_src, eff_dst, w.min_len as i64, w.weight);
    }

    if let Some(min_g) = min_group {
        for g in 0..members.len() {
            if g != min_g {
                problem.add_edge(min_g, g, 0, 0.0);
            }
        }
    }
    if let Some(max_g) = max_group {
        for g in 0..members.len() {
            if g != max_g {
                problem.add_edge(g, max_g, 0, 0.0);
            }
        }
    }

    break_reduced_cycles(&mut problem);

    Ok(Reduction { problem, members })
}

/// Re-run cycle breaking (§4.2) on the reduced graph: the redirection above
/// can introduce cycles that weren't present in the already-acyclic working
/// graph (e.g. two `Fixed` groups with edges running both ways once
/// collapsed).
fn break_reduced_cycles(problem: &mut RankProblem) {
    let mut g: Graph<(), (), Directed> = Graph::new();
    let nodes: Vec<NodeIndex> = (0..problem.node_count).map(|_| g.add_node(())).collect();
    let mut edge_for_graph_edge = Vec::with_capacity(problem.edges.len());
    for e in &problem.edges {
        edge_for_graph_edge.push(g.add_edge(nodes[e.src], nodes[e.dst], ()));
    }

    let feedback: Vec<_> = petgraph::algo::greedy_feedback_arc_set(&g)
        .map(|e| e.id())
        .collect();
    for id in feedback {
        if let Some(pos) = edge_for_graph_edge.iter().position(|&e| e == id) {
            let e = &mut problem.edges[pos];
            std::mem::swap(&mut e.src, &mut e.dst);
        }
    }
}
