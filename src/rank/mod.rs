//! Stage 3 — Rank assignment (§4.3).
//!
//! Orchestrates the three phases: constraint reduction into compound nodes
//! (`reduction`), an initial feasible ranking (`feasible`), and an optional
//! network-simplex refinement (`simplex`). Both ranking phases operate on
//! the compound (post-reduction) problem; afterwards each compound's rank
//! is broadcast back to every member node (`expand_ranks`).

mod feasible;
mod groups;
mod problem;
mod reduction;
mod simplex;

pub use groups::RankGroups;

use log::debug;

use crate::config::Config;
use crate::error::Error;
use crate::graph::Working;

use problem::RankProblem;

/// Partition a problem's nodes into weakly-connected components via
/// union-find, returning, for each component, the local `RankProblem` and a
/// `Vec<usize>` mapping local index -> original group index.
fn split_components(problem: &RankProblem) -> Vec<(RankProblem, Vec<usize>)> {
    let n = problem.node_count;
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], x: usize) -> usize {
        if parent[x] != x {
            parent[x] = find(parent, parent[x]);
        }
        parent[x]
    }

    for e in &problem.edges {
        let ra = find(&mut parent, e.src);
        let rb = find(&mut parent, e.dst);
        if ra != rb {
            parent[ra] = rb;
        }
    }

    let mut root_to_local: std::collections::HashMap<usize, usize> = std::collections::HashMap::new();
    let mut components: Vec<(RankProblem, Vec<usize>)> = Vec::new();
    for v in 0..n {
        let root = find(&mut parent, v);
        let comp_idx = *root_to_local.entry(root).or_insert_with(|| {
            components.push((RankProblem::new(0), Vec::new()));
            components.len() - 1
        });
        let (comp_problem, mapping) = &mut components[comp_idx];
        comp_problem.node_count += 1;
        mapping.push(v);
    }

    // local index of each original node within its component.
    let mut local_index = vec![0usize; n];
    for (_, mapping) in &components {
        for (local, &orig) in mapping.iter().enumerate() {
            local_index[orig] = local;
        }
    }
    for e in &problem.edges {
        let root = find(&mut parent, e.src);
        let comp_idx = root_to_local[&root];
        let (comp_problem, _) = &mut components[comp_idx];
        comp_problem.add_edge(local_index[e.src], local_index[e.dst], e.min_len, e.weight);
    }

    components
}

/// Run the full §4.3 rank-assignment subsystem, writing `rank` onto every
/// node in `working`.
pub fn assign_ranks<N, E>(
    working: &mut Working<N, E>,
    hints: &std::collections::HashMap<crate::graph::NodeId, crate::graph::PrefRank>,
    config: &Config,
) -> Result<(), Error> {
    for (&node, &pref) in hints {
        working.graph[node].pref_rank = Some(pref);
    }

    let reduction::Reduction { problem, members } = reduction::reduce(working)?;
    debug!(
        target: "sugiyama::pipeline",
        "rank: reduced {} nodes into {} groups",
        working.graph.node_count(),
        members.len()
    );

    let mut group_rank = vec![0i64; members.len()];
    for (comp_problem, local_to_group) in split_components(&problem) {
        let feasible = feasible::initial_ranking(&comp_problem)?;
        let refined = if config.use_simplex {
            simplex::refine(&comp_problem, feasible)?
        } else {
            feasible
        };
        let min_rank = refined.iter().copied().min().unwrap_or(0);
        for (local, &group) in local_to_group.iter().enumerate() {
            group_rank[group] = refined[local] - min_rank;
        }
    }

    for (group, members_of_group) in members.into_iter().enumerate() {
        for node in members_of_group {
            working.graph[node].rank = Some(group_rank[group]);
        }
    }

    Ok(())
}
