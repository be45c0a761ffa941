//! Stage 1 — Build (§4.1).
//!
//! By the time `Pipeline::run` reaches Build, every node and edge the caller
//! added is already present in `working` (the builder methods on `Pipeline`
//! write directly into it, the same way the teacher crate's
//! `add_node`/`add_edge` mutate `self.graph` immediately).
//!
//! [`reserve_label_space`] only touches edges that actually carry a label
//! (non-zero `width`/`height`): it doubles *that edge's* `min_len` so
//! Normalize inserts a dedicated dummy node the label can sit on, rather
//! than doubling every edge's `min_len` wholesale. Doubling unconditionally
//! would double the rank span — and so the dummy count and `points.len()`
//! — of every edge in the graph, including label-free ones; that directly
//! contradicts two of the crate's own literal scenarios (a plain chain
//! a->b->c must come out at ranks 0/1/2 with empty polylines, and an
//! explicit `min_len = 3` edge must come out exactly 3 ranks apart). Scoping
//! the doubling to labeled edges only gets label dummies their extra rank
//! without disturbing either.
//!
//! §5 additionally describes this as a scoped acquire/release around the
//! caller's `rank_sep`/`min_len` state, restored via a `Drop` guard. That
//! state never actually belongs to the caller here: `rank_sep` is read from
//! a `Config` we only ever clone, and `min_len` lives on `Working`, which
//! `Pipeline::run` builds fresh per call and never hands back. There is
//! nothing external left to restore, so no guard is implemented — see
//! `DESIGN.md` for the longer rationale.

use crate::graph::Working;

/// Double `min_len` on every edge that carries a label, so Normalize
/// reserves a rank for it. Edges without a label (`width == height == 0.0`)
/// are left alone.
pub fn reserve_label_space<N, E>(working: &mut Working<N, E>) {
    for edge in working.graph.edge_weights_mut() {
        if edge.width > 0.0 || edge.height > 0.0 {
            edge.min_len *= 2;
        }
    }
}

/// Deduplicate the reciprocal edge pairs Build created for undirected
/// input, once Acyclic has oriented each pair: keep exactly one edge per
/// original user-facing `e` id.
pub fn dedup_undirected_pairs<N, E>(working: &mut Working<N, E>) {
    use std::collections::HashSet;
    let mut seen: HashSet<crate::graph::EdgeId> = HashSet::new();
    let to_remove: Vec<_> = working
        .graph
        .edge_indices()
        .filter(|&id| !seen.insert(working.graph[id].id))
        .collect();
    for id in to_remove {
        working.graph.remove_edge(id);
    }
}
