//! Stages 2 (Acyclic), 8 (Fixup) and 9 (Unacyclic): §4.2, §4.8, §4.9.
//!
//! Grounded directly on the teacher crate's `prepare_rank_assignment`: pull
//! self-loops aside, then use `petgraph::algo::greedy_feedback_arc_set`
//! (Eades-Lin-Smyth) to find a feedback arc set and reverse it. The
//! contract is correctness (no directed cycles survive), not optimality of
//! the feedback set.

use petgraph::visit::EdgeRef;

use crate::graph::{SelfLoop, Working};

/// Make `working` acyclic by reversing a greedy feedback arc set, pulling
/// self-loops aside into `working.self_loops` for later re-attachment at
/// Emit (§4.10).
pub fn break_cycles<N, E>(working: &mut Working<N, E>) {
    let self_loop_edges: Vec<_> = working
        .graph
        .edge_references()
        .filter(|e| e.source() == e.target())
        .map(|e| e.id())
        .collect();
    for id in self_loop_edges {
        let node = working.graph.edge_endpoints(id).unwrap().0;
        let weight = working.graph.remove_edge(id).unwrap();
        working.self_loops.push(SelfLoop { node, weight });
    }

    let feedback: Vec<_> = petgraph::algo::greedy_feedback_arc_set(&working.graph)
        .map(|e| e.id())
        .collect();
    for id in feedback {
        let reversed = working.reverse_edge(id);
        working.graph[reversed].reversed = true;
    }

    debug_assert!(
        !petgraph::algo::is_cyclic_directed(&working.graph),
        "greedy_feedback_arc_set must leave the graph acyclic"
    );
}

/// Stage 8 — reverse the polyline of every edge marked `reversed`, because
/// during layout it was oriented target->source so its dummy chain
/// coordinates were recorded back to front.
pub fn fixup_polylines<N, E>(working: &mut Working<N, E>) {
    for edge in working.graph.edge_weights_mut() {
        if edge.reversed {
            edge.points.reverse();
        }
    }
}

/// Stage 9 — restore every `reversed` edge to its original orientation and
/// clear the flag.
pub fn restore_orientation<N, E>(working: &mut Working<N, E>) {
    let reversed_edges: Vec<_> = working
        .graph
        .edge_indices()
        .filter(|&id| working.graph[id].reversed)
        .collect();
    for id in reversed_edges {
        let restored = working.reverse_edge(id);
        working.graph[restored].reversed = false;
    }
}
