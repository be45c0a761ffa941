//! Stage 4 — Normalize (§4.4): insert dummy nodes so every edge spans
//! exactly one rank.

use crate::graph::{ChainIndex, EdgeRef, NodeWeight, Working};

pub fn normalize<N, E>(working: &mut Working<N, E>)
where
    E: Clone,
{
    let long_edges: Vec<_> = working
        .graph
        .edge_indices()
        .filter(|&id| {
            let (s, t) = working.graph.edge_endpoints(id).unwrap();
            let rs = working.graph[s].rank.expect("rank must be assigned before normalize");
            let rt = working.graph[t].rank.expect("rank must be assigned before normalize");
            rt - rs > 1
        })
        .collect();

    for id in long_edges {
        let (source, target) = working.graph.edge_endpoints(id).unwrap();
        let rank_s = working.graph[source].rank.unwrap();
        let rank_t = working.graph[target].rank.unwrap();
        let edge = working.graph.remove_edge(id).unwrap();
        let span = (rank_t - rank_s) as usize;

        let edge_ref = EdgeRef {
            id: edge.id,
            source,
            target,
            attrs: edge.attrs(),
        };

        let mut prev = source;
        let mut chain = Vec::with_capacity(span - 1);
        for step in 1..span {
            let mut dummy = NodeWeight::dummy(edge.width, edge.height, edge_ref.clone());
            dummy.rank = Some(rank_s + step as i64);
            let node = working.graph.add_node(dummy);
            working.graph.add_edge(prev, node, blank_edge(&edge));
            chain.push(node);
            prev = node;
        }
        working.graph.add_edge(prev, target, blank_edge(&edge));

        // A chain of length 1 (rank span 2) has one dummy that is both
        // endpoints of the polyline; tag it `Both` rather than tagging
        // `First` then overwriting with `Last`.
        match chain.as_slice() {
            [] => {}
            [only] => working.graph[*only].chain_index = Some(ChainIndex::Both),
            [first, .., last] => {
                working.graph[*first].chain_index = Some(ChainIndex::First);
                working.graph[*last].chain_index = Some(ChainIndex::Last);
            }
        }
    }
}

/// Interior chain edges carry no user data or label geometry of their own —
/// that's all recorded on the dummy nodes' `edge_ref` — so they're built
/// from a skeleton rather than cloning the original edge wholesale.
fn blank_edge<E>(original: &crate::graph::EdgeWeight<E>) -> crate::graph::EdgeWeight<E> {
    crate::graph::EdgeWeight {
        id: original.id,
        data: None,
        min_len: 1,
        weight: original.weight,
        width: 0.0,
        height: 0.0,
        points: Vec::new(),
        reversed: original.reversed,
    }
}
