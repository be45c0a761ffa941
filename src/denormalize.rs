//! Stage 7 — Denormalize (§4.7/§4.5 of the distilled spec): collapse dummy
//! chains back into the original edge's `points` polyline.

use petgraph::visit::EdgeRef as _;

use crate::graph::{ChainIndex, EdgeWeight, PointRecord, Working};

pub fn denormalize<N, E>(working: &mut Working<N, E>)
where
    E: Clone,
{
    let marked: Vec<_> = working
        .graph
        .node_indices()
        .filter(|&n| working.graph[n].chain_index.is_some())
        .collect();

    for dummy in marked {
        let node = &working.graph[dummy];
        let chain_index = node.chain_index.unwrap();
        let edge_ref = node.edge_ref.clone().expect("marked dummy carries edge_ref");
        let point = PointRecord {
            x: node.x,
            y: node.y,
            ul: node.ul,
            ur: node.ur,
            dl: node.dl,
            dr: node.dr,
        };

        let existing_edge = working
            .graph
            .edges_connecting(edge_ref.source, edge_ref.target)
            .map(|e| e.id())
            .find(|&id| working.graph[id].id == edge_ref.id);

        let edge_id = existing_edge.unwrap_or_else(|| {
            let attrs = &edge_ref.attrs;
            working.graph.add_edge(
                edge_ref.source,
                edge_ref.target,
                EdgeWeight {
                    id: edge_ref.id,
                    data: attrs.data.clone(),
                    min_len: attrs.min_len,
                    weight: attrs.weight,
                    width: attrs.width,
                    height: attrs.height,
                    points: Vec::new(),
                    reversed: attrs.reversed,
                },
            )
        });

        // `Both` (a rank-span-2 edge's single dummy) writes only index 0 —
        // the polyline for such an edge is exactly one point, not two
        // copies of the same point.
        let index = match chain_index {
            ChainIndex::First | ChainIndex::Both => 0,
            ChainIndex::Last => 1,
        };
        let points = &mut working.graph[edge_id].points;
        if points.len() <= index {
            points.resize(index + 1, point);
        } else {
            points[index] = point;
        }
    }

    // All interior (unmarked) dummy nodes, and the two marked endpoints,
    // are now obsolete: every dummy's contribution is either folded into
    // the reconstructed edge above or was only there to reserve space.
    let dummies: Vec<_> = working
        .graph
        .node_indices()
        .filter(|&n| working.graph[n].dummy)
        .collect();
    for n in dummies {
        working.graph.remove_node(n);
    }
}
