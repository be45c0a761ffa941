//! Stage 5 — Order (§4.5 of SPEC_FULL.md).
//!
//! Crossing reduction is an external collaborator per §1/§6: the core only
//! states the interface it needs (a within-rank ordering of each layer) and
//! ships one reasonable default, `MedianOrderer`, grounded on the
//! barycenter/median sweep pattern used across the pack's dagre-style
//! layout files (e.g. the iterative forward/backward sweep in
//! `TangleGuard-dagre-rs`).

use std::collections::HashMap;

use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::config::Config;
use crate::graph::{NodeId, Working};

/// Within-rank ordering, assigned after Normalize so every node involved
/// (real or dummy) spans exactly one rank.
pub trait Orderer<N, E> {
    fn order(
        &self,
        working: &Working<N, E>,
        layers: Vec<Vec<NodeId>>,
        config: &Config,
    ) -> Vec<Vec<NodeId>>;
}

/// Median-heuristic ordering with adjacent-swap transposition, alternating
/// forward (by predecessors) and backward (by successors) sweeps for up to
/// `config.order_max_sweeps` rounds or until a round makes no change.
pub struct MedianOrderer;

impl<N, E> Orderer<N, E> for MedianOrderer {
    fn order(
        &self,
        working: &Working<N, E>,
        mut layers: Vec<Vec<NodeId>>,
        config: &Config,
    ) -> Vec<Vec<NodeId>> {
        if layers.len() < 2 {
            return layers;
        }
        for _ in 0..config.order_max_sweeps {
            let mut changed = false;
            for i in 1..layers.len() {
                changed |= sweep(working, &mut layers, i, Direction::Incoming);
            }
            for i in (0..layers.len() - 1).rev() {
                changed |= sweep(working, &mut layers, i, Direction::Outgoing);
            }
            if !changed {
                break;
            }
        }
        layers
    }
}

fn sweep<N, E>(
    working: &Working<N, E>,
    layers: &mut [Vec<NodeId>],
    layer_idx: usize,
    adjacent_dir: Direction,
) -> bool {
    let adjacent_layer_idx = match adjacent_dir {
        Direction::Incoming => layer_idx - 1,
        Direction::Outgoing => layer_idx + 1,
    };
    let positions: HashMap<NodeId, usize> = layers[adjacent_layer_idx]
        .iter()
        .enumerate()
        .map(|(pos, &n)| (n, pos))
        .collect();

    let mut scored: Vec<(NodeId, f64, usize)> = layers[layer_idx]
        .iter()
        .enumerate()
        .map(|(original_pos, &node)| {
            let mut neighbor_positions: Vec<usize> = working
                .graph
                .edges_directed(node, adjacent_dir)
                .filter_map(|e| {
                    let other = if adjacent_dir == Direction::Incoming {
                        e.source()
                    } else {
                        e.target()
                    };
                    positions.get(&other).copied()
                })
                .collect();
            neighbor_positions.sort_unstable();
            let median = if neighbor_positions.is_empty() {
                original_pos as f64
            } else {
                let mid = neighbor_positions.len() / 2;
                if neighbor_positions.len() % 2 == 1 {
                    neighbor_positions[mid] as f64
                } else {
                    (neighbor_positions[mid - 1] + neighbor_positions[mid]) as f64 / 2.0
                }
            };
            (node, median, original_pos)
        })
        .collect();

    scored.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.2.cmp(&b.2))
    });

    let new_order: Vec<NodeId> = scored.into_iter().map(|(n, _, _)| n).collect();
    let changed = new_order != layers[layer_idx];
    layers[layer_idx] = new_order;
    changed
}

