//! Stage 6 — Position (§4.6 of SPEC_FULL.md).
//!
//! Coordinate assignment is the other external collaborator per §1/§6. The
//! default `SweepPositioner` is intentionally simple: cumulative
//! width-plus-separation within a rank, `rank_sep` between ranks, honoring
//! `rank_dir`. It is not a Brandes-Köpf alignment implementation — that's
//! exactly the kind of fancier positioner callers are expected to swap in
//! via the `Positioner` trait.

use crate::config::{Config, RankDir};
use crate::graph::{NodeId, Working};

pub trait Positioner<N, E> {
    fn position(&self, working: &mut Working<N, E>, layers: &[Vec<NodeId>], config: &Config);
}

pub struct SweepPositioner;

impl<N, E> Positioner<N, E> for SweepPositioner {
    fn position(&self, working: &mut Working<N, E>, layers: &[Vec<NodeId>], config: &Config) {
        for (rank, layer) in layers.iter().enumerate() {
            let mut cursor = 0.0f64;
            let along_rank = rank as f64 * config.rank_sep;

            for &node in layer {
                let width = working.graph[node].width;
                let height = working.graph[node].height;
                let sep = if working.graph[node].dummy {
                    config.edge_sep
                } else {
                    config.node_sep
                };

                let center_offset = cursor + width / 2.0;
                let (x, y) = match config.rank_dir {
                    RankDir::TopToBottom => (center_offset, along_rank),
                    RankDir::BottomToTop => (center_offset, -along_rank),
                    RankDir::LeftToRight => (along_rank, center_offset),
                    RankDir::RightToLeft => (-along_rank, center_offset),
                };

                let node_weight = &mut working.graph[node];
                node_weight.x = x;
                node_weight.y = y;
                node_weight.ul = -width / 2.0 - config.universal_sep;
                node_weight.ur = width / 2.0 + config.universal_sep;
                node_weight.dl = -height / 2.0 - config.universal_sep;
                node_weight.dr = height / 2.0 + config.universal_sep;

                cursor += width + sep;
            }
        }
    }
}
