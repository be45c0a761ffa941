//! Builder-time resolution of rank-preference hints into concrete
//! [`PrefRank`] values.
//!
//! Grounded on the teacher crate's `rank_set::RankSets`: the teacher lets
//! callers say "these two nodes should share a rank" without knowing a
//! group id up front, using a union-find-by-overwrite over synthetic rank
//! indices. We keep that ergonomic (`Pipeline::set_rank_same`) but resolve
//! it down to the richer `PrefRank::Fixed/Min/Max` enum that the rest of
//! the rank subsystem (§4.3.1) understands, rather than leaving "min"/"max"
//! as magic sentinel indices the way the teacher does (`RankIdx::MAX`).

use std::collections::HashMap;

use crate::graph::{NodeId, PrefRank};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    Same(u64),
    Min,
    Max,
}

/// Accumulates rank-preference hints during graph construction; call
/// [`RankGroups::resolve`] once, when `Pipeline::run` starts, to produce the
/// `PrefRank` each node should carry.
#[derive(Debug, Default)]
pub struct RankGroups {
    hints: HashMap<NodeId, GroupKind>,
    next_group: u64,
}

impl RankGroups {
    pub fn new() -> Self {
        Self {
            hints: HashMap::new(),
            next_group: 0,
        }
    }

    pub fn set_min(&mut self, node: NodeId) {
        assert!(
            !matches!(self.hints.get(&node), Some(GroupKind::Max)),
            "node already hinted as rank-max"
        );
        self.hints.insert(node, GroupKind::Min);
    }

    pub fn set_max(&mut self, node: NodeId) {
        assert!(
            !matches!(self.hints.get(&node), Some(GroupKind::Min)),
            "node already hinted as rank-min"
        );
        self.hints.insert(node, GroupKind::Max);
    }

    pub fn set_fixed(&mut self, node: NodeId, group: u64) {
        self.hints.insert(node, GroupKind::Same(group));
    }

    /// Merge two nodes into the same rank group, creating a fresh group id
    /// if neither already has one. Panics if one side is `min` and the
    /// other `max` (unresolvable, mirrors the teacher's panic in
    /// `RankSets::set_rank`).
    pub fn set_same(&mut self, a: NodeId, b: NodeId) {
        match (self.hints.get(&a).copied(), self.hints.get(&b).copied()) {
            (Some(GroupKind::Min), Some(GroupKind::Max))
            | (Some(GroupKind::Max), Some(GroupKind::Min)) => {
                panic!("attempted to merge rank-min and rank-max nodes")
            }
            (Some(ka), Some(kb)) => {
                // Prefer keeping Min/Max sticky over a plain Same group.
                let winner = match (ka, kb) {
                    (GroupKind::Min, _) | (_, GroupKind::Min) => GroupKind::Min,
                    (GroupKind::Max, _) | (_, GroupKind::Max) => GroupKind::Max,
                    (same, _) => same,
                };
                self.merge_into(ka, winner);
                self.merge_into(kb, winner);
            }
            (Some(k), None) => {
                self.hints.insert(b, k);
            }
            (None, Some(k)) => {
                self.hints.insert(a, k);
            }
            (None, None) => {
                let g = self.fresh_group();
                self.hints.insert(a, GroupKind::Same(g));
                self.hints.insert(b, GroupKind::Same(g));
            }
        }
    }

    fn merge_into(&mut self, from: GroupKind, to: GroupKind) {
        if from == to {
            return;
        }
        for kind in self.hints.values_mut() {
            if *kind == from {
                *kind = to;
            }
        }
    }

    fn fresh_group(&mut self) -> u64 {
        let g = self.next_group;
        self.next_group += 1;
        g
    }

    /// Produce the final `PrefRank` for every hinted node.
    pub fn resolve(&self) -> HashMap<NodeId, PrefRank> {
        self.hints
            .iter()
            .map(|(&node, &kind)| {
                let pref = match kind {
                    GroupKind::Min => PrefRank::Min,
                    GroupKind::Max => PrefRank::Max,
                    GroupKind::Same(g) => PrefRank::Fixed(g as i64),
                };
                (node, pref)
            })
            .collect()
    }
}
