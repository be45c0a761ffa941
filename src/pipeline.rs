//! The public builder and orchestrator (§4, §6 of SPEC_FULL.md).
//!
//! `Pipeline` plays the role the teacher crate's `Gansner<NodeData>` plays:
//! callers add nodes and edges, optionally hint rank constraints, then call
//! `run` to get a laid-out [`Output`]. Unlike the teacher, `run` consumes
//! `self` and drives all ten stages (§4.1-§4.10) to completion in one pass
//! rather than mutating a long-lived graph across repeated `layout()` calls.

use std::collections::HashMap;

use log::{debug, error, trace};

use crate::config::Config;
use crate::emit::{self, Output};
use crate::error::{Error, InvalidInputKind};
use crate::graph::{EdgeId, EdgeWeight, NodeId, NodeWeight, Working};
use crate::order::{MedianOrderer, Orderer};
use crate::position::{Positioner, SweepPositioner};
use crate::rank::{self, RankGroups};
use crate::{acyclic, build, denormalize, normalize};

/// Builder for a layout problem. `N` and `E` are the caller's node and edge
/// payload types; `E` defaults to `()` for callers who only care about
/// structure, matching the teacher crate's unit-edge-data convenience.
pub struct Pipeline<N, E = ()> {
    working: Working<N, E>,
    rank_groups: RankGroups,
}

impl<N, E> Pipeline<N, E> {
    /// Start a directed layout problem.
    pub fn new() -> Self {
        Self {
            working: Working::new(true),
            rank_groups: RankGroups::new(),
        }
    }

    /// Start an undirected layout problem: Build will add a reciprocal edge
    /// for every edge the caller adds, letting Acyclic pick each pair's
    /// orientation freely (§4.1, §4.2, §9 "undirected input").
    pub fn new_undirected() -> Self {
        Self {
            working: Working::new(false),
            rank_groups: RankGroups::new(),
        }
    }

    pub fn add_node(&mut self, data: N, width: f64, height: f64) -> Result<NodeId, Error> {
        validate_dimension(width)?;
        validate_dimension(height)?;
        Ok(self.working.graph.add_node(NodeWeight::new(data, width, height)))
    }

    pub fn add_edge(&mut self, source: NodeId, target: NodeId, data: E) -> Result<EdgeId, Error> {
        self.add_edge_with_options(source, target, data, 1, 1.0, 0.0, 0.0)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_edge_with_options(
        &mut self,
        source: NodeId,
        target: NodeId,
        data: E,
        min_len: i64,
        weight: f64,
        label_width: f64,
        label_height: f64,
    ) -> Result<EdgeId, Error>
    where
        E: Clone,
    {
        if min_len < 1 {
            return Err(InvalidInputKind::NonPositiveMinLen(min_len).into());
        }
        validate_dimension(label_width)?;
        validate_dimension(label_height)?;

        let id = self.working.fresh_edge_id();
        let min_len = min_len as u32;
        self.working.graph.add_edge(
            source,
            target,
            EdgeWeight::new(id, min_len, weight, label_width, label_height, Some(data)),
        );
        if !self.working.directed {
            self.working.graph.add_edge(
                target,
                source,
                EdgeWeight::new(id, min_len, weight, label_width, label_height, None),
            );
        }
        Ok(id)
    }

    pub fn set_rank_min(&mut self, node: NodeId) {
        self.rank_groups.set_min(node);
    }

    pub fn set_rank_max(&mut self, node: NodeId) {
        self.rank_groups.set_max(node);
    }

    pub fn set_rank_same(&mut self, a: NodeId, b: NodeId) {
        self.rank_groups.set_same(a, b);
    }

    pub fn set_rank_fixed(&mut self, node: NodeId, group: u64) {
        self.rank_groups.set_fixed(node, group);
    }

    pub fn set_cluster(&mut self, node: NodeId, cluster: crate::graph::ClusterId) {
        self.working.parents.insert(node, cluster);
    }

    /// Run the pipeline with the default [`MedianOrderer`]/[`SweepPositioner`]
    /// pair (§4.5, §4.6).
    pub fn run(self, config: &Config) -> Result<Output<N, E>, Error>
    where
        E: Clone,
    {
        self.run_with(config, &MedianOrderer, &SweepPositioner)
    }

    /// Run the pipeline with caller-supplied ordering/positioning strategies,
    /// the seam §1/§6 calls out as an external collaborator.
    pub fn run_with(
        mut self,
        config: &Config,
        orderer: &dyn Orderer<N, E>,
        positioner: &dyn Positioner<N, E>,
    ) -> Result<Output<N, E>, Error>
    where
        E: Clone,
    {
        debug!(
            target: "sugiyama::pipeline",
            "pipeline start: {} nodes, {} edges",
            self.working.graph.node_count(),
            self.working.graph.edge_count()
        );

        let hints = self.rank_groups.resolve();

        // Stage 1 — Build: reserve a rank for each labeled edge's label
        // (§4.1).
        debug!(target: "sugiyama::pipeline", "build: reserving label space");
        build::reserve_label_space(&mut self.working);

        // Stage 2 — Acyclic.
        debug!(target: "sugiyama::pipeline", "acyclic: breaking cycles");
        acyclic::break_cycles(&mut self.working);

        if !self.working.directed {
            build::dedup_undirected_pairs(&mut self.working);
        }

        // Stage 3 — Rank.
        debug!(target: "sugiyama::pipeline", "rank: assigning ranks");
        if let Err(err) = rank::assign_ranks(&mut self.working, &hints, config) {
            error!(target: "sugiyama::pipeline", "rank: aborting pipeline: {err}");
            return Err(err);
        }
        if config.debug_level >= 1 {
            check_rank_invariants(&self.working);
        }
        if config.debug_level >= 2 {
            for id in self.working.graph.node_indices() {
                trace!(target: "sugiyama::pipeline", "rank: node {:?} -> rank {:?}", id, self.working.graph[id].rank);
            }
        }

        // Stage 4 — Normalize.
        debug!(target: "sugiyama::pipeline", "normalize: inserting dummy nodes");
        normalize::normalize(&mut self.working);
        trace!(
            target: "sugiyama::pipeline",
            "normalize: {} nodes after subdivision",
            self.working.graph.node_count()
        );

        // Stage 5 — Order.
        debug!(target: "sugiyama::pipeline", "order: computing layer orderings");
        let layers = layers_by_rank(&self.working);
        let layers = orderer.order(&self.working, layers, config);

        // Stage 6 — Position.
        debug!(target: "sugiyama::pipeline", "position: assigning coordinates");
        positioner.position(&mut self.working, &layers, config);

        // Stage 7 — Denormalize.
        debug!(target: "sugiyama::pipeline", "denormalize: collapsing dummy chains");
        denormalize::denormalize(&mut self.working);

        // Stage 8 — Fixup.
        debug!(target: "sugiyama::pipeline", "fixup: reversing polylines for flipped edges");
        acyclic::fixup_polylines(&mut self.working);

        // Stage 9 — Unacyclic.
        debug!(target: "sugiyama::pipeline", "unacyclic: restoring original edge orientation");
        acyclic::restore_orientation(&mut self.working);

        debug!(
            target: "sugiyama::pipeline",
            "pipeline done: {} nodes, {} edges",
            self.working.graph.node_count(),
            self.working.graph.edge_count()
        );

        // Stage 10 — Emit.
        Ok(emit::emit(self.working))
    }
}

/// `Config::debug_level >= 1` invariant probes (§7): check, rather than
/// assume, that Rank actually produced a feasible ranking. These never fire
/// on a correct build; they exist so a corrupted rank assignment is caught
/// here instead of surfacing as a confusing panic three stages later.
fn check_rank_invariants<N, E>(working: &Working<N, E>) {
    for id in working.graph.node_indices() {
        let rank = working.graph[id].rank.expect("rank assigned by Rank stage");
        if rank < 0 {
            error!(target: "sugiyama::pipeline", "invariant violated: node {:?} has negative rank {}", id, rank);
        }
    }
    for id in working.graph.edge_indices() {
        let (s, t) = working.graph.edge_endpoints(id).unwrap();
        let rs = working.graph[s].rank.unwrap();
        let rt = working.graph[t].rank.unwrap();
        let min_len = working.graph[id].min_len as i64;
        if rt - rs < min_len {
            error!(
                target: "sugiyama::pipeline",
                "invariant violated: edge {:?} span {} < min_len {}", id, rt - rs, min_len
            );
        }
    }
}

impl<N, E> Default for Pipeline<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_dimension(v: f64) -> Result<(), Error> {
    if !v.is_finite() || v < 0.0 {
        return Err(InvalidInputKind::BadDimension(v).into());
    }
    Ok(())
}

/// Group nodes by rank into `layers[rank]`, in arena-index order — the
/// deterministic starting order Order's sweeps refine (§4.5).
fn layers_by_rank<N, E>(working: &Working<N, E>) -> Vec<Vec<NodeId>> {
    let mut by_rank: HashMap<i64, Vec<NodeId>> = HashMap::new();
    let mut max_rank = 0i64;
    for id in working.graph.node_indices() {
        let rank = working.graph[id].rank.expect("rank must be assigned before ordering");
        max_rank = max_rank.max(rank);
        by_rank.entry(rank).or_default().push(id);
    }
    (0..=max_rank)
        .map(|r| by_rank.remove(&r).unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank_of<N, E>(out: &Output<N, E>, node: NodeId) -> i64 {
        out.node(node).unwrap().rank
    }

    #[test]
    fn s1_chain() {
        let mut p: Pipeline<&str> = Pipeline::new();
        let a = p.add_node("a", 10.0, 10.0).unwrap();
        let b = p.add_node("b", 10.0, 10.0).unwrap();
        let c = p.add_node("c", 10.0, 10.0).unwrap();
        p.add_edge(a, b, ()).unwrap();
        p.add_edge(b, c, ()).unwrap();

        let out = p.run(&Config::default()).unwrap();
        assert_eq!(rank_of(&out, a), 0);
        assert_eq!(rank_of(&out, b), 1);
        assert_eq!(rank_of(&out, c), 2);
        for (_, edge) in out.iter_edges() {
            assert!(edge.points.is_empty());
        }
    }

    #[test]
    fn s2_diamond() {
        let mut p: Pipeline<&str> = Pipeline::new();
        let a = p.add_node("a", 10.0, 10.0).unwrap();
        let b = p.add_node("b", 10.0, 10.0).unwrap();
        let c = p.add_node("c", 10.0, 10.0).unwrap();
        let d = p.add_node("d", 10.0, 10.0).unwrap();
        p.add_edge(a, b, ()).unwrap();
        p.add_edge(a, c, ()).unwrap();
        p.add_edge(b, d, ()).unwrap();
        p.add_edge(c, d, ()).unwrap();

        let out = p.run(&Config::default()).unwrap();
        assert_eq!(rank_of(&out, a), 0);
        assert_eq!(rank_of(&out, b), 1);
        assert_eq!(rank_of(&out, c), 1);
        assert_eq!(rank_of(&out, d), 2);
    }

    #[test]
    fn s3_long_edge() {
        let mut p: Pipeline<&str> = Pipeline::new();
        let a = p.add_node("a", 10.0, 10.0).unwrap();
        let b = p.add_node("b", 10.0, 10.0).unwrap();
        p.add_edge_with_options(a, b, (), 3, 1.0, 0.0, 0.0).unwrap();

        let out = p.run(&Config::default()).unwrap();
        assert_eq!(rank_of(&out, a), 0);
        assert_eq!(rank_of(&out, b), 3);
        let (_, edge) = out.iter_edges().next().unwrap();
        assert_eq!(edge.points.len(), 2);
    }

    /// A rank-span-2 edge has exactly one interior dummy, which is both the
    /// first and last point of the polyline — regression test for the
    /// `ChainIndex::Both` case (a single `Option<ChainIndex>` can't carry
    /// both markers without one overwriting the other).
    #[test]
    fn span_two_edge_has_one_point() {
        let mut p: Pipeline<&str> = Pipeline::new();
        let a = p.add_node("a", 10.0, 10.0).unwrap();
        let b = p.add_node("b", 10.0, 10.0).unwrap();
        p.add_edge_with_options(a, b, (), 2, 1.0, 0.0, 0.0).unwrap();

        let out = p.run(&Config::default()).unwrap();
        assert_eq!(rank_of(&out, a), 0);
        assert_eq!(rank_of(&out, b), 2);
        let (_, edge) = out.iter_edges().next().unwrap();
        assert_eq!(edge.points.len(), 1);
    }

    #[test]
    fn s4_cycle() {
        let mut p: Pipeline<&str> = Pipeline::new();
        let a = p.add_node("a", 10.0, 10.0).unwrap();
        let b = p.add_node("b", 10.0, 10.0).unwrap();
        let c = p.add_node("c", 10.0, 10.0).unwrap();
        let e_ab = p.add_edge(a, b, ()).unwrap();
        let e_bc = p.add_edge(b, c, ()).unwrap();
        let e_ca = p.add_edge(c, a, ()).unwrap();

        let out = p.run(&Config::default()).unwrap();
        let mut endpoints: Vec<_> = out
            .iter_edges()
            .map(|(id, e)| (id, e.source, e.target))
            .collect();
        endpoints.sort_by_key(|&(id, _, _)| id.0);
        let expected = {
            let mut v = vec![(e_ab, a, b), (e_bc, b, c), (e_ca, c, a)];
            v.sort_by_key(|&(id, _, _)| id.0);
            v
        };
        assert_eq!(endpoints, expected);
    }

    #[test]
    fn s5_rank_constraint() {
        let mut p: Pipeline<&str> = Pipeline::new();
        let a = p.add_node("a", 10.0, 10.0).unwrap();
        let b = p.add_node("b", 10.0, 10.0).unwrap();
        let c = p.add_node("c", 10.0, 10.0).unwrap();
        let d = p.add_node("d", 10.0, 10.0).unwrap();
        p.add_edge(a, b, ()).unwrap();
        p.add_edge(c, d, ()).unwrap();
        p.set_rank_min(a);
        p.set_rank_max(d);

        let out = p.run(&Config::default()).unwrap();
        let ra = rank_of(&out, a);
        let rd = rank_of(&out, d);
        for node in [a, b, c, d] {
            assert!(ra <= rank_of(&out, node));
            assert!(rd >= rank_of(&out, node));
        }
    }

    #[test]
    fn s6_undirected_input() {
        let mut p: Pipeline<&str> = Pipeline::new_undirected();
        let a = p.add_node("a", 10.0, 10.0).unwrap();
        let b = p.add_node("b", 10.0, 10.0).unwrap();
        let c = p.add_node("c", 10.0, 10.0).unwrap();
        p.add_edge(a, b, ()).unwrap();
        p.add_edge(b, c, ()).unwrap();

        let out = p.run(&Config::default()).unwrap();
        assert!(!out.directed);
        assert_eq!(out.edge_count(), 2);
        for (_, edge) in out.iter_edges() {
            assert!(rank_of(&out, edge.target) > rank_of(&out, edge.source));
        }
    }
}
