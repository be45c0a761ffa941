//! The working graph `W` and its node/edge value types (§3 of SPEC_FULL.md).
//!
//! `Working` wraps a `petgraph::Graph` rather than reimplementing adjacency
//! bookkeeping, the same external-collaborator choice the teacher crate
//! makes. Stable node/edge identity across mutation comes from petgraph's
//! own arena indices; the only extra id we track ourselves is the
//! user-facing [`EdgeId`] needed to round-trip original edges through
//! dummy-node subdivision (§9 "Original-edge identity across subdivision").

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::Directed;

/// Handle for a node, returned by [`crate::Pipeline::add_node`].
pub type NodeId = NodeIndex<u32>;
/// Internal edge arena handle.
pub type EdgeIx = EdgeIndex<u32>;

/// Stable, user-meaningful identity for an original (non-dummy) edge.
///
/// Carried on dummy nodes as part of [`EdgeRef`] so Denormalize can
/// reconstruct the edge without keeping a live pointer into a graph that is
/// being mutated out from under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

/// Opaque identifier for a cluster/subgraph a node may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterId(pub u64);

/// A rank preference hint on a node (§3, §4.3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefRank {
    /// Fixed rank shared by every node with the same value.
    Fixed(i64),
    /// Must be ranked no later than any other node.
    Min,
    /// Must be ranked no earlier than any other node.
    Max,
}

/// Marks which end of a subdivided edge's dummy chain a dummy node is.
///
/// A chain of length 1 (rank span exactly 2) has a single dummy that is
/// simultaneously the first and last point of the polyline — `Both` marks
/// that case so Denormalize writes one point instead of colliding two
/// separate writes into the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainIndex {
    First,
    Last,
    Both,
}

/// The stored shape of an original edge, kept on every dummy in its chain so
/// Denormalize can recreate it (§4.7, §9).
#[derive(Debug, Clone)]
pub struct EdgeRef<E> {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub attrs: EdgeAttrs<E>,
}

/// The subset of an edge's value that survives subdivision and is restored
/// verbatim by Denormalize.
#[derive(Debug, Clone)]
pub struct EdgeAttrs<E> {
    pub data: Option<E>,
    pub width: f64,
    pub height: f64,
    pub min_len: u32,
    pub weight: f64,
    pub reversed: bool,
}

/// A single control point written during Position/Denormalize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
    pub ul: f64,
    pub ur: f64,
    pub dl: f64,
    pub dr: f64,
}

impl PointRecord {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ul: 0.0,
            ur: 0.0,
            dl: 0.0,
            dr: 0.0,
        }
    }
}

/// Node value carried in `W` (§3).
///
/// Generic over both the user's node payload `N` and edge payload `E`
/// because dummy nodes stash a full [`EdgeRef<E>`] back to the original
/// edge they subdivide (§4.4, §9).
#[derive(Debug, Clone)]
pub struct NodeWeight<N, E> {
    pub data: Option<N>,
    pub width: f64,
    pub height: f64,
    pub rank: Option<i64>,
    pub pref_rank: Option<PrefRank>,
    pub dummy: bool,
    pub edge_ref: Option<EdgeRef<E>>,
    pub chain_index: Option<ChainIndex>,
    pub x: f64,
    pub y: f64,
    pub ul: f64,
    pub ur: f64,
    pub dl: f64,
    pub dr: f64,
    pub parent: Option<ClusterId>,
}

impl<N, E> NodeWeight<N, E> {
    pub fn new(data: N, width: f64, height: f64) -> Self {
        Self {
            data: Some(data),
            width,
            height,
            rank: None,
            pref_rank: None,
            dummy: false,
            edge_ref: None,
            chain_index: None,
            x: 0.0,
            y: 0.0,
            ul: 0.0,
            ur: 0.0,
            dl: 0.0,
            dr: 0.0,
            parent: None,
        }
    }

    pub fn dummy(width: f64, height: f64, edge_ref: EdgeRef<E>) -> Self {
        Self {
            data: None,
            width,
            height,
            rank: None,
            pref_rank: None,
            dummy: true,
            edge_ref: Some(edge_ref),
            chain_index: None,
            x: 0.0,
            y: 0.0,
            ul: 0.0,
            ur: 0.0,
            dl: 0.0,
            dr: 0.0,
            parent: None,
        }
    }
}

/// Edge value carried in `W` (§3). `min_len` is doubled on Build and halved
/// back on Emit by the `rank_sep`/`min_len` scoped transformation (§4.1,
/// §5).
#[derive(Debug, Clone)]
pub struct EdgeWeight<E> {
    pub id: EdgeId,
    pub data: Option<E>,
    pub min_len: u32,
    pub weight: f64,
    pub width: f64,
    pub height: f64,
    pub points: Vec<PointRecord>,
    pub reversed: bool,
}

impl<E> EdgeWeight<E> {
    pub fn new(id: EdgeId, min_len: u32, weight: f64, width: f64, height: f64, data: Option<E>) -> Self {
        Self {
            id,
            data,
            min_len,
            weight,
            width,
            height,
            points: Vec::new(),
            reversed: false,
        }
    }

    pub fn attrs(&self) -> EdgeAttrs<E>
    where
        E: Clone,
    {
        EdgeAttrs {
            data: self.data.clone(),
            width: self.width,
            height: self.height,
            min_len: self.min_len,
            weight: self.weight,
            reversed: self.reversed,
        }
    }
}

/// A removed self-loop, held aside during Acyclic and re-attached at Emit
/// (§4.2, §4.10).
pub struct SelfLoop<E> {
    pub node: NodeId,
    pub weight: EdgeWeight<E>,
}

/// The working graph `W`. Owns the petgraph substrate plus the pipeline
/// bookkeeping that doesn't fit naturally as node/edge weights: cluster
/// parentage, self loops pulled aside during Acyclic, and whether the
/// original input was directed (so Emit knows what shape to produce).
pub struct Working<N, E> {
    pub graph: Graph<NodeWeight<N, E>, EdgeWeight<E>, Directed, u32>,
    pub directed: bool,
    pub self_loops: Vec<SelfLoop<E>>,
    pub parents: HashMap<NodeId, ClusterId>,
    next_edge_id: u64,
}

impl<N, E> Working<N, E> {
    pub fn new(directed: bool) -> Self {
        Self {
            graph: Graph::new(),
            directed,
            self_loops: Vec::new(),
            parents: HashMap::new(),
            next_edge_id: 0,
        }
    }

    pub fn fresh_edge_id(&mut self) -> EdgeId {
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        id
    }

    /// Reverse an edge, preserving its weight. Constant time: remove + add,
    /// exactly as the teacher's `reverse_edge`.
    pub fn reverse_edge(&mut self, edge: EdgeIx) -> EdgeIx {
        let (from, to) = self.graph.edge_endpoints(edge).expect("edge must exist");
        let weight = self.graph.remove_edge(edge).expect("edge must exist");
        self.graph.add_edge(to, from, weight)
    }

    pub fn in_degree(&self, node: NodeId) -> usize {
        self.graph
            .edges_directed(node, petgraph::Direction::Incoming)
            .count()
    }
}
