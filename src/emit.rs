//! Stage 10 — Emit (§4.10): package the working graph into the output the
//! caller actually wants, re-attaching self-loops pulled aside in Acyclic
//! and dropping the internal `id` correlation field from edge values.

use std::collections::HashMap;

use kurbo::{Point, Size};

use crate::graph::{ClusterId, EdgeId, NodeId, PointRecord, Working};

/// A laid-out node: its original payload plus position and size.
#[derive(Debug, Clone)]
pub struct NodeOutput<N> {
    pub data: N,
    pub position: Point,
    pub size: Size,
    pub rank: i64,
    pub cluster: Option<ClusterId>,
}

/// A laid-out edge: its original payload plus endpoints and polyline.
#[derive(Debug, Clone)]
pub struct EdgeOutput<E> {
    pub data: Option<E>,
    pub source: NodeId,
    pub target: NodeId,
    /// The `min_len` this edge was actually laid out against, after §4.1's
    /// per-label reservation (double the caller's value for labeled edges,
    /// unchanged otherwise).
    pub min_len: u32,
    pub weight: f64,
    /// Source-to-target control points (§4.5/§4.7). Empty for edges whose
    /// rank span never exceeded 1 — see the testable property in §8.4.
    pub points: Vec<PointRecord>,
}

/// The final laid-out graph.
pub struct Output<N, E> {
    pub directed: bool,
    nodes: HashMap<NodeId, NodeOutput<N>>,
    edges: HashMap<EdgeId, EdgeOutput<E>>,
}

impl<N, E> Output<N, E> {
    pub fn node(&self, id: NodeId) -> Option<&NodeOutput<N>> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&EdgeOutput<E>> {
        self.edges.get(&id)
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &NodeOutput<N>)> {
        self.nodes.iter().map(|(&id, n)| (id, n))
    }

    pub fn iter_edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeOutput<E>)> {
        self.edges.iter().map(|(&id, e)| (id, e))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

pub fn emit<N, E>(mut working: Working<N, E>) -> Output<N, E> {
    for self_loop in working.self_loops.drain(..) {
        working
            .graph
            .add_edge(self_loop.node, self_loop.node, self_loop.weight);
    }

    let mut nodes = HashMap::new();
    let node_ids: Vec<NodeId> = working.graph.node_indices().collect();
    for id in node_ids {
        let cluster = working.parents.get(&id).copied();
        let weight = &mut working.graph[id];
        let data = weight
            .data
            .take()
            .expect("surviving nodes always carry user data after denormalize");
        let rank = weight.rank.expect("rank assigned by Rank stage survives to Emit");
        nodes.insert(
            id,
            NodeOutput {
                data,
                position: Point::new(weight.x, weight.y),
                size: Size::new(weight.width, weight.height),
                rank,
                cluster,
            },
        );
    }

    let mut edges = HashMap::new();
    let edge_ids: Vec<_> = working.graph.edge_indices().collect();
    for id in edge_ids {
        let (source, target) = working.graph.edge_endpoints(id).unwrap();
        let weight = working.graph.edge_weight_mut(id).unwrap();
        edges.insert(
            weight.id,
            EdgeOutput {
                data: weight.data.take(),
                source,
                target,
                min_len: weight.min_len,
                weight: weight.weight,
                points: std::mem::take(&mut weight.points),
            },
        );
    }

    Output {
        directed: working.directed,
        nodes,
        edges,
    }
}
