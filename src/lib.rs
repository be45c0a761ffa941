//! A library for laying out graphs according to the algorithm in the Gansner et al paper.
//!
//! The type of graph this draws is sometimes called a [layered graph].
//!
//! This library aims to be agnostic of any actual drawing: it takes minimal information about
//! nodes and edges as input (specifically node bounding boxes and edge label boxes) and hands
//! back node positions and edge polylines. We follow the Gansner paper's rank-assignment and
//! normalization machinery closely, but treat crossing reduction and coordinate assignment as
//! swappable strategies (the [`Orderer`] and [`Positioner`] traits) rather than a single fixed
//! algorithm, since those two phases are where the literature diverges most and callers are most
//! likely to want their own heuristic.
//!
//! # Pipeline
//!
//! [`Pipeline::run`] drives the graph through ten stages: build, break cycles, assign ranks,
//! normalize (insert dummy nodes so every edge spans one rank), order, position, denormalize
//! (collapse dummy chains into edge polylines), fix up reversed polylines, restore original edge
//! orientation, and emit. None of this is visible to callers beyond the `add_node`/`add_edge`
//! builder surface and the final [`Output`].
//!
//! # References
//!  - [Handbook of Graph Drawing and Visualization (Ed. Roberto
//!    Tamassia)](https://cs.brown.edu/people/rtamassi/gdhandbook/)
//!  - [A Technique for Drawing Directed Graphs (Gansner et.
//!    al.)](https://www.researchgate.net/publication/3187542_A_Technique_for_Drawing_Directed_Graphs)
//!
//! [layered graph]: https://en.wikipedia.org/wiki/Layered_graph_drawing

mod acyclic;
mod build;
mod config;
mod denormalize;
mod emit;
mod error;
mod graph;
mod normalize;
mod order;
mod pipeline;
mod position;
mod rank;

pub use config::{Config, ConfigBuilder, RankDir};
pub use emit::{EdgeOutput, NodeOutput, Output};
pub use error::{ConstraintInfeasibleKind, Error, InvalidInputKind, InvariantViolationKind};
pub use graph::{ClusterId, EdgeId, NodeId, PointRecord, PrefRank};
pub use order::{MedianOrderer, Orderer};
pub use pipeline::Pipeline;
pub use position::{Positioner, SweepPositioner};
