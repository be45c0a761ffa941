//! Error types surfaced by the layout pipeline.
//!
//! Every stage is fatal-on-error: the first problem encountered aborts the
//! whole `Pipeline::run` call and no partial graph is returned (see §7 of
//! SPEC_FULL.md).

use thiserror::Error;

/// Top level error returned by [`crate::Pipeline::run`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputKind),

    #[error("layout invariant violated: {0}")]
    InvariantViolation(#[from] InvariantViolationKind),

    #[error("rank constraint infeasible: {0}")]
    ConstraintInfeasible(#[from] ConstraintInfeasibleKind),
}

#[derive(Debug, Error)]
pub enum InvalidInputKind {
    #[error("edge min_len must be >= 1, got {0}")]
    NonPositiveMinLen(i64),

    #[error("node/edge dimension is NaN or negative: {0}")]
    BadDimension(f64),

    #[error("unknown rank direction {0:?}")]
    UnknownRankDir(String),
}

#[derive(Debug, Error)]
pub enum InvariantViolationKind {
    /// Initial ranking found an unresolved cycle after the acyclic stage.
    /// Should not happen on well-formed input; indicates a bug in cycle
    /// breaking rather than bad user data.
    #[error("graph still contains a cycle after acyclic stage")]
    NotAcyclic,

    /// Network simplex could not find an entering edge for a negative-cut
    /// tree edge.
    #[error("no entering edge found for leaving tree edge")]
    NoEnterEdge,

    /// Network simplex exceeded the `|V| * |E|` pivot safety cap.
    #[error("network simplex failed to converge within {0} pivots")]
    SimplexDidNotConverge(usize),
}

#[derive(Debug, Error)]
pub enum ConstraintInfeasibleKind {
    #[error("pref_rank constraints induce an unresolvable ordering: {0}")]
    Unresolvable(String),
}
