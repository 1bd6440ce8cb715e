//! Arrival-subsystem error type.

use thiserror::Error;

use cs_core::NodeId;
use cs_spatial::SpatialError;

/// Errors produced by `cs-arrival`.  All of them are configuration errors;
/// sampling itself never fails.
#[derive(Debug, Error)]
pub enum ArrivalError {
    #[error("unknown distribution kind {0:?}")]
    UnknownKind(String),

    #[error("{kind} takes {expected} parameter(s), got {got}")]
    Arity { kind: &'static str, expected: usize, got: usize },

    #[error("invalid distribution parameter: {0}")]
    InvalidParameter(String),

    #[error("no node has a configured arrival distribution")]
    NoOrigins,

    #[error("no positive weight in {0}")]
    NoPositiveWeight(String),

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ArrivalResult<T> = Result<T, ArrivalError>;
