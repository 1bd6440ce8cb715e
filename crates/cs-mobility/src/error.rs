use cs_core::{CyclistId, NodeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("no road between {from} and {to}")]
    NoEdge { from: NodeId, to: NodeId },

    #[error("cyclist {0} is not active")]
    NotActive(CyclistId),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
