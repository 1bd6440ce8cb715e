use cs_arrival::ArrivalError;
use cs_core::CoreError;
use cs_mobility::MobilityError;
use cs_spatial::SpatialError;
use thiserror::Error;

use crate::RunState;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("{0} not configured")]
    NotConfigured(&'static str),

    #[error("cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state:  RunState,
    },

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Arrival(#[from] ArrivalError),

    #[error(transparent)]
    Mobility(#[from] MobilityError),
}

pub type SimResult<T> = Result<T, SimError>;
