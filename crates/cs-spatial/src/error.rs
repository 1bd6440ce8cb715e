//! Spatial-subsystem error type.

use thiserror::Error;

use cs_core::{NodeId, ProfileId};

/// Errors produced by `cs-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("profile {0} not configured")]
    UnknownProfile(ProfileId),

    #[error("unknown node label {0:?}")]
    UnknownNode(String),

    #[error("invalid road network: {0}")]
    InvalidGraph(String),

    #[error("road network is disconnected ({components} components)")]
    Disconnected { components: usize },

    #[error("profile table is empty")]
    EmptyProfiles,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
