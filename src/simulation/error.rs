//! Error types for the traffic simulation

use thiserror::Error;

use super::types::{ConnectionId, CrossingId, TrafficLightSystemId, VehicleId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid time interval: {0}s (expected a finite, non-negative number of seconds)")]
    InvalidInterval(f64),
    #[error("unknown connection {0:?}")]
    UnknownConnection(ConnectionId),
    #[error("unknown crossing {0:?}")]
    UnknownCrossing(CrossingId),
    #[error("crossing {0:?} already exists")]
    DuplicateCrossing(CrossingId),
    #[error("connection {0:?} already exists")]
    DuplicateConnection(ConnectionId),
    #[error("vehicle {0:?} already exists")]
    DuplicateVehicle(VehicleId),
    #[error("invalid traffic light system {id:?}: {reason}")]
    InvalidTrafficLightSystem {
        id: TrafficLightSystemId,
        reason: String,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
