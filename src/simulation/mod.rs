//! Traffic simulation engine
//!
//! This module contains the road graph, the geometry used to place things
//! on it, vehicle kinematics, traffic light control and the reducer that
//! advances an immutable snapshot by a time interval.

mod config;
mod connections_graph;
mod engine;
mod error;
mod geometry;
mod scenario;
mod state;
mod traffic_light;
mod traffic_view;
mod types;
mod vehicle;

pub use config::{
    ConnectionConfig, CrossingConfig, KinematicsConfig, SimulationConfig, TrafficLightConfig,
    TrafficLightSystemConfig, VehicleConfig,
};
pub use connections_graph::{Connection, ConnectionsGraph, ConnectionsGraphBuilder, Crossing};
pub use engine::{Command, Engine, Query};
pub use error::SimError;
pub use geometry::{heading_of, position_of, ArcLengthTable, ConnectionType, LocationResolver};
pub use scenario::{demo_config, DEMO_PHASE_DURATION};
pub use state::SimulationState;
pub use traffic_light::{LightState, Phase, TrafficLight, TrafficLightSystem};
pub use traffic_view::{Obstacle, TrafficView};
pub use types::{
    ConnectionId, CrossingId, Location, MotionParams, Position2d, SimId, TimeInterval,
    TrafficLightId, TrafficLightSystemId, VehicleId, ARC_LENGTH_SAMPLES, PHASE_EPSILON,
};
pub use vehicle::Vehicle;
