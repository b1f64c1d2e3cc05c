//! Shared world builders for the integration tests

#![allow(dead_code)]

use traffic_simulator::simulation::{
    Command, ConnectionId, ConnectionType, Engine, KinematicsConfig, Position2d, SimulationConfig,
    SimulationState, TimeInterval,
};

/// Kinematics with a unit cruising acceleration and a high cruising speed
pub fn test_kinematics() -> KinematicsConfig {
    KinematicsConfig {
        target_speed: 50.0,
        cruise_acceleration: 1.0,
        max_deceleration: 6.0,
        stopping_distance: 15.0,
        following_distance: 4.0,
    }
}

/// A straight chain of crossings along the x axis, `lengths[i]` apart,
/// joined by linear connections. The last crossing is a dead end.
pub fn chain_config(lengths: &[f64]) -> (SimulationConfig, Vec<ConnectionId>) {
    let mut config = SimulationConfig::new();
    config.kinematics = test_kinematics();

    let mut x = 0.0;
    let mut previous = config.add_crossing(Position2d::new(x, 0.0));
    let mut connections = Vec::new();
    for length in lengths {
        x += length;
        let next = config.add_crossing(Position2d::new(x, 0.0));
        connections.push(config.add_connection(previous, next, ConnectionType::Linear));
        previous = next;
    }

    (config, connections)
}

pub fn engine(config: SimulationConfig) -> Engine {
    Engine::new(config).expect("valid configuration")
}

pub fn step(engine: &Engine, state: &SimulationState, seconds: f64) -> SimulationState {
    let delta = TimeInterval::new(seconds).expect("non-negative interval");
    engine
        .handle_command(Command::Update(delta), state)
        .expect("update succeeds")
}

pub fn run(engine: &Engine, state: &SimulationState, seconds: f64, ticks: usize) -> SimulationState {
    let mut state = state.clone();
    for _ in 0..ticks {
        state = step(engine, &state, seconds);
    }
    state
}

/// Arc distance of a vehicle from the start of its connection
pub fn distance_along(state: &SimulationState, index: usize) -> f64 {
    let vehicle = &state.vehicles()[index];
    state
        .graph()
        .connection(vehicle.location.connection)
        .expect("vehicle connection exists")
        .arc_length()
        .distance_at(vehicle.location.progress)
}
