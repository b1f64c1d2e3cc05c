//! The simulation reducer
//!
//! [`Engine::run_query`] builds the starting snapshot and
//! [`Engine::handle_command`] turns one snapshot into the next. Neither
//! keeps any state between calls.

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::config::SimulationConfig;
use super::connections_graph::ConnectionsGraph;
use super::error::SimError;
use super::geometry::ConnectionType;
use super::state::SimulationState;
use super::traffic_light::{Phase, TrafficLight, TrafficLightSystem};
use super::traffic_view::TrafficView;
use super::types::{Location, MotionParams, Position2d, TimeInterval};
use super::vehicle::Vehicle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// Produce the starting state
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Advance the world by the given interval
    Update(TimeInterval),
}

/// Runs queries and commands against a fixed configuration
#[derive(Debug, Clone)]
pub struct Engine {
    config: SimulationConfig,
}

impl Engine {
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.kinematics.validate()?;
        if !config.initial_speed_jitter.is_finite() || config.initial_speed_jitter < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "initial_speed_jitter must be a non-negative number, got {}",
                config.initial_speed_jitter
            )));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn run_query(&self, query: Query) -> Result<SimulationState, SimError> {
        match query {
            Query::Init => self.initial_state(),
        }
    }

    /// Apply a command to `state`, returning the next snapshot
    ///
    /// `state` is left untouched. Intervals are non-negative by
    /// construction of [`TimeInterval`].
    pub fn handle_command(
        &self,
        command: Command,
        state: &SimulationState,
    ) -> Result<SimulationState, SimError> {
        match command {
            Command::Update(delta) => self.update(delta, state),
        }
    }

    fn initial_state(&self) -> Result<SimulationState, SimError> {
        let graph = self.build_graph()?;
        let vehicles = self.build_vehicles(&graph)?;
        let traffic_light_systems = self.build_traffic_light_systems(&graph)?;

        info!(
            "Initialized simulation: {} crossings, {} connections, {} vehicles, {} light systems",
            graph.crossing_count(),
            graph.connection_count(),
            vehicles.len(),
            traffic_light_systems.len()
        );

        Ok(SimulationState::new(
            Arc::new(graph),
            vehicles,
            traffic_light_systems,
            0.0,
            0,
        ))
    }

    fn build_graph(&self) -> Result<ConnectionsGraph, SimError> {
        let mut builder = ConnectionsGraph::builder();
        for crossing in &self.config.crossings {
            let position = finite_position(crossing.position, || format!("crossing {:?}", crossing.id))?;
            builder.add_crossing(crossing.id, position)?;
        }
        for connection in &self.config.connections {
            if let ConnectionType::QuadraticBezier { control_point } = connection.connection_type {
                finite_position(control_point, || {
                    format!("control point of connection {:?}", connection.id)
                })?;
            }
            builder.add_connection(
                connection.id,
                connection.start,
                connection.end,
                connection.connection_type,
            )?;
        }
        Ok(builder.build())
    }

    fn build_vehicles(&self, graph: &ConnectionsGraph) -> Result<Vec<Vehicle>, SimError> {
        let mut rng = self.config.seed.map(StdRng::seed_from_u64);
        let jitter = self.config.initial_speed_jitter;
        let mut seen = BTreeSet::new();
        let mut vehicles = Vec::with_capacity(self.config.vehicles.len());

        for vehicle in &self.config.vehicles {
            if !seen.insert(vehicle.id) {
                return Err(SimError::DuplicateVehicle(vehicle.id));
            }
            let location = checked_location(graph, vehicle.location)?;
            if !vehicle.speed.is_finite() {
                return Err(SimError::InvalidConfig(format!(
                    "vehicle {:?} has a non-finite starting speed {}",
                    vehicle.id, vehicle.speed
                )));
            }

            let mut speed = vehicle.speed.max(0.0);
            if let Some(rng) = rng.as_mut() {
                if jitter > 0.0 {
                    speed += rng.random_range(0.0..jitter);
                }
            }

            debug!(
                "Vehicle {:?} starts on {:?} at progress {:.3} with speed {:.2}",
                vehicle.id, location.connection, location.progress, speed
            );
            vehicles.push(Vehicle::new(
                vehicle.id,
                location,
                MotionParams::new(speed, 0.0),
            ));
        }

        Ok(vehicles)
    }

    fn build_traffic_light_systems(
        &self,
        graph: &ConnectionsGraph,
    ) -> Result<Vec<TrafficLightSystem>, SimError> {
        self.config
            .traffic_light_systems
            .iter()
            .map(|system| {
                let lights = system
                    .lights
                    .iter()
                    .map(|light| Ok(TrafficLight::new(light.id, checked_location(graph, light.location)?)))
                    .collect::<Result<Vec<_>, SimError>>()?;
                let phases = system
                    .phases
                    .iter()
                    .map(|green| Phase::new(green.iter().copied()))
                    .collect();
                TrafficLightSystem::new(system.id, lights, phases, system.phase_duration)
            })
            .collect()
    }

    fn update(&self, delta: TimeInterval, state: &SimulationState) -> Result<SimulationState, SimError> {
        let view = TrafficView::new(
            state.graph(),
            &self.config.kinematics,
            state.vehicles(),
            state.traffic_light_systems(),
        )?;

        let traffic_light_systems = state
            .traffic_light_systems()
            .iter()
            .map(|system| system.advanced(delta))
            .collect();

        let vehicles = state
            .vehicles()
            .iter()
            .map(|vehicle| vehicle.updated(delta, &view))
            .collect::<Result<Vec<_>, SimError>>()?;

        trace!(
            "Tick {} advanced {:.3}s to t={:.3}s",
            state.tick() + 1,
            delta.seconds(),
            state.time() + delta.seconds()
        );

        Ok(SimulationState::new(
            state.shared_graph(),
            vehicles,
            traffic_light_systems,
            state.time() + delta.seconds(),
            state.tick() + 1,
        ))
    }
}

fn checked_location(graph: &ConnectionsGraph, location: Location) -> Result<Location, SimError> {
    if graph.connection(location.connection).is_none() {
        return Err(SimError::UnknownConnection(location.connection));
    }
    if !location.progress.is_finite() {
        return Err(SimError::InvalidConfig(format!(
            "location on {:?} has a non-finite progress {}",
            location.connection, location.progress
        )));
    }
    Ok(Location::new(location.connection, location.progress))
}

fn finite_position(
    position: Position2d,
    describe: impl FnOnce() -> String,
) -> Result<Position2d, SimError> {
    if position.x.is_finite() && position.y.is_finite() {
        Ok(position)
    } else {
        Err(SimError::InvalidConfig(format!(
            "{} has a non-finite position ({}, {})",
            describe(),
            position.x,
            position.y
        )))
    }
}
