//! Construction-time configuration
//!
//! Describes the network, the starting fleet, the light systems and the
//! kinematics constants used to build the initial snapshot.

use super::error::SimError;
use super::geometry::ConnectionType;
use super::types::{
    ConnectionId, CrossingId, Location, Position2d, SimId, TrafficLightId, TrafficLightSystemId,
    VehicleId,
};

/// Tunable constants of the vehicle motion policy
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicsConfig {
    /// Cruising speed vehicles accelerate towards
    pub target_speed: f64,
    /// Acceleration applied while below the cruising speed
    pub cruise_acceleration: f64,
    /// Upper bound on braking deceleration (positive magnitude)
    pub max_deceleration: f64,
    /// Distance ahead of an obstacle at which braking may start
    pub stopping_distance: f64,
    /// Arc-length gap kept behind the vehicle ahead
    pub following_distance: f64,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            target_speed: 10.0,
            cruise_acceleration: 2.0,
            max_deceleration: 6.0,
            stopping_distance: 15.0,
            following_distance: 4.0,
        }
    }
}

impl KinematicsConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        let fields = [
            ("target_speed", self.target_speed),
            ("cruise_acceleration", self.cruise_acceleration),
            ("max_deceleration", self.max_deceleration),
            ("stopping_distance", self.stopping_distance),
            ("following_distance", self.following_distance),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.max_deceleration == 0.0 {
            return Err(SimError::InvalidConfig(
                "max_deceleration must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossingConfig {
    pub id: CrossingId,
    pub position: Position2d,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    pub id: ConnectionId,
    pub start: CrossingId,
    pub end: CrossingId,
    pub connection_type: ConnectionType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleConfig {
    pub id: VehicleId,
    pub location: Location,
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrafficLightConfig {
    pub id: TrafficLightId,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrafficLightSystemConfig {
    pub id: TrafficLightSystemId,
    pub lights: Vec<TrafficLightConfig>,
    /// Green lights of each phase, in cycle order
    pub phases: Vec<Vec<TrafficLightId>>,
    pub phase_duration: f64,
}

/// Everything needed to build the initial simulation state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimulationConfig {
    pub crossings: Vec<CrossingConfig>,
    pub connections: Vec<ConnectionConfig>,
    pub vehicles: Vec<VehicleConfig>,
    pub traffic_light_systems: Vec<TrafficLightSystemConfig>,
    pub kinematics: KinematicsConfig,
    /// Seeds the starting-speed jitter; without a seed the initial state
    /// has no randomness
    pub seed: Option<u64>,
    /// Upper bound of the random speed added to each starting vehicle
    pub initial_speed_jitter: f64,

    /// Next ID to assign
    next_id: usize,
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_sim_id(&mut self) -> SimId {
        let id = SimId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a crossing at the given position
    pub fn add_crossing(&mut self, position: Position2d) -> CrossingId {
        let id = CrossingId(self.next_sim_id());
        self.crossings.push(CrossingConfig { id, position });
        id
    }

    /// Add a one-way connection between two crossings
    pub fn add_connection(
        &mut self,
        start: CrossingId,
        end: CrossingId,
        connection_type: ConnectionType,
    ) -> ConnectionId {
        let id = ConnectionId(self.next_sim_id());
        self.connections.push(ConnectionConfig {
            id,
            start,
            end,
            connection_type,
        });
        id
    }

    /// Add a straight connection in each direction
    pub fn add_two_way_connection(
        &mut self,
        start: CrossingId,
        end: CrossingId,
    ) -> (ConnectionId, ConnectionId) {
        let forward = self.add_connection(start, end, ConnectionType::Linear);
        let backward = self.add_connection(end, start, ConnectionType::Linear);
        (forward, backward)
    }

    /// Add a vehicle to the starting fleet
    pub fn add_vehicle(&mut self, location: Location, speed: f64) -> VehicleId {
        let id = VehicleId(self.next_sim_id());
        self.vehicles.push(VehicleConfig {
            id,
            location,
            speed,
        });
        id
    }

    /// Add a light system where phase `i` turns on the lights listed in
    /// `phase_lights[i]`
    pub fn add_traffic_light_system(
        &mut self,
        phase_lights: Vec<Vec<Location>>,
        phase_duration: f64,
    ) -> TrafficLightSystemId {
        let id = TrafficLightSystemId(self.next_sim_id());
        let mut lights = Vec::new();
        let mut phases = Vec::with_capacity(phase_lights.len());

        for locations in phase_lights {
            let mut green = Vec::with_capacity(locations.len());
            for location in locations {
                let light_id = TrafficLightId(self.next_sim_id());
                lights.push(TrafficLightConfig {
                    id: light_id,
                    location,
                });
                green.push(light_id);
            }
            phases.push(green);
        }

        self.traffic_light_systems.push(TrafficLightSystemConfig {
            id,
            lights,
            phases,
            phase_duration,
        });
        id
    }
}
