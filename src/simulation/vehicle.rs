//! Vehicle movement logic for the traffic simulation
//!
//! A vehicle accelerates towards the cruising speed, brakes for red lights
//! and for the vehicle ahead, and follows the first output of every
//! crossing it reaches.

use log::{debug, trace, warn};
use std::collections::HashMap;

use super::connections_graph::{Connection, ConnectionsGraph};
use super::error::SimError;
use super::traffic_view::{Obstacle, TrafficView};
use super::types::{ConnectionId, Location, MotionParams, TimeInterval, VehicleId};

/// A vehicle in the traffic simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub location: Location,
    pub motion: MotionParams,
}

/// Where a vehicle ends up after travelling along the network
#[derive(Debug, Clone, Copy, PartialEq)]
enum Travel {
    Moving(Location),
    /// Reached the end of a connection with no way out
    DeadEnd(Location),
}

impl Vehicle {
    pub fn new(id: VehicleId, location: Location, motion: MotionParams) -> Self {
        Self {
            id,
            location,
            motion,
        }
    }

    /// Compute this vehicle's state one tick later
    ///
    /// `view` must describe the snapshot this vehicle belongs to, before
    /// any vehicle of the tick was moved.
    pub fn updated(&self, delta: TimeInterval, view: &TrafficView) -> Result<Vehicle, SimError> {
        let dt = delta.seconds();
        let config = view.config();
        let graph = view.graph();

        let connection = graph
            .connection(self.location.connection)
            .ok_or(SimError::UnknownConnection(self.location.connection))?;
        let distance = connection.arc_length().distance_at(self.location.progress);
        let speed = self.motion.speed.max(0.0);

        let braking_distance = speed * speed / (2.0 * config.max_deceleration);
        let reach = speed.max(config.target_speed) * dt;
        let horizon = config.stopping_distance.max(braking_distance).max(reach)
            + config.following_distance;
        let obstacle = view.nearest_obstacle(self.id, connection, distance, horizon)?;

        let mut acceleration = self.acceleration(speed, obstacle, view);

        let mut new_speed = (speed + acceleration * dt).max(0.0);
        if acceleration > 0.0 {
            new_speed = new_speed.min(config.target_speed.max(speed));
        }

        let mut advance = new_speed * dt;
        if let Some(obstacle) = obstacle {
            let mut constrained = false;

            // Slows down to the obstacle's speed within this tick
            if acceleration < 0.0 && new_speed <= obstacle.speed {
                let closing = (speed * speed - obstacle.speed * obstacle.speed) / (-2.0 * acceleration);
                advance = closing.min(obstacle.gap).max(0.0);
                new_speed = obstacle.speed;
                constrained = true;
            }

            if advance > obstacle.gap {
                advance = obstacle.gap.max(0.0);
                new_speed = new_speed.min(obstacle.speed);
                constrained = true;
            }

            if constrained && dt > 0.0 {
                acceleration = (new_speed - speed) / dt;
            }
        }

        match travel(graph, connection, distance + advance)? {
            Travel::Moving(location) => Ok(Vehicle {
                id: self.id,
                location,
                motion: MotionParams::new(new_speed, acceleration),
            }),
            Travel::DeadEnd(location) => {
                debug!("Vehicle {:?} is holding at a dead end", self.id);
                Ok(Vehicle {
                    id: self.id,
                    location,
                    motion: MotionParams::new(0.0, 0.0),
                })
            }
        }
    }

    /// Cruising acceleration, overridden by braking when an obstacle is
    /// close and slower than this vehicle
    fn acceleration(&self, speed: f64, obstacle: Option<Obstacle>, view: &TrafficView) -> f64 {
        let config = view.config();
        let cruise = if speed < config.target_speed {
            config.cruise_acceleration
        } else {
            0.0
        };

        let Some(obstacle) = obstacle else {
            return cruise;
        };

        let threshold = config
            .stopping_distance
            .max(speed * speed / (2.0 * config.max_deceleration));
        if obstacle.gap > threshold || speed <= obstacle.speed {
            return cruise;
        }

        let required = if obstacle.gap > f64::EPSILON {
            (speed * speed - obstacle.speed * obstacle.speed) / (2.0 * obstacle.gap)
        } else {
            config.max_deceleration
        };
        -required.min(config.max_deceleration)
    }
}

/// Rounding allowance when deciding whether a vehicle left its connection
const TRANSITION_EPSILON: f64 = 1e-9;

/// Move `distance` arc length from the start of `connection`, carrying any
/// leftover onto the following connections
///
/// Routes are fixed, so reaching a connection a second time means the
/// vehicle is on a loop; whole laps are dropped at that point.
fn travel(graph: &ConnectionsGraph, connection: &Connection, distance: f64) -> Result<Travel, SimError> {
    let mut current = connection;
    let mut remaining = distance;
    // Distance left when each connection of the walk was entered
    let mut entered: HashMap<ConnectionId, f64> = HashMap::new();
    entered.insert(current.id, remaining);

    loop {
        let length = current.length();
        // Stopping exactly on an end crossing must not spill onto the next connection
        if remaining <= length + TRANSITION_EPSILON {
            let progress = current.arc_length().parameter_at(remaining.min(length));
            if progress >= 1.0 && graph.next_connection(current.id)?.is_none() {
                return Ok(Travel::DeadEnd(Location::new(current.id, 1.0)));
            }
            return Ok(Travel::Moving(Location::new(current.id, progress)));
        }

        let Some(next) = graph.next_connection(current.id)? else {
            return Ok(Travel::DeadEnd(Location::new(current.id, 1.0)));
        };
        remaining -= length;
        current = next;

        if let Some(previous) = entered.get(&current.id).copied() {
            let lap = previous - remaining;
            if lap <= f64::EPSILON {
                warn!(
                    "Connection {:?} is part of a zero-length loop; holding vehicle",
                    current.id
                );
                return Ok(Travel::DeadEnd(Location::new(current.id, 1.0)));
            }
            remaining %= lap;
            trace!("Dropped whole laps of {:.3} entering {:?}", lap, current.id);
            entered.clear();
        }
        entered.insert(current.id, remaining);
    }
}
