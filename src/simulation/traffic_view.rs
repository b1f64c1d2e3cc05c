//! Read-only index of a snapshot used while moving vehicles
//!
//! Every vehicle in a tick is updated against the same pre-tick view, so
//! vehicle updates never observe each other's results.

use log::trace;
use ordered_float::OrderedFloat;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;

use super::config::KinematicsConfig;
use super::connections_graph::{Connection, ConnectionsGraph};
use super::error::SimError;
use super::traffic_light::TrafficLightSystem;
use super::types::{ConnectionId, VehicleId};
use super::vehicle::Vehicle;

/// Something a vehicle must not drive past
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Arc length between the vehicle and the point it has to stay behind
    pub gap: f64,
    /// Speed of the obstacle; zero for a red light
    pub speed: f64,
}

type VehicleKey = (OrderedFloat<f64>, VehicleId);

pub struct TrafficView<'a> {
    graph: &'a ConnectionsGraph,
    config: &'a KinematicsConfig,

    /// Maps connection IDs to the vehicles on them, ordered by arc distance
    /// from the connection start, with their speed
    vehicles_on_connections: HashMap<ConnectionId, BTreeMap<VehicleKey, f64>>,

    /// Arc distances of red stop lines on each connection, ascending
    red_lights_on_connections: HashMap<ConnectionId, Vec<f64>>,
}

impl<'a> TrafficView<'a> {
    pub fn new(
        graph: &'a ConnectionsGraph,
        config: &'a KinematicsConfig,
        vehicles: &[Vehicle],
        traffic_light_systems: &[TrafficLightSystem],
    ) -> Result<Self, SimError> {
        let mut vehicles_on_connections: HashMap<ConnectionId, BTreeMap<VehicleKey, f64>> =
            HashMap::new();
        for vehicle in vehicles {
            let connection = lookup(graph, vehicle.location.connection)?;
            let distance = connection.arc_length().distance_at(vehicle.location.progress);
            vehicles_on_connections
                .entry(connection.id)
                .or_default()
                .insert((OrderedFloat(distance), vehicle.id), vehicle.motion.speed.max(0.0));
        }

        let mut red_lights_on_connections: HashMap<ConnectionId, Vec<f64>> = HashMap::new();
        for light in traffic_light_systems
            .iter()
            .flat_map(|system| system.all_traffic_lights())
            .filter(|light| light.state.is_red())
        {
            let connection = lookup(graph, light.location.connection)?;
            red_lights_on_connections
                .entry(connection.id)
                .or_default()
                .push(connection.arc_length().distance_at(light.location.progress));
        }
        for stop_lines in red_lights_on_connections.values_mut() {
            stop_lines.sort_by(|a, b| a.total_cmp(b));
        }

        Ok(Self {
            graph,
            config,
            vehicles_on_connections,
            red_lights_on_connections,
        })
    }

    pub fn graph(&self) -> &'a ConnectionsGraph {
        self.graph
    }

    pub fn config(&self) -> &'a KinematicsConfig {
        self.config
    }

    /// Find the nearest obstacle within `horizon` arc length ahead of a
    /// vehicle sitting `distance` along `connection`
    ///
    /// The search follows the route the vehicle would take, i.e. the first
    /// output of each end crossing, until the horizon or a dead end. On a
    /// loop it stops once every connection of the loop has been scanned in
    /// full.
    pub fn nearest_obstacle(
        &self,
        vehicle_id: VehicleId,
        connection: &Connection,
        distance: f64,
        horizon: f64,
    ) -> Result<Option<Obstacle>, SimError> {
        let following = self.config.following_distance;
        let mut nearest: Option<Obstacle> = None;
        let mut consider = |candidate: Obstacle| {
            if nearest.map_or(true, |current| candidate.gap < current.gap) {
                nearest = Some(candidate);
            }
        };

        // Arc length from the vehicle to the start of the connection being scanned
        let mut offset = -distance;
        let mut current = connection;
        // Connections scanned end to end; the starting one is only scanned
        // ahead of the vehicle on the first pass
        let mut scanned: HashSet<ConnectionId> = HashSet::new();
        let mut first = true;

        loop {
            if let Some(stop_lines) = self.red_lights_on_connections.get(&current.id) {
                let ahead = stop_lines
                    .iter()
                    .find(|&&stop_line| !first || stop_line >= distance);
                if let Some(stop_line) = ahead {
                    consider(Obstacle {
                        gap: offset + stop_line,
                        speed: 0.0,
                    });
                }
            }

            if let Some(vehicles) = self.vehicles_on_connections.get(&current.id) {
                let lead = if first {
                    vehicles
                        .range((
                            Bound::Excluded((OrderedFloat(distance), vehicle_id)),
                            Bound::Unbounded,
                        ))
                        .next()
                } else {
                    vehicles.iter().find(|((_, id), _)| *id != vehicle_id)
                };
                if let Some(((lead_distance, lead_id), lead_speed)) = lead {
                    trace!("Vehicle {:?} is following {:?}", vehicle_id, lead_id);
                    consider(Obstacle {
                        gap: offset + lead_distance.into_inner() - following,
                        speed: *lead_speed,
                    });
                }
            }

            if !first {
                scanned.insert(current.id);
            }
            offset += current.length();
            if offset >= horizon {
                break;
            }

            match self.graph.next_connection(current.id)? {
                Some(next) if !scanned.contains(&next.id) => current = next,
                _ => break,
            }
            first = false;
        }

        Ok(nearest)
    }
}

fn lookup(graph: &ConnectionsGraph, id: ConnectionId) -> Result<&Connection, SimError> {
    graph.connection(id).ok_or(SimError::UnknownConnection(id))
}
