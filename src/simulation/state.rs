//! Immutable simulation snapshot

use std::sync::Arc;

use super::connections_graph::ConnectionsGraph;
use super::traffic_light::TrafficLightSystem;
use super::vehicle::Vehicle;

/// The world at a single tick
///
/// Snapshots are never mutated once built; the graph is shared between
/// consecutive snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    graph: Arc<ConnectionsGraph>,
    vehicles: Vec<Vehicle>,
    traffic_light_systems: Vec<TrafficLightSystem>,
    /// Simulated seconds since Init
    time: f64,
    tick: u64,
}

impl SimulationState {
    pub(crate) fn new(
        graph: Arc<ConnectionsGraph>,
        mut vehicles: Vec<Vehicle>,
        mut traffic_light_systems: Vec<TrafficLightSystem>,
        time: f64,
        tick: u64,
    ) -> Self {
        vehicles.sort_by_key(|vehicle| vehicle.id);
        traffic_light_systems.sort_by_key(|system| system.id());
        Self {
            graph,
            vehicles,
            traffic_light_systems,
            time,
            tick,
        }
    }

    pub fn graph(&self) -> &ConnectionsGraph {
        &self.graph
    }

    /// Shared handle to the graph, for readers that outlive the snapshot
    pub fn shared_graph(&self) -> Arc<ConnectionsGraph> {
        Arc::clone(&self.graph)
    }

    /// Vehicles ordered by id
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Light systems ordered by id
    pub fn traffic_light_systems(&self) -> &[TrafficLightSystem] {
        &self.traffic_light_systems
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }
}
