//! Road network graph
//!
//! Crossings are nodes with a fixed position, connections are directed
//! edges with a geometry. The graph is built once and never mutated
//! afterwards.

use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap};

use super::error::SimError;
use super::geometry::{ArcLengthTable, ConnectionType};
use super::types::{ConnectionId, CrossingId, Position2d};

/// A fixed node of the network
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub id: CrossingId,
    pub position: Position2d,
}

/// A directed edge between two crossings
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub start_id: CrossingId,
    pub end_id: CrossingId,
    pub connection_type: ConnectionType,
    arc_length: ArcLengthTable,
}

impl Connection {
    /// Arc length of the connection
    pub fn length(&self) -> f64 {
        self.arc_length.length()
    }

    pub fn arc_length(&self) -> &ArcLengthTable {
        &self.arc_length
    }
}

/// The static road network shared by every snapshot
#[derive(Debug, Clone)]
pub struct ConnectionsGraph {
    /// Underlying petgraph directed multigraph
    graph: DiGraph<CrossingId, ConnectionId>,

    /// Maps crossing IDs to their node indices in the graph
    crossing_to_node: HashMap<CrossingId, NodeIndex>,

    crossings: BTreeMap<CrossingId, Crossing>,

    connections: BTreeMap<ConnectionId, Connection>,
}

impl PartialEq for ConnectionsGraph {
    fn eq(&self, other: &Self) -> bool {
        self.crossings == other.crossings && self.connections == other.connections
    }
}

impl ConnectionsGraph {
    pub fn builder() -> ConnectionsGraphBuilder {
        ConnectionsGraphBuilder::default()
    }

    /// All crossings, keyed by id
    pub fn crossings(&self) -> &BTreeMap<CrossingId, Crossing> {
        &self.crossings
    }

    /// All connections, keyed by id
    pub fn connections(&self) -> &BTreeMap<ConnectionId, Connection> {
        &self.connections
    }

    pub fn crossing(&self, id: CrossingId) -> Option<&Crossing> {
        self.crossings.get(&id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn crossing_count(&self) -> usize {
        self.crossings.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Connections leaving a crossing, ordered by connection id
    ///
    /// An unknown crossing has no outputs.
    pub fn crossing_outputs(&self, crossing_id: CrossingId) -> Vec<&Connection> {
        self.adjacent(crossing_id, Direction::Outgoing)
    }

    /// Connections arriving at a crossing, ordered by connection id
    pub fn crossing_inputs(&self, crossing_id: CrossingId) -> Vec<&Connection> {
        self.adjacent(crossing_id, Direction::Incoming)
    }

    fn adjacent(&self, crossing_id: CrossingId, direction: Direction) -> Vec<&Connection> {
        let Some(node) = self.crossing_to_node.get(&crossing_id) else {
            return Vec::new();
        };

        let mut connections: Vec<&Connection> = self
            .graph
            .edges_directed(*node, direction)
            .filter_map(|edge| self.connections.get(edge.weight()))
            .collect();
        connections.sort_by_key(|connection| connection.id);
        connections
    }

    /// The connection a vehicle continues onto after reaching the end of
    /// `connection_id`, if any
    pub fn next_connection(&self, connection_id: ConnectionId) -> Result<Option<&Connection>, SimError> {
        let connection = self
            .connection(connection_id)
            .ok_or(SimError::UnknownConnection(connection_id))?;

        Ok(self.crossing_outputs(connection.end_id).into_iter().next())
    }

    /// Start and end positions of a connection
    pub fn endpoints(&self, connection: &Connection) -> Result<(Position2d, Position2d), SimError> {
        let start = self
            .crossing(connection.start_id)
            .ok_or(SimError::UnknownCrossing(connection.start_id))?;
        let end = self
            .crossing(connection.end_id)
            .ok_or(SimError::UnknownCrossing(connection.end_id))?;

        Ok((start.position, end.position))
    }
}

/// Validating builder for [`ConnectionsGraph`]
///
/// Crossings must be added before the connections that reference them.
#[derive(Debug, Default)]
pub struct ConnectionsGraphBuilder {
    graph: DiGraph<CrossingId, ConnectionId>,
    crossing_to_node: HashMap<CrossingId, NodeIndex>,
    crossings: BTreeMap<CrossingId, Crossing>,
    connections: BTreeMap<ConnectionId, Connection>,
}

impl ConnectionsGraphBuilder {
    pub fn add_crossing(&mut self, id: CrossingId, position: Position2d) -> Result<&mut Self, SimError> {
        if self.crossings.contains_key(&id) {
            return Err(SimError::DuplicateCrossing(id));
        }

        let node = self.graph.add_node(id);
        self.crossing_to_node.insert(id, node);
        self.crossings.insert(id, Crossing { id, position });
        Ok(self)
    }

    pub fn add_connection(
        &mut self,
        id: ConnectionId,
        start_id: CrossingId,
        end_id: CrossingId,
        connection_type: ConnectionType,
    ) -> Result<&mut Self, SimError> {
        if self.connections.contains_key(&id) {
            return Err(SimError::DuplicateConnection(id));
        }

        let start = *self
            .crossings
            .get(&start_id)
            .ok_or(SimError::UnknownCrossing(start_id))?;
        let end = *self
            .crossings
            .get(&end_id)
            .ok_or(SimError::UnknownCrossing(end_id))?;

        let arc_length = ArcLengthTable::new(&connection_type, start.position, end.position);
        let start_node = self.crossing_to_node[&start_id];
        let end_node = self.crossing_to_node[&end_id];
        self.graph.add_edge(start_node, end_node, id);

        self.connections.insert(
            id,
            Connection {
                id,
                start_id,
                end_id,
                connection_type,
                arc_length,
            },
        );
        Ok(self)
    }

    pub fn build(self) -> ConnectionsGraph {
        debug!(
            "Built connections graph with {} crossings and {} connections",
            self.crossings.len(),
            self.connections.len()
        );

        ConnectionsGraph {
            graph: self.graph,
            crossing_to_node: self.crossing_to_node,
            crossings: self.crossings,
            connections: self.connections,
        }
    }
}
