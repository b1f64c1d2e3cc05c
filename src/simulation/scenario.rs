//! Built-in demo world
//!
//! A ring road with two curved connections and a feeder road joining it at
//! a signalised crossing.

use super::config::SimulationConfig;
use super::geometry::ConnectionType;
use super::types::{Location, Position2d};

/// Seconds each phase of the demo signal stays active
pub const DEMO_PHASE_DURATION: f64 = 8.0;

/// Build the configuration of the demo world
pub fn demo_config() -> SimulationConfig {
    let mut config = SimulationConfig::new();

    // Ring, driven counter-clockwise on screen
    let junction = config.add_crossing(Position2d::new(0.0, 0.0));
    let east = config.add_crossing(Position2d::new(60.0, 0.0));
    let north_east = config.add_crossing(Position2d::new(60.0, 40.0));
    let north_west = config.add_crossing(Position2d::new(0.0, 40.0));

    // Feeder road from the south-west
    let feeder_start = config.add_crossing(Position2d::new(-60.0, -30.0));
    let feeder_bend = config.add_crossing(Position2d::new(-30.0, -30.0));

    let ring_south = config.add_connection(junction, east, ConnectionType::Linear);
    let ring_east = config.add_connection(
        east,
        north_east,
        ConnectionType::QuadraticBezier {
            control_point: Position2d::new(80.0, 20.0),
        },
    );
    let ring_north = config.add_connection(north_east, north_west, ConnectionType::Linear);
    let ring_west = config.add_connection(
        north_west,
        junction,
        ConnectionType::QuadraticBezier {
            control_point: Position2d::new(-20.0, 20.0),
        },
    );
    let feeder = config.add_connection(feeder_start, feeder_bend, ConnectionType::Linear);
    let feeder_ramp = config.add_connection(
        feeder_bend,
        junction,
        ConnectionType::QuadraticBezier {
            control_point: Position2d::new(0.0, -30.0),
        },
    );

    config.add_traffic_light_system(
        vec![
            vec![Location::new(ring_west, 1.0)],
            vec![Location::new(feeder_ramp, 1.0)],
        ],
        DEMO_PHASE_DURATION,
    );

    config.add_vehicle(Location::new(ring_south, 0.2), 6.0);
    config.add_vehicle(Location::new(ring_south, 0.6), 4.0);
    config.add_vehicle(Location::new(ring_east, 0.5), 8.0);
    config.add_vehicle(Location::new(ring_north, 0.3), 0.0);
    config.add_vehicle(Location::new(ring_west, 0.4), 5.0);
    config.add_vehicle(Location::new(feeder, 0.1), 0.0);
    config.add_vehicle(Location::new(feeder, 0.6), 3.0);

    config
}
