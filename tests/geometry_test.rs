//! Geometry and location resolution tests

use traffic_simulator::simulation::{
    heading_of, position_of, ConnectionId, ConnectionType, ConnectionsGraph, CrossingId,
    Location, LocationResolver, Position2d, SimError,
};

const EPS: f64 = 1e-9;

fn curved_graph() -> ConnectionsGraph {
    let mut builder = ConnectionsGraph::builder();
    builder
        .add_crossing(CrossingId::new(0), Position2d::new(0.0, 0.0))
        .unwrap()
        .add_crossing(CrossingId::new(1), Position2d::new(10.0, 0.0))
        .unwrap()
        .add_crossing(CrossingId::new(2), Position2d::new(20.0, 10.0))
        .unwrap()
        .add_connection(
            ConnectionId::new(10),
            CrossingId::new(0),
            CrossingId::new(1),
            ConnectionType::Linear,
        )
        .unwrap()
        .add_connection(
            ConnectionId::new(11),
            CrossingId::new(1),
            CrossingId::new(2),
            ConnectionType::QuadraticBezier {
                control_point: Position2d::new(20.0, 0.0),
            },
        )
        .unwrap();
    builder.build()
}

#[test]
fn test_linear_location_resolves_to_interpolated_point() {
    let graph = curved_graph();
    let position = position_of(&Location::new(ConnectionId::new(10), 0.25), &graph).unwrap();
    assert!((position.x - 2.5).abs() < EPS);
    assert!(position.y.abs() < EPS);
}

#[test]
fn test_bezier_location_resolves_to_curve_point() {
    let graph = curved_graph();
    // B(0.5) = 0.25 * P0 + 0.5 * C + 0.25 * P1
    let position = position_of(&Location::new(ConnectionId::new(11), 0.5), &graph).unwrap();
    assert!((position.x - 17.5).abs() < EPS);
    assert!((position.y - 2.5).abs() < EPS);

    let start = position_of(&Location::new(ConnectionId::new(11), 0.0), &graph).unwrap();
    let end = position_of(&Location::new(ConnectionId::new(11), 1.0), &graph).unwrap();
    assert_eq!(start, Position2d::new(10.0, 0.0));
    assert_eq!(end, Position2d::new(20.0, 10.0));
}

#[test]
fn test_bezier_is_longer_than_its_chord() {
    let graph = curved_graph();
    let curve = graph.connection(ConnectionId::new(11)).unwrap();
    let chord = Position2d::new(10.0, 0.0).distance(&Position2d::new(20.0, 10.0));
    assert!(curve.length() > chord);
    // Never longer than the control polygon
    assert!(curve.length() < 20.0);
}

#[test]
fn test_heading_follows_tangent() {
    let graph = curved_graph();
    let straight = heading_of(&Location::new(ConnectionId::new(10), 0.5), &graph).unwrap();
    assert!(straight.abs() < EPS);

    let curve_start = heading_of(&Location::new(ConnectionId::new(11), 0.0), &graph).unwrap();
    let curve_end = heading_of(&Location::new(ConnectionId::new(11), 1.0), &graph).unwrap();
    assert!(curve_start.abs() < EPS);
    assert!((curve_end - std::f64::consts::FRAC_PI_2).abs() < EPS);
}

#[test]
fn test_unknown_connection_is_an_error() {
    let graph = curved_graph();
    let missing = Location::new(ConnectionId::new(999), 0.5);
    assert_eq!(
        position_of(&missing, &graph),
        Err(SimError::UnknownConnection(ConnectionId::new(999)))
    );
    assert_eq!(
        graph.resolve(&missing),
        Err(SimError::UnknownConnection(ConnectionId::new(999)))
    );
}

#[test]
fn test_location_progress_is_clamped() {
    let connection = ConnectionId::new(10);
    assert_eq!(Location::new(connection, 1.5).progress, 1.0);
    assert_eq!(Location::new(connection, -0.5).progress, 0.0);
    assert_eq!(Location::new(connection, 0.3).progress, 0.3);
}
