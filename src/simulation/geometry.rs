//! Connection geometry
//!
//! Evaluates connection curves and converts between the curve parameter
//! stored in a [`Location`] and arc length along the curve.

use super::connections_graph::ConnectionsGraph;
use super::error::SimError;
use super::types::{Location, Position2d, ARC_LENGTH_SAMPLES};

/// Shape of a connection between its start and end crossings
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectionType {
    /// Straight segment between the two crossings
    Linear,
    /// Quadratic Bézier curve bending towards `control_point`
    QuadraticBezier { control_point: Position2d },
}

impl ConnectionType {
    /// Point on the curve at parameter `t` (clamped to `[0, 1]`)
    pub fn evaluate(&self, start: Position2d, end: Position2d, t: f64) -> Position2d {
        let t = t.clamp(0.0, 1.0);
        match self {
            ConnectionType::Linear => start.lerp(&end, t),
            ConnectionType::QuadraticBezier { control_point } => {
                let u = 1.0 - t;
                start * (u * u) + *control_point * (2.0 * u * t) + end * (t * t)
            }
        }
    }

    /// First derivative of the curve at parameter `t`
    pub fn tangent(&self, start: Position2d, end: Position2d, t: f64) -> Position2d {
        let t = t.clamp(0.0, 1.0);
        match self {
            ConnectionType::Linear => end - start,
            ConnectionType::QuadraticBezier { control_point } => {
                (*control_point - start) * (2.0 * (1.0 - t)) + (end - *control_point) * (2.0 * t)
            }
        }
    }
}

/// Cumulative arc length sampled at equal parameter steps
///
/// Linear connections use a single exact step, curved ones
/// [`ARC_LENGTH_SAMPLES`] steps. Lookups interpolate linearly between
/// samples, so `parameter_at` and `distance_at` are monotone and invert
/// each other.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcLengthTable {
    cumulative: Vec<f64>,
}

impl ArcLengthTable {
    pub fn new(geometry: &ConnectionType, start: Position2d, end: Position2d) -> Self {
        let steps = match geometry {
            ConnectionType::Linear => 1,
            ConnectionType::QuadraticBezier { .. } => ARC_LENGTH_SAMPLES,
        };

        let mut cumulative = Vec::with_capacity(steps + 1);
        cumulative.push(0.0);
        let mut prev = start;
        let mut total = 0.0;
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            let point = geometry.evaluate(start, end, t);
            total += prev.distance(&point);
            cumulative.push(total);
            prev = point;
        }

        Self { cumulative }
    }

    fn steps(&self) -> usize {
        self.cumulative.len() - 1
    }

    /// Total arc length of the connection
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Arc length travelled from the start when the curve parameter is `t`
    pub fn distance_at(&self, t: f64) -> f64 {
        let steps = self.steps();
        let scaled = t.clamp(0.0, 1.0) * steps as f64;
        let idx = (scaled.floor() as usize).min(steps - 1);
        let frac = scaled - idx as f64;
        let d0 = self.cumulative[idx];
        let d1 = self.cumulative[idx + 1];
        d0 + (d1 - d0) * frac
    }

    /// Curve parameter reached after travelling `distance` from the start
    pub fn parameter_at(&self, distance: f64) -> f64 {
        let total = self.length();
        if total <= 0.0 {
            return if distance > 0.0 { 1.0 } else { 0.0 };
        }

        let steps = self.steps();
        let d = distance.clamp(0.0, total);
        let idx = self.cumulative.partition_point(|&c| c < d).clamp(1, steps);
        let d0 = self.cumulative[idx - 1];
        let d1 = self.cumulative[idx];
        let frac = if d1 - d0 <= 0.0 { 0.0 } else { (d - d0) / (d1 - d0) };

        (((idx - 1) as f64 + frac) / steps as f64).clamp(0.0, 1.0)
    }
}

/// Resolve a symbolic location into a coordinate
pub fn position_of(location: &Location, graph: &ConnectionsGraph) -> Result<Position2d, SimError> {
    let connection = graph
        .connection(location.connection)
        .ok_or(SimError::UnknownConnection(location.connection))?;
    let (start, end) = graph.endpoints(connection)?;

    Ok(connection
        .connection_type
        .evaluate(start, end, location.progress))
}

/// Direction of travel at a location, in radians
pub fn heading_of(location: &Location, graph: &ConnectionsGraph) -> Result<f64, SimError> {
    let connection = graph
        .connection(location.connection)
        .ok_or(SimError::UnknownConnection(location.connection))?;
    let (start, end) = graph.endpoints(connection)?;
    let tangent = connection
        .connection_type
        .tangent(start, end, location.progress);

    Ok(Position2d::default().angle_to(&tangent))
}

/// Something that can place a [`Location`] in world coordinates
///
/// Presentation code depends on this trait rather than on the graph so
/// that the resolver can be swapped out.
pub trait LocationResolver {
    fn resolve(&self, location: &Location) -> Result<Position2d, SimError>;
}

impl LocationResolver for ConnectionsGraph {
    fn resolve(&self, location: &Location) -> Result<Position2d, SimError> {
        position_of(location, self)
    }
}
