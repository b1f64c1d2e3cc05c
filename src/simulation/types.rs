//! Core types for the traffic simulation
//!
//! Identifiers, positions and the small value types shared by every
//! other simulation module.

use std::ops::{Add, Mul, Sub};

use super::error::SimError;

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimId(pub usize);

/// A wrapper type for crossing IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CrossingId(pub SimId);

/// A wrapper type for connection IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(pub SimId);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VehicleId(pub SimId);

/// A wrapper type for traffic light IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrafficLightId(pub SimId);

/// A wrapper type for traffic light system IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrafficLightSystemId(pub SimId);

impl CrossingId {
    pub fn new(id: usize) -> Self {
        Self(SimId(id))
    }
}

impl ConnectionId {
    pub fn new(id: usize) -> Self {
        Self(SimId(id))
    }
}

impl VehicleId {
    pub fn new(id: usize) -> Self {
        Self(SimId(id))
    }
}

impl TrafficLightId {
    pub fn new(id: usize) -> Self {
        Self(SimId(id))
    }
}

impl TrafficLightSystemId {
    pub fn new(id: usize) -> Self {
        Self(SimId(id))
    }
}

/// A 2D position in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position2d {
    pub x: f64,
    pub y: f64,
}

impl Position2d {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: &Position2d) -> f64 {
        (*other - *self).length()
    }

    pub fn lerp(&self, other: &Position2d, t: f64) -> Position2d {
        Position2d {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Heading angle in radians from this position towards another
    pub fn angle_to(&self, other: &Position2d) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        if dx == 0.0 && dy == 0.0 {
            0.0
        } else {
            dy.atan2(dx)
        }
    }
}

impl Add for Position2d {
    type Output = Position2d;

    fn add(self, rhs: Position2d) -> Position2d {
        Position2d::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position2d {
    type Output = Position2d;

    fn sub(self, rhs: Position2d) -> Position2d {
        Position2d::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Position2d {
    type Output = Position2d;

    fn mul(self, rhs: f64) -> Position2d {
        Position2d::new(self.x * rhs, self.y * rhs)
    }
}

/// Where something sits on the network: a connection and the curve
/// parameter along it, in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub connection: ConnectionId,
    pub progress: f64,
}

impl Location {
    pub fn new(connection: ConnectionId, progress: f64) -> Self {
        Self {
            connection,
            progress: progress.clamp(0.0, 1.0),
        }
    }
}

/// Speed and the acceleration applied during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionParams {
    pub speed: f64,
    pub acceleration: f64,
}

impl MotionParams {
    pub fn new(speed: f64, acceleration: f64) -> Self {
        Self {
            speed,
            acceleration,
        }
    }
}

/// A non-negative duration in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeInterval(f64);

impl TimeInterval {
    pub fn new(seconds: f64) -> Result<Self, SimError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(SimError::InvalidInterval(seconds));
        }
        Ok(Self(seconds))
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(millis as f64 / 1000.0)
    }

    pub fn seconds(&self) -> f64 {
        self.0
    }
}

/// Number of equal parameter steps used to sample curved connections
/// when measuring arc length
pub const ARC_LENGTH_SAMPLES: usize = 64;

/// Tolerance used when comparing phase timers against their duration
pub const PHASE_EPSILON: f64 = 1e-9;
