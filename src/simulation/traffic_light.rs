//! Traffic light control for the traffic simulation
//!
//! Each intersection with lights owns one [`TrafficLightSystem`] that cycles
//! through a fixed list of phases on a timer.

use log::trace;
use std::collections::BTreeSet;

use super::error::SimError;
use super::types::{Location, TimeInterval, TrafficLightId, TrafficLightSystemId, PHASE_EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    Green,
    Red,
}

impl LightState {
    pub fn is_green(self) -> bool {
        matches!(self, LightState::Green)
    }

    pub fn is_red(self) -> bool {
        matches!(self, LightState::Red)
    }
}

/// A single light acting as a stop line at its location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficLight {
    pub id: TrafficLightId,
    pub location: Location,
    pub state: LightState,
}

impl TrafficLight {
    pub fn new(id: TrafficLightId, location: Location) -> Self {
        Self {
            id,
            location,
            state: LightState::Red,
        }
    }
}

/// The lights that are green during one phase; every other light of the
/// system is red
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Phase {
    pub green: BTreeSet<TrafficLightId>,
}

impl Phase {
    pub fn new(green: impl IntoIterator<Item = TrafficLightId>) -> Self {
        Self {
            green: green.into_iter().collect(),
        }
    }

    pub fn state_of(&self, light: TrafficLightId) -> LightState {
        if self.green.contains(&light) {
            LightState::Green
        } else {
            LightState::Red
        }
    }
}

/// The lights of one intersection and the phase timer driving them
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficLightSystem {
    id: TrafficLightSystemId,
    lights: Vec<TrafficLight>,
    phases: Vec<Phase>,
    phase_duration: f64,
    current_phase: usize,
    elapsed: f64,
}

impl TrafficLightSystem {
    /// Create a system at phase 0 with no elapsed time
    pub fn new(
        id: TrafficLightSystemId,
        lights: Vec<TrafficLight>,
        phases: Vec<Phase>,
        phase_duration: f64,
    ) -> Result<Self, SimError> {
        let invalid = |reason: String| SimError::InvalidTrafficLightSystem { id, reason };

        if phases.is_empty() {
            return Err(invalid("at least one phase is required".to_string()));
        }
        if !phase_duration.is_finite() || phase_duration <= 0.0 {
            return Err(invalid(format!(
                "phase duration must be positive, got {}",
                phase_duration
            )));
        }

        let mut owned = BTreeSet::new();
        for light in &lights {
            if !owned.insert(light.id) {
                return Err(invalid(format!("light {:?} appears twice", light.id)));
            }
        }
        for (index, phase) in phases.iter().enumerate() {
            if let Some(stranger) = phase.green.iter().find(|light| !owned.contains(light)) {
                return Err(invalid(format!(
                    "phase {} references light {:?} outside the system",
                    index, stranger
                )));
            }
        }

        let mut lights = lights;
        lights.sort_by_key(|light| light.id);

        let system = Self {
            id,
            lights,
            phases,
            phase_duration,
            current_phase: 0,
            elapsed: 0.0,
        };
        Ok(system.with_phase_applied())
    }

    pub fn id(&self) -> TrafficLightSystemId {
        self.id
    }

    /// All lights of the system, ordered by id
    pub fn all_traffic_lights(&self) -> &[TrafficLight] {
        &self.lights
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn phase_duration(&self) -> f64 {
        self.phase_duration
    }

    pub fn current_phase(&self) -> usize {
        self.current_phase
    }

    /// Time spent in the current phase
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advance the phase timer, returning the updated system
    ///
    /// The remainder past a phase boundary is carried into the next phase,
    /// so a long interval can skip through several phases.
    pub fn advanced(&self, delta: TimeInterval) -> Self {
        let total = (self.elapsed + delta.seconds()).min(f64::MAX);
        let switches = ((total + PHASE_EPSILON) / self.phase_duration).floor();

        let mut elapsed = total % self.phase_duration;
        if elapsed < PHASE_EPSILON || elapsed + PHASE_EPSILON >= self.phase_duration {
            elapsed = 0.0;
        }

        let phase_count = self.phases.len();
        let current_phase = (self.current_phase + (switches % phase_count as f64) as usize) % phase_count;
        if switches >= 1.0 {
            trace!(
                "Traffic light system {:?} switched {} times to phase {}",
                self.id,
                switches,
                current_phase
            );
        }

        Self {
            current_phase,
            elapsed,
            ..self.clone()
        }
        .with_phase_applied()
    }

    fn with_phase_applied(mut self) -> Self {
        let phase = &self.phases[self.current_phase];
        for light in &mut self.lights {
            light.state = phase.state_of(light.id);
        }
        self
    }
}
