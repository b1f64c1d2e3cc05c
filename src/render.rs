//! Terminal rendering of simulation snapshots
//!
//! Draws the static network, the lights and the vehicles of a
//! [`SimulationState`] as a character map. World coordinates reach the
//! screen through a [`PositionToPixel`] mapping and locations are placed
//! through a [`LocationResolver`], so both can be swapped out.

use std::collections::BTreeMap;

use crate::simulation::{LocationResolver, Position2d, SimError, SimulationState};

/// Maps world coordinates to screen cells
pub trait PositionToPixel {
    fn compute(&self, position: Position2d) -> (i64, i64);
}

/// Uniform scaling of world units to screen cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledPositionToPixel {
    unit_in_pixels: f64,
}

impl ScaledPositionToPixel {
    pub fn new(unit_in_pixels: f64) -> Self {
        Self { unit_in_pixels }
    }
}

impl PositionToPixel for ScaledPositionToPixel {
    fn compute(&self, position: Position2d) -> (i64, i64) {
        (
            (position.x * self.unit_in_pixels).round() as i64,
            (position.y * self.unit_in_pixels).round() as i64,
        )
    }
}

/// Draw priority of map symbols, later variants win
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Symbol {
    Road,
    Crossing,
    RedLight,
    GreenLight,
    Vehicle,
}

impl Symbol {
    fn glyph(self) -> char {
        match self {
            Symbol::Road => '.',
            Symbol::Crossing => '+',
            Symbol::RedLight => 'R',
            Symbol::GreenLight => 'G',
            Symbol::Vehicle => 'V',
        }
    }
}

pub struct MapRenderer<P: PositionToPixel> {
    position_to_pixel: P,
}

impl<P: PositionToPixel> MapRenderer<P> {
    pub fn new(position_to_pixel: P) -> Self {
        Self { position_to_pixel }
    }

    /// Render a snapshot; the first line is the legend
    pub fn render<R: LocationResolver>(
        &self,
        state: &SimulationState,
        resolver: &R,
    ) -> Result<String, SimError> {
        let graph = state.graph();
        let mut cells: BTreeMap<(i64, i64), Symbol> = BTreeMap::new();
        let mut plot = |position: Position2d, symbol: Symbol| {
            let cell = self.position_to_pixel.compute(position);
            let entry = cells.entry(cell).or_insert(symbol);
            if symbol > *entry {
                *entry = symbol;
            }
        };

        for connection in graph.connections().values() {
            let (start, end) = graph.endpoints(connection)?;
            let (sx, sy) = self.position_to_pixel.compute(start);
            let (ex, ey) = self.position_to_pixel.compute(end);
            let span = (sx - ex).abs().max((sy - ey).abs()).max(1) as usize;
            // Curves can be longer than their chord, so oversample
            let samples = span * 4;
            for i in 0..=samples {
                let t = i as f64 / samples as f64;
                plot(connection.connection_type.evaluate(start, end, t), Symbol::Road);
            }
        }

        for crossing in graph.crossings().values() {
            plot(crossing.position, Symbol::Crossing);
        }

        for light in state
            .traffic_light_systems()
            .iter()
            .flat_map(|system| system.all_traffic_lights())
        {
            let symbol = if light.state.is_green() {
                Symbol::GreenLight
            } else {
                Symbol::RedLight
            };
            plot(resolver.resolve(&light.location)?, symbol);
        }

        for vehicle in state.vehicles() {
            plot(resolver.resolve(&vehicle.location)?, Symbol::Vehicle);
        }

        let mut out = String::from("Legend: +=Crossing, .=Road, G/R=Traffic light, V=Vehicle\n");
        if cells.is_empty() {
            return Ok(out);
        }

        let min_x = cells.keys().map(|(x, _)| *x).min().unwrap_or(0) - 1;
        let max_x = cells.keys().map(|(x, _)| *x).max().unwrap_or(0) + 1;
        let min_y = cells.keys().map(|(_, y)| *y).min().unwrap_or(0) - 1;
        let max_y = cells.keys().map(|(_, y)| *y).max().unwrap_or(0) + 1;

        // World y grows upwards, screen rows grow downwards
        for y in (min_y..=max_y).rev() {
            let line: String = (min_x..=max_x)
                .map(|x| cells.get(&(x, y)).map_or(' ', |symbol| symbol.glyph()))
                .collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }

        Ok(out)
    }
}

/// One line per vehicle with its location and motion
pub fn vehicle_report(state: &SimulationState) -> Vec<String> {
    state
        .vehicles()
        .iter()
        .map(|vehicle| {
            format!(
                "Vehicle {}: connection={} progress={:.3} speed={:.1} acceleration={:.1}",
                vehicle.id.0 .0,
                vehicle.location.connection.0 .0,
                vehicle.location.progress,
                vehicle.motion.speed,
                vehicle.motion.acceleration
            )
        })
        .collect()
}
