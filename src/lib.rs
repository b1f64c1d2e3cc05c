//! Traffic Simulation Library
//!
//! A deterministic traffic simulation engine with a terminal renderer for
//! inspecting its snapshots.

pub mod render;
pub mod simulation;
