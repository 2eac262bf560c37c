//! World simulation engine.
//!
//! This module implements the toroidal grid where termites wander, pick up
//! wood chips and drop them again, slowly gathering the chips into piles.

pub mod grid;
pub mod termite;
pub mod simulation;
pub mod snapshot;

pub use grid::{Cell, Grid};
pub use termite::Termite;
pub use simulation::{Action, Simulation, SimulationResult};
pub use snapshot::WorldSnapshot;
