//! Termite agent state.

use serde::{Deserialize, Serialize};
use termite_core::{Direction, Position};

/// A termite in the colony.
///
/// Plain data: every change is made by the [`Simulation`](crate::Simulation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Termite {
    pub position: Position,
    pub direction: Direction,
    pub carrying: bool,
}

impl Termite {
    pub fn new(position: Position, direction: Direction) -> Self {
        Self {
            position,
            direction,
            carrying: false,
        }
    }

    /// A termite that already holds a chip
    pub fn carrying(position: Position, direction: Direction) -> Self {
        Self {
            carrying: true,
            ..Self::new(position, direction)
        }
    }
}
