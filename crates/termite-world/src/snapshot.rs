//! Serializable point-in-time view of the world for renderers.

use crate::grid::Grid;
use crate::termite::Termite;
use serde::{Deserialize, Serialize};
use termite_core::{Position, Result};

/// Grid chips and colony state taken between generations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub width: i32,
    pub height: i32,
    pub generation: u64,
    /// Row-major chip flags, `width * height` long
    pub chips: Vec<bool>,
    pub termites: Vec<Termite>,
}

impl WorldSnapshot {
    pub fn capture(grid: &Grid, termites: &[Termite], generation: u64) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            generation,
            chips: grid.chip_bits(),
            termites: termites.to_vec(),
        }
    }

    /// Chip flag at an in-range position
    pub fn has_chip(&self, pos: Position) -> bool {
        self.chips[(pos.y * self.width + pos.x) as usize]
    }

    /// Chip flags row by row, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.chips.chunks(self.width.max(1) as usize)
    }

    pub fn chip_count(&self) -> usize {
        self.chips.iter().filter(|chip| **chip).count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
