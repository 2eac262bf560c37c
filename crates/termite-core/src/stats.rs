//! Colony statistics for progress reporting.

use serde::{Deserialize, Serialize};

/// Aggregate chip and clustering figures for one generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColonyStats {
    /// Generation the figures were taken at
    pub generation: u64,
    /// Chips lying on the grid
    pub chips_on_grid: usize,
    /// Chips held by termites
    pub chips_carried: usize,
    /// Number of termites in the colony
    pub termites: usize,
    /// Mean fraction of occupied Moore neighbours around each chip (0.0 to 1.0)
    pub clustering: f64,
}

impl ColonyStats {
    /// Chips on the grid plus chips in transit. Constant across generations.
    pub fn total_chips(&self) -> usize {
        self.chips_on_grid + self.chips_carried
    }

    /// Fraction of termites currently carrying a chip
    pub fn carrying_ratio(&self) -> f64 {
        if self.termites == 0 {
            return 0.0;
        }
        self.chips_carried as f64 / self.termites as f64
    }

    /// True if `self` shows tighter piles than `earlier`
    pub fn more_clustered_than(&self, earlier: &ColonyStats) -> bool {
        self.clustering > earlier.clustering
    }
}
