//! Configuration types for the simulation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// World configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    pub height: i32,
    /// Number of termites in the colony
    pub termites: usize,
    /// Probability that a cell starts with a chip (0.0 to 1.0)
    pub density: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 150,
            height: 100,
            termites: 200,
            density: 0.09,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(Error::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(Error::InvalidConfig(format!(
                "grid {}x{} is too large",
                self.width, self.height
            )));
        }
        if self.termites == 0 {
            return Err(Error::InvalidConfig(
                "termite count must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.density) {
            return Err(Error::InvalidConfig(format!(
                "density must be within [0, 1], got {}",
                self.density
            )));
        }
        Ok(())
    }
}

/// Evolution rule applied each generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvolutionRule {
    /// Uniform random walk; dropping leaves the termite in place.
    RandomWalk,
    /// Forward-biased walk; the termite turns around after dropping.
    ForwardReverse,
    /// Forward-biased walk; the termite jumps away after dropping.
    ForwardJump,
}

impl EvolutionRule {
    /// Map the classic rule numbers 1, 2 and 3.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::RandomWalk),
            2 => Some(Self::ForwardReverse),
            3 => Some(Self::ForwardJump),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Self::RandomWalk => 1,
            Self::ForwardReverse => 2,
            Self::ForwardJump => 3,
        }
    }
}

impl fmt::Display for EvolutionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RandomWalk => write!(f, "rule 1 (random walk)"),
            Self::ForwardReverse => write!(f, "rule 2 (forward, reverse on drop)"),
            Self::ForwardJump => write!(f, "rule 3 (forward, jump on drop)"),
        }
    }
}

/// Where a termite goes after dropping a chip under [`EvolutionRule::ForwardJump`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropJump {
    /// One step in a uniformly random direction. The destination may hold a chip.
    #[default]
    RandomStep,
    /// Relocate to a uniformly random chip-free cell.
    EmptyCell,
}

/// Full simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of generations to run
    pub ticks: u64,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Active evolution rule
    pub rule: EvolutionRule,
    /// Post-drop jump behaviour for the forward-jump rule
    pub drop_jump: DropJump,
    /// World configuration
    pub world: WorldConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 10_000,
            seed: 0,
            rule: EvolutionRule::ForwardJump,
            drop_jump: DropJump::default(),
            world: WorldConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        self.world.validate()
    }

    /// Load from a `.json` or `.toml` file, chosen by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            Some("json") => Self::from_json(&contents),
            other => Err(Error::InvalidConfig(format!(
                "unsupported config extension {:?} for {}",
                other,
                path.display()
            ))),
        }
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
