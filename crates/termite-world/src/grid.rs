//! 2D grid of wood-chip cells.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use termite_core::{Direction, Position, WorldConfig};

/// Attempts at random sampling before falling back to a scan.
const EMPTY_CELL_SAMPLES: usize = 64;

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub has_chip: bool,
}

/// A 2D toroidal grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Chip-free grid. Dimensions must be positive.
    pub fn new(width: i32, height: i32) -> Self {
        let cells = (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| Cell {
                    x,
                    y,
                    has_chip: false,
                })
            })
            .collect();

        Self {
            width,
            height,
            cells,
        }
    }

    /// Create a grid from world configuration
    pub fn from_config(config: &WorldConfig, rng: &mut ChaCha8Rng) -> Self {
        let mut grid = Self::new(config.width, config.height);

        for cell in &mut grid.cells {
            cell.has_chip = rng.gen::<f32>() < config.density;
        }

        grid
    }

    /// Chip state at an already-wrapped position
    pub fn has_chip(&self, pos: Position) -> bool {
        self.cells[self.pos_to_index(pos)].has_chip
    }

    /// Set chip state at an already-wrapped position
    pub fn set_chip(&mut self, pos: Position, has_chip: bool) {
        let index = self.pos_to_index(pos);
        self.cells[index].has_chip = has_chip;
    }

    pub fn wrap(&self, pos: Position) -> Position {
        pos.wrap(self.width, self.height)
    }

    /// Wrapped neighbour of `pos` one step in `direction`
    pub fn neighbor(&self, pos: Position, direction: Direction) -> Position {
        self.wrap(pos.offset(direction))
    }

    /// Positive dimensions and exactly one cell per coordinate.
    ///
    /// Always true for grids built here; a deserialized grid may violate it.
    pub fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && (self.width as i64) * (self.height as i64) == self.cells.len() as i64
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    pub fn chip_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.has_chip).count()
    }

    /// Chips among the eight neighbours of `pos`.
    ///
    /// On grids narrower than three cells a neighbour may be visited more than
    /// once, and may be `pos` itself.
    pub fn neighbor_chips(&self, pos: Position) -> usize {
        Direction::all()
            .into_iter()
            .filter(|dir| self.has_chip(self.neighbor(pos, *dir)))
            .count()
    }

    /// Mean fraction of chip-bearing neighbours over every chip cell.
    ///
    /// Scattered chips score near the initial density, tight piles approach 1.0.
    pub fn clustering(&self) -> f64 {
        let (total, chips) = self
            .iter()
            .filter(|(_, cell)| cell.has_chip)
            .fold((0usize, 0usize), |(total, chips), (pos, _)| {
                (total + self.neighbor_chips(pos), chips + 1)
            });

        if chips == 0 {
            return 0.0;
        }
        total as f64 / (chips * Direction::COUNT) as f64
    }

    /// Uniformly random chip-free cell, or `None` if every cell holds a chip.
    pub fn random_empty_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        for _ in 0..EMPTY_CELL_SAMPLES {
            let index = rng.gen_range(0..self.cells.len());
            if !self.cells[index].has_chip {
                return Some(self.index_to_pos(index));
            }
        }

        // Dense grid: scan from a random start so the pick is not biased to row 0.
        let start = rng.gen_range(0..self.cells.len());
        (0..self.cells.len())
            .map(|offset| (start + offset) % self.cells.len())
            .find(|&index| !self.cells[index].has_chip)
            .map(|index| self.index_to_pos(index))
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        debug_assert!(self.contains(pos), "position {pos} outside grid");
        (pos.y * self.width + pos.x) as usize
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Position::new(x, y)
    }

    /// Iterator over all tiles with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), cell))
    }

    /// Row-major chip flags
    pub fn chip_bits(&self) -> Vec<bool> {
        self.cells.iter().map(|cell| cell.has_chip).collect()
    }
}
