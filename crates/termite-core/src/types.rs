//! Core type definitions for the simulation.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wrap a coordinate onto `[0, dim)` using the double-modulo rule.
///
/// Holds for negative and positive `v`. `dim` must be positive. The sum is
/// taken in `i64` so dimensions above `i32::MAX / 2` cannot overflow.
pub fn wrap(v: i32, dim: i32) -> i32 {
    let (v, dim) = (i64::from(v), i64::from(dim));
    (((v % dim) + dim) % dim) as i32
}

/// 2D position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Apply toroidal wrapping for given world dimensions
    pub fn wrap(&self, width: i32, height: i32) -> Self {
        Self {
            x: wrap(self.x, width),
            y: wrap(self.y, height),
        }
    }

    /// Unit step in `direction`, unwrapped.
    pub fn offset(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.to_delta();
        self.add(dx, dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the eight Moore-neighbourhood directions.
///
/// Discriminants run clockwise from north-west:
///
/// ```text
///  0 | 1 | 2
///  7 |   | 3
///  6 | 5 | 4
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    NorthWest = 0,
    North = 1,
    NorthEast = 2,
    East = 3,
    SouthEast = 4,
    South = 5,
    SouthWest = 6,
    West = 7,
}

use Direction::*;

const FORWARD_NW: [Direction; 5] = [SouthWest, West, NorthEast, North, NorthWest];
const FORWARD_N: [Direction; 3] = [NorthWest, North, NorthEast];
const FORWARD_NE: [Direction; 5] = [SouthEast, East, NorthEast, NorthWest, North];
const FORWARD_E: [Direction; 3] = [NorthEast, East, SouthEast];
const FORWARD_SE: [Direction; 5] = [SouthWest, South, SouthEast, East, NorthEast];
const FORWARD_S: [Direction; 3] = [SouthWest, South, SouthEast];
// SouthWest is listed twice and is drawn with double weight.
const FORWARD_SW: [Direction; 5] = [NorthWest, SouthEast, SouthWest, SouthWest, West];
const FORWARD_W: [Direction; 3] = [NorthWest, SouthWest, West];

impl Direction {
    pub const COUNT: usize = 8;

    pub fn all() -> [Direction; 8] {
        [
            NorthWest, North, NorthEast, East, SouthEast, South, SouthWest, West,
        ]
    }

    pub fn from_index(index: u8) -> Option<Direction> {
        Self::all().get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            NorthWest => (-1, -1),
            North => (0, -1),
            NorthEast => (1, -1),
            East => (1, 0),
            SouthEast => (1, 1),
            South => (0, 1),
            SouthWest => (-1, 1),
            West => (-1, 0),
        }
    }

    /// The direction rotated by 180 degrees.
    pub fn opposite(self) -> Direction {
        match self {
            NorthWest => SouthEast,
            North => South,
            NorthEast => SouthWest,
            East => West,
            SouthEast => NorthWest,
            South => North,
            SouthWest => NorthEast,
            West => East,
        }
    }

    /// Candidate table used by [`Direction::forward_bias`] for a termite
    /// currently facing `self`. Repeated entries weigh more.
    pub fn forward_candidates(self) -> &'static [Direction] {
        match self {
            NorthWest => &FORWARD_NW,
            North => &FORWARD_N,
            NorthEast => &FORWARD_NE,
            East => &FORWARD_E,
            SouthEast => &FORWARD_SE,
            South => &FORWARD_S,
            SouthWest => &FORWARD_SW,
            West => &FORWARD_W,
        }
    }

    /// Pick uniformly from this direction's forward candidate table.
    pub fn forward_bias<R: Rng + ?Sized>(self, rng: &mut R) -> Direction {
        let candidates = self.forward_candidates();
        // Tables are non-empty constants.
        *candidates.choose(rng).unwrap_or(&self)
    }

    /// Uniformly random direction.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Direction {
        Self::all()[rng.gen_range(0..Self::COUNT)]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NorthWest => "NW",
            North => "N",
            NorthEast => "NE",
            East => "E",
            SouthEast => "SE",
            South => "S",
            SouthWest => "SW",
            West => "W",
        };
        f.write_str(name)
    }
}
