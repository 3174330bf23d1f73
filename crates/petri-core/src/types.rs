//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell position on the grid.
///
/// Coordinates are signed so that neighbour arithmetic can step off the
/// edge of the grid; callers bounds-check with [`Coordinate::in_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Neighbouring coordinate one step in `direction`
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.to_delta();
        self.add(dx, dy)
    }

    /// Whether the coordinate lies within `[0, grid_size)` on both axes
    pub fn in_bounds(&self, grid_size: u32) -> bool {
        let size = i64::from(grid_size);
        (0..size).contains(&i64::from(self.x)) && (0..size).contains(&i64::from(self.y))
    }

    /// Manhattan distance to another coordinate
    pub fn manhattan_distance(&self, other: &Coordinate) -> u64 {
        (i64::from(self.x) - i64::from(other.x)).unsigned_abs()
            + (i64::from(self.y) - i64::from(other.y)).unsigned_abs()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Cardinal growth direction. Diagonals never take part in growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    pub fn all() -> [Direction; 4] {
        [Direction::Left, Direction::Right, Direction::Up, Direction::Down]
    }
}

/// Run state of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Running,
}

impl Phase {
    pub fn from_running(running: bool) -> Self {
        if running {
            Phase::Running
        } else {
            Phase::Idle
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Running => write!(f, "running"),
        }
    }
}
