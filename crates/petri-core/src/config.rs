//! Configuration types for the simulation.

use crate::{Coordinate, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Smallest grid the core accepts
pub const MIN_GRID_SIZE: u32 = 1;
/// Largest grid the core accepts
pub const MAX_GRID_SIZE: u32 = 1024;
/// Shortest tick interval (milliseconds)
pub const MIN_GROWTH_INTERVAL_MS: u64 = 1;
/// Longest tick interval (milliseconds)
pub const MAX_GROWTH_INTERVAL_MS: u64 = 60 * 60 * 1000;

/// Grid sizes a presentation should offer
pub const ADVERTISED_GRID_SIZES: std::ops::RangeInclusive<u32> = 10..=50;
/// Smallest interval a presentation should offer, in steps of the same amount
pub const ADVERTISED_INTERVAL_STEP_MS: u64 = 100;

/// Growth parameters for a single petri dish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Side length of the square grid
    pub grid_size: u32,
    /// Delay between generations (milliseconds)
    pub growth_interval_ms: u64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            growth_interval_ms: 1000,
        }
    }
}

impl GrowthConfig {
    pub fn new(grid_size: u32, growth_interval_ms: u64) -> Self {
        Self {
            grid_size: clamp_grid_size(grid_size),
            growth_interval_ms: clamp_growth_interval(growth_interval_ms),
        }
    }

    pub fn growth_interval(&self) -> Duration {
        Duration::from_millis(self.growth_interval_ms)
    }

    /// Number of cells in a full grid
    pub fn capacity(&self) -> usize {
        let side = self.grid_size as usize;
        side * side
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.in_bounds(self.grid_size)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(Error::Validation(format!(
                "grid_size must be between {} and {}, got {}",
                MIN_GRID_SIZE, MAX_GRID_SIZE, self.grid_size
            )));
        }
        if !(MIN_GROWTH_INTERVAL_MS..=MAX_GROWTH_INTERVAL_MS).contains(&self.growth_interval_ms) {
            return Err(Error::Validation(format!(
                "growth_interval_ms must be between {} and {}, got {}",
                MIN_GROWTH_INTERVAL_MS, MAX_GROWTH_INTERVAL_MS, self.growth_interval_ms
            )));
        }
        Ok(())
    }
}

/// Clamp a requested grid size into the accepted range
pub fn clamp_grid_size(requested: u32) -> u32 {
    let clamped = requested.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
    if clamped != requested {
        warn!(requested, clamped, "grid size out of range, clamping");
    }
    clamped
}

/// Clamp a requested tick interval into the accepted range
pub fn clamp_growth_interval(requested_ms: u64) -> u64 {
    let clamped = requested_ms.clamp(MIN_GROWTH_INTERVAL_MS, MAX_GROWTH_INTERVAL_MS);
    if clamped != requested_ms {
        warn!(requested_ms, clamped, "growth interval out of range, clamping");
    }
    clamped
}

/// Log output format for the runner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Terminal runner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Initial growth parameters
    pub growth: GrowthConfig,
    /// Log output format
    pub log_format: LogFormat,
    /// Cells occupied before the first generation
    pub seed_cells: Vec<Coordinate>,
    /// Start growing immediately after seeding
    pub autostart: bool,
    /// Draw the grid after every state change
    pub render: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            growth: GrowthConfig::default(),
            log_format: LogFormat::default(),
            seed_cells: Vec::new(),
            autostart: false,
            render: true,
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: RunnerConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.growth.validate()?;
        if let Some(cell) = self
            .seed_cells
            .iter()
            .find(|cell| !self.growth.contains(**cell))
        {
            return Err(Error::Validation(format!(
                "seed cell ({}) lies outside a {}x{} grid",
                cell, self.growth.grid_size, self.growth.grid_size
            )));
        }
        Ok(())
    }
}
