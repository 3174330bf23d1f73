//! Synchronous simulation state machine.
//!
//! [`Simulation`] owns the mutable state of one petri dish and applies user
//! events and generation ticks to it. It knows nothing about timers: the
//! outcomes it returns tell the driver whether a tick must be scheduled or
//! cancelled.

use crate::grid::OccupiedSet;
use crate::growth::{is_full, next_generation};
use crate::history::GenerationHistory;
use petri_core::{clamp_grid_size, clamp_growth_interval, Coordinate, GrowthConfig, Phase};
use serde::{Deserialize, Serialize};
use tracing::{debug, event, info, instrument, Level};

/// Snapshot of everything a presentation needs to render
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    pub occupied: OccupiedSet,
    pub running: bool,
    pub config: GrowthConfig,
    pub history: GenerationHistory,
}

impl SimulationState {
    pub fn new(config: GrowthConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::from_running(self.running)
    }

    pub fn is_full(&self) -> bool {
        is_full(&self.occupied, self.config.grid_size)
    }

    /// Number of completed generations since the last reset or resize
    pub fn generation(&self) -> usize {
        self.history.len()
    }
}

/// Result of a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Idle to Running; the driver must schedule a tick
    Started,
    AlreadyRunning,
    /// The grid is already full; nothing to grow
    AlreadyFull,
}

/// Result of applying one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A generation was recorded and more growth is possible
    Advanced { occupied: usize },
    /// A generation was recorded and filled the grid; the simulation stopped
    Completed { occupied: usize },
    /// The simulation was idle; nothing changed
    Ignored,
}

impl TickOutcome {
    /// Whether the driver should schedule another tick
    pub fn continues(&self) -> bool {
        matches!(self, TickOutcome::Advanced { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Simulation {
    state: SimulationState,
}

impl Simulation {
    pub fn new(config: GrowthConfig) -> Self {
        let config = GrowthConfig::new(config.grid_size, config.growth_interval_ms);
        Self {
            state: SimulationState::new(config),
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> GrowthConfig {
        self.state.config
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    #[instrument(skip(self), fields(occupied = self.state.occupied.len()))]
    pub fn start(&mut self) -> StartOutcome {
        if self.state.running {
            return StartOutcome::AlreadyRunning;
        }
        if self.state.is_full() {
            info!(event = "start_on_full", "Grid already full, not starting");
            return StartOutcome::AlreadyFull;
        }
        self.state.running = true;
        debug!("Simulation started");
        StartOutcome::Started
    }

    /// Returns `true` if the simulation was running
    pub fn pause(&mut self) -> bool {
        let was_running = std::mem::replace(&mut self.state.running, false);
        if was_running {
            debug!(generation = self.state.generation(), "Simulation paused");
        }
        was_running
    }

    /// Apply one generation step if running
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            debug!("Tick while idle ignored");
            return TickOutcome::Ignored;
        }

        let grid_size = self.state.config.grid_size;
        debug_assert!(self.state.occupied.within_bounds(grid_size));
        let next = next_generation(&self.state.occupied, grid_size);
        let occupied = next.len();
        self.state.history.record(occupied);
        self.state.occupied = next;

        debug!(
            event = "generation_advanced",
            generation = self.state.generation(),
            occupied,
            "Generation advanced"
        );

        if is_full(&self.state.occupied, grid_size) {
            self.state.running = false;
            info!(
                event = "grid_full",
                generations = self.state.generation(),
                occupied,
                grid_size,
                "Grid full, simulation stopped"
            );
            event!(
                Level::INFO,
                gauge_name = "generations_to_fill",
                gauge_value = self.state.generation(),
                "Generations to fill gauge"
            );
            return TickOutcome::Completed { occupied };
        }

        TickOutcome::Advanced { occupied }
    }

    /// Stop and clear the board. Returns `true` if the simulation was running.
    pub fn reset(&mut self) -> bool {
        let was_running = self.pause();
        self.state.occupied.clear();
        self.state.history.clear();
        debug!(event = "reset", "Simulation reset");
        was_running
    }

    /// Flip a cell. Returns the new occupancy, or `None` when out of bounds.
    ///
    /// A toggle that completes the grid while running stops the simulation
    /// without recording a generation.
    pub fn toggle_cell(&mut self, x: i32, y: i32) -> Option<bool> {
        let cell = Coordinate::new(x, y);
        if !self.state.config.contains(cell) {
            debug!(x, y, grid_size = self.state.config.grid_size, "Ignoring out-of-bounds toggle");
            return None;
        }
        let occupied = self.state.occupied.toggle(cell);
        if self.state.running && self.state.is_full() {
            self.state.running = false;
            info!(
                event = "grid_full",
                generations = self.state.generation(),
                occupied = self.state.occupied.len(),
                grid_size = self.state.config.grid_size,
                "Grid filled by toggle, simulation stopped"
            );
        }
        Some(occupied)
    }

    /// Change the tick interval; takes effect when the next tick is scheduled
    pub fn set_growth_interval(&mut self, interval_ms: u64) -> u64 {
        let interval_ms = clamp_growth_interval(interval_ms);
        self.state.config.growth_interval_ms = interval_ms;
        debug!(interval_ms, "Growth interval updated");
        interval_ms
    }

    /// Resize the grid, clearing the board. The running flag is preserved.
    pub fn set_grid_size(&mut self, grid_size: u32) -> u32 {
        let grid_size = clamp_grid_size(grid_size);
        self.state.config.grid_size = grid_size;
        self.state.occupied.clear();
        self.state.history.clear();
        info!(event = "resize", grid_size, running = self.state.running, "Grid resized");
        grid_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(grid_size: u32) -> Simulation {
        Simulation::new(GrowthConfig {
            grid_size,
            growth_interval_ms: 100,
        })
    }

    #[test]
    fn test_default_state() {
        let sim = Simulation::new(GrowthConfig::default());
        let state = sim.state();
        assert!(state.occupied.is_empty());
        assert!(!state.running);
        assert_eq!(state.config.grid_size, 20);
        assert_eq!(state.config.growth_interval_ms, 1000);
        assert!(state.history.is_empty());
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_two_by_two_fills_and_stops() {
        let mut sim = small(2);
        assert_eq!(sim.toggle_cell(0, 0), Some(true));
        assert_eq!(sim.start(), StartOutcome::Started);

        assert_eq!(sim.tick(), TickOutcome::Advanced { occupied: 3 });
        assert!(sim.is_running());
        assert_eq!(sim.tick(), TickOutcome::Completed { occupied: 4 });
        assert!(!sim.is_running());
        assert_eq!(sim.tick(), TickOutcome::Ignored);

        let state = sim.state();
        assert!(state.is_full());
        assert_eq!(state.occupied.len(), 4);
        assert_eq!(state.history.as_slice(), &[3, 4]);
    }

    #[test]
    fn test_start_on_full_grid_records_nothing() {
        let mut sim = small(1);
        sim.toggle_cell(0, 0);
        assert_eq!(sim.start(), StartOutcome::AlreadyFull);
        assert!(!sim.is_running());
        assert!(sim.state().history.is_empty());

        assert_eq!(sim.start(), StartOutcome::AlreadyFull);
        assert!(sim.state().history.is_empty());
    }

    #[test]
    fn test_start_twice() {
        let mut sim = small(5);
        assert_eq!(sim.start(), StartOutcome::Started);
        assert_eq!(sim.start(), StartOutcome::AlreadyRunning);
    }

    #[test]
    fn test_empty_grid_keeps_running() {
        let mut sim = small(3);
        sim.start();
        assert_eq!(sim.tick(), TickOutcome::Advanced { occupied: 0 });
        assert_eq!(sim.tick(), TickOutcome::Advanced { occupied: 0 });
        assert!(sim.is_running());
        assert_eq!(sim.state().history.as_slice(), &[0, 0]);
    }

    #[test]
    fn test_pause_stops_ticks() {
        let mut sim = small(5);
        sim.toggle_cell(2, 2);
        sim.start();
        sim.tick();
        assert!(sim.pause());
        assert!(!sim.pause());
        assert_eq!(sim.tick(), TickOutcome::Ignored);
        assert_eq!(sim.state().generation(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut sim = small(5);
        sim.toggle_cell(1, 1);
        sim.start();
        sim.tick();
        assert!(sim.reset());

        let state = sim.state();
        assert!(state.occupied.is_empty());
        assert!(state.history.is_empty());
        assert!(!state.running);
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let mut sim = small(5);
        sim.toggle_cell(1, 1);
        let before = sim.state().occupied.clone();

        assert_eq!(sim.toggle_cell(3, 4), Some(true));
        assert_eq!(sim.toggle_cell(3, 4), Some(false));
        assert_eq!(sim.state().occupied, before);
    }

    #[test]
    fn test_toggle_out_of_bounds_ignored() {
        let mut sim = small(5);
        assert_eq!(sim.toggle_cell(5, 0), None);
        assert_eq!(sim.toggle_cell(0, -1), None);
        assert!(sim.state().occupied.is_empty());
    }

    #[test]
    fn test_toggle_while_running_keeps_history() {
        let mut sim = small(5);
        sim.toggle_cell(0, 0);
        sim.start();
        sim.tick();
        sim.toggle_cell(4, 4);
        assert!(sim.is_running());
        assert_eq!(sim.state().history.as_slice(), &[3]);
        assert_eq!(sim.state().occupied.len(), 4);
    }

    #[test]
    fn test_toggle_filling_grid_stops_without_generation() {
        let mut sim = small(2);
        sim.toggle_cell(0, 0);
        sim.start();
        sim.toggle_cell(1, 0);
        sim.toggle_cell(0, 1);
        assert!(sim.is_running());

        assert_eq!(sim.toggle_cell(1, 1), Some(true));
        assert!(!sim.is_running());
        assert!(sim.state().is_full());
        assert!(sim.state().history.is_empty());
        assert_eq!(sim.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_toggle_filling_idle_grid_stays_idle() {
        let mut sim = small(1);
        assert_eq!(sim.toggle_cell(0, 0), Some(true));
        assert!(!sim.is_running());
        assert_eq!(sim.start(), StartOutcome::AlreadyFull);
    }

    #[test]
    fn test_set_growth_interval_clamps_zero() {
        let mut sim = small(5);
        sim.toggle_cell(0, 0);
        assert_eq!(sim.set_growth_interval(0), 1);
        assert_eq!(sim.set_growth_interval(300), 300);
        assert_eq!(sim.config().growth_interval_ms, 300);
        assert_eq!(sim.state().occupied.len(), 1);
    }

    #[test]
    fn test_set_grid_size_clears_board_but_keeps_running() {
        let mut sim = small(5);
        sim.toggle_cell(4, 4);
        sim.start();
        sim.tick();

        assert_eq!(sim.set_grid_size(3), 3);
        let state = sim.state();
        assert!(state.occupied.is_empty());
        assert!(state.history.is_empty());
        assert!(state.running);
        assert_eq!(state.config.grid_size, 3);

        assert_eq!(sim.set_grid_size(0), 1);
        assert_eq!(sim.toggle_cell(1, 0), None);
    }

    #[test]
    fn test_state_serializes() {
        let mut sim = small(2);
        sim.toggle_cell(1, 0);
        let json = serde_json::to_value(sim.state()).unwrap();
        assert_eq!(json["running"], false);
        assert_eq!(json["config"]["grid_size"], 2);
        assert_eq!(json["occupied"][0]["x"], 1);
        assert_eq!(json["history"].as_array().unwrap().len(), 0);
    }
}
