//! Petri dish growth engine.
//!
//! This module implements the occupied-cell set, the single-step growth
//! rule, and the timer-driven controller that advances it.

pub mod grid;
pub mod history;
pub mod growth;
pub mod simulation;
pub mod controller;

pub use grid::OccupiedSet;
pub use history::GenerationHistory;
pub use growth::{frontier, is_full, next_generation};
pub use simulation::{Simulation, SimulationState, StartOutcome, TickOutcome};
pub use controller::SimulationController;
