//! Plain-text rendering of a simulation snapshot.

use petri_core::Coordinate;
use petri_world::SimulationState;
use std::fmt::Write;

const OCCUPIED: char = '#';
const EMPTY: char = '.';

/// Status line, grid and growth history
pub fn frame(state: &SimulationState) -> String {
    let mut out = String::new();
    out.push_str(&status_line(state));
    out.push('\n');
    out.push_str(&grid(state));
    out.push_str(&history(state));
    out
}

pub fn status_line(state: &SimulationState) -> String {
    let config = &state.config;
    let mut line = format!(
        "[{}] generation {} | {}/{} cells | {}x{} | every {} ms",
        state.phase(),
        state.generation(),
        state.occupied.len(),
        config.capacity(),
        config.grid_size,
        config.grid_size,
        config.growth_interval_ms,
    );
    if state.is_full() {
        line.push_str(" | full");
    }
    line
}

/// One text row per grid row, `x` increasing to the right
pub fn grid(state: &SimulationState) -> String {
    let side = i32::try_from(state.config.grid_size).unwrap_or(i32::MAX);
    let mut out = String::with_capacity(state.config.capacity() + side.max(0) as usize);
    for y in 0..side {
        for x in 0..side {
            let cell = if state.occupied.contains(Coordinate::new(x, y)) {
                OCCUPIED
            } else {
                EMPTY
            };
            out.push(cell);
        }
        out.push('\n');
    }
    out
}

pub fn history(state: &SimulationState) -> String {
    let mut out = String::new();
    if state.history.is_empty() {
        return out;
    }
    out.push_str("Growth history\n");
    for (generation, count) in state.history.generations() {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "  Generation {generation}: {count} cells");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use petri_core::GrowthConfig;
    use petri_world::Simulation;

    #[test]
    fn test_grid_layout() {
        let mut sim = Simulation::new(GrowthConfig {
            grid_size: 3,
            growth_interval_ms: 100,
        });
        sim.toggle_cell(2, 0);
        sim.toggle_cell(0, 1);

        assert_eq!(grid(sim.state()), "..#\n#..\n...\n");
    }

    #[test]
    fn test_frame_with_history() {
        let mut sim = Simulation::new(GrowthConfig {
            grid_size: 3,
            growth_interval_ms: 500,
        });
        sim.toggle_cell(1, 1);
        sim.start();
        sim.tick();

        let text = frame(sim.state());
        assert!(text.starts_with("[running] generation 1 | 5/9 cells | 3x3 | every 500 ms\n"));
        assert!(text.contains(".#.\n###\n.#.\n"));
        assert!(text.contains("Generation 1: 5 cells"));
    }

    #[test]
    fn test_full_status() {
        let mut sim = Simulation::new(GrowthConfig {
            grid_size: 2,
            growth_interval_ms: 100,
        });
        sim.toggle_cell(0, 0);
        sim.start();
        sim.tick();
        sim.tick();

        let line = status_line(sim.state());
        assert_eq!(line, "[idle] generation 2 | 4/4 cells | 2x2 | every 100 ms | full");
    }

    #[test]
    fn test_empty_history_renders_nothing() {
        let sim = Simulation::new(GrowthConfig::default());
        assert!(history(sim.state()).is_empty());
    }
}
