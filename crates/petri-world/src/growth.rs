//! Single-step growth rule.

use crate::grid::OccupiedSet;
use petri_core::{Coordinate, Direction};

/// Advance `occupied` by one generation.
///
/// Every occupied cell spreads to its four cardinal neighbours that lie inside
/// the `grid_size` x `grid_size` grid. Existing cells are always kept, so the
/// result is a superset of the input. Out-of-bounds input cells are carried
/// over unchanged and only their in-bounds neighbours are added.
pub fn next_generation(occupied: &OccupiedSet, grid_size: u32) -> OccupiedSet {
    let mut next = occupied.clone();
    next.extend(frontier(occupied, grid_size));
    next
}

/// Cells the next generation would add to `occupied`
pub fn frontier(occupied: &OccupiedSet, grid_size: u32) -> OccupiedSet {
    occupied
        .iter()
        .flat_map(|cell| Direction::all().into_iter().map(move |d| cell.step(d)))
        .filter(|neighbor| neighbor.in_bounds(grid_size) && !occupied.contains(*neighbor))
        .collect()
}

/// Whether `occupied` covers the whole grid
pub fn is_full(occupied: &OccupiedSet, grid_size: u32) -> bool {
    let side = grid_size as usize;
    occupied.len() >= side * side && covers(occupied, grid_size)
}

fn covers(occupied: &OccupiedSet, grid_size: u32) -> bool {
    let side = i32::try_from(grid_size).unwrap_or(i32::MAX);
    (0..side).all(|y| (0..side).all(|x| occupied.contains(Coordinate::new(x, y))))
}
