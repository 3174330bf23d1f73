//! Sparse set of occupied cells.

use petri_core::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of occupied coordinates.
///
/// Backed by an ordered set so iteration and serialization are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccupiedSet {
    cells: BTreeSet<Coordinate>,
}

impl OccupiedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every coordinate of a `grid_size` x `grid_size` grid
    pub fn full(grid_size: u32) -> Self {
        let side = i32::try_from(grid_size).unwrap_or(i32::MAX);
        (0..side)
            .flat_map(|y| (0..side).map(move |x| Coordinate::new(x, y)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.cells.contains(&coordinate)
    }

    /// Flip membership of `coordinate`, returning whether it is now occupied
    pub fn toggle(&mut self, coordinate: Coordinate) -> bool {
        if self.cells.remove(&coordinate) {
            false
        } else {
            self.cells.insert(coordinate);
            true
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.cells.iter().copied()
    }

    pub fn is_subset(&self, other: &OccupiedSet) -> bool {
        self.cells.is_subset(&other.cells)
    }

    /// Coordinates present in `self` but not in `other`
    pub fn difference<'a>(&'a self, other: &'a OccupiedSet) -> impl Iterator<Item = Coordinate> + 'a {
        self.cells.difference(&other.cells).copied()
    }

    /// Whether every coordinate lies within `[0, grid_size)` on both axes
    pub fn within_bounds(&self, grid_size: u32) -> bool {
        self.cells.iter().all(|cell| cell.in_bounds(grid_size))
    }
}

impl FromIterator<Coordinate> for OccupiedSet {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Extend<Coordinate> for OccupiedSet {
    fn extend<I: IntoIterator<Item = Coordinate>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}

impl IntoIterator for OccupiedSet {
    type Item = Coordinate;
    type IntoIter = std::collections::btree_set::IntoIter<Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl<'a> IntoIterator for &'a OccupiedSet {
    type Item = &'a Coordinate;
    type IntoIter = std::collections::btree_set::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_self_inverse() {
        let mut cells: OccupiedSet = [Coordinate::new(1, 1)].into_iter().collect();
        let original = cells.clone();

        assert!(cells.toggle(Coordinate::new(2, 3)));
        assert!(cells.contains(Coordinate::new(2, 3)));
        assert!(!cells.toggle(Coordinate::new(2, 3)));
        assert_eq!(cells, original);
    }

    #[test]
    fn test_no_duplicates() {
        let mut cells: OccupiedSet = [Coordinate::new(0, 0), Coordinate::new(0, 0)].into_iter().collect();
        assert_eq!(cells.len(), 1);
        cells.extend([Coordinate::new(0, 0)]);
        assert_eq!(cells.len(), 1);
    }

    #[test]
    fn test_extend_from_owned_set() {
        let mut cells: OccupiedSet = [Coordinate::new(0, 0), Coordinate::new(1, 0)].into_iter().collect();
        let more: OccupiedSet = [Coordinate::new(1, 0), Coordinate::new(0, 1)].into_iter().collect();
        cells.extend(more);
        assert_eq!(cells.len(), 3);
        assert!(cells.contains(Coordinate::new(0, 1)));
    }

    #[test]
    fn test_full_grid() {
        let full = OccupiedSet::full(3);
        assert_eq!(full.len(), 9);
        assert!(full.within_bounds(3));
        assert!(!full.within_bounds(2));
        assert!(OccupiedSet::full(0).is_empty());
    }

    #[test]
    fn test_iterates_in_sorted_order() {
        let cells: OccupiedSet = [Coordinate::new(2, 0), Coordinate::new(0, 1), Coordinate::new(0, 0)]
            .into_iter()
            .collect();
        let order: Vec<Coordinate> = cells.into_iter().collect();
        assert_eq!(order, vec![Coordinate::new(0, 0), Coordinate::new(0, 1), Coordinate::new(2, 0)]);
    }

    #[test]
    fn test_serializes_as_list() {
        let cells: OccupiedSet = [Coordinate::new(1, 2)].into_iter().collect();
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[{"x":1,"y":2}]"#);
    }
}
