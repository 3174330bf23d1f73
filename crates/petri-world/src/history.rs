//! Per-generation occupancy history.

use serde::{Deserialize, Serialize};

/// Occupied-cell count recorded after each generation, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationHistory {
    counts: Vec<usize>,
}

impl GenerationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, occupied: usize) {
        self.counts.push(occupied);
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.counts
    }

    /// `(generation, count)` pairs with generations numbered from 1
    pub fn generations(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(index, count)| (index + 1, *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_clear() {
        let mut history = GenerationHistory::new();
        history.record(5);
        history.record(13);

        assert_eq!(history.len(), 2);
        assert_eq!(history.as_slice(), &[5, 13]);
        assert_eq!(history.generations().collect::<Vec<_>>(), vec![(1, 5), (2, 13)]);

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.generations().count(), 0);
    }
}
