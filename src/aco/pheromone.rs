//! Dense (vertex, color) pheromone matrix.

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pheromone weights indexed by `(vertex, color)`, stored row-major.
///
/// Entries start at 1.0 and only change through [`deposit`](Self::deposit)
/// (positive amounts) and [`evaporate`](Self::evaporate) (decay with a
/// positive floor), so they stay strictly positive.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PheromoneTable {
    colors: usize,
    values: Vec<f64>,
}

impl PheromoneTable {
    pub fn new(vertices: usize, colors: usize) -> Self {
        Self {
            colors,
            values: vec![1.0; vertices * colors],
        }
    }

    pub fn vertices(&self) -> usize {
        if self.colors == 0 {
            0
        } else {
            self.values.len() / self.colors
        }
    }

    pub fn colors(&self) -> usize {
        self.colors
    }

    pub fn get(&self, vertex: usize, color: usize) -> f64 {
        self.values[vertex * self.colors + color]
    }

    /// Pheromone of every color at `vertex`.
    pub fn row(&self, vertex: usize) -> &[f64] {
        let start = vertex * self.colors;
        &self.values[start..start + self.colors]
    }

    /// Adds `amount` to one entry.
    ///
    /// # Panics
    /// Panics (debug) if `amount` is not positive.
    pub fn deposit(&mut self, vertex: usize, color: usize, amount: f64) {
        debug_assert!(amount > 0.0, "deposit must be positive, got {amount}");
        self.values[vertex * self.colors + color] += amount;
    }

    /// Multiplies every entry by `1 - rate`, then raises it to at least `floor`.
    pub fn evaporate(&mut self, rate: f64, floor: f64) {
        let keep = 1.0 - rate;
        for value in &mut self.values {
            *value = (*value * keep).max(floor);
        }
    }

    /// Smallest entry, or `+inf` for an empty table.
    pub fn min_value(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Samples a color for `vertex` from `candidates` with probability
    /// proportional to pheromone.
    ///
    /// Returns `None` if `candidates` is empty.
    pub fn sample<R: Rng>(&self, vertex: usize, candidates: &[usize], rng: &mut R) -> Option<usize> {
        let row = self.row(vertex);
        let total: f64 = candidates.iter().map(|&c| row[c]).sum();
        if candidates.is_empty() || total <= 0.0 {
            return None;
        }

        let threshold = rng.random_range(0.0..total);
        let mut cumulative = 0.0;
        for &c in candidates {
            cumulative += row[c];
            if cumulative > threshold {
                return Some(c);
            }
        }

        candidates.last().copied() // floating-point fallback
    }
}
