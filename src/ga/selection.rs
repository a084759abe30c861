//! Parent selection.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::Individual;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How parents are drawn from the ranked previous generation.
///
/// Draws are with replacement; lower fitness wins a tournament.
///
/// ```
/// use np_solvers::ga::{GaConfig, Selection};
///
/// // Subset sum draws parents uniformly; elitism supplies the pressure.
/// assert_eq!(GaConfig::subset_sum().selection, Selection::Uniform);
/// assert_eq!(GaConfig::default().selection, Selection::Tournament(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Selection {
    /// Every individual equally likely.
    Uniform,

    /// Best of `k` uniform draws. `k = 1` is the same as `Uniform`.
    Tournament(usize),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Index of the chosen parent.
    ///
    /// # Panics
    /// Panics on an empty population.
    pub fn select<I: Individual, R: Rng>(&self, population: &[I], rng: &mut R) -> usize {
        assert!(!population.is_empty(), "selection needs a non-empty population");
        let n = population.len();
        match *self {
            Selection::Uniform => rng.random_range(0..n),
            Selection::Tournament(k) => {
                let mut winner = rng.random_range(0..n);
                for _ in 1..k {
                    let challenger = rng.random_range(0..n);
                    if population[challenger].fitness() < population[winner].fitness() {
                        winner = challenger;
                    }
                }
                winner
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[derive(Clone, Debug)]
    struct Scored(u64);

    impl Individual for Scored {
        type Fitness = u64;
        fn fitness(&self) -> u64 {
            self.0
        }
        fn set_fitness(&mut self, fitness: u64) {
            self.0 = fitness;
        }
    }

    fn histogram(selection: Selection, population: &[Scored], draws: usize) -> Vec<usize> {
        let mut rng = create_rng(42);
        let mut hits = vec![0; population.len()];
        for _ in 0..draws {
            hits[selection.select(population, &mut rng)] += 1;
        }
        hits
    }

    #[test]
    fn test_tournament_prefers_low_fitness() {
        let population = [Scored(40), Scored(25), Scored(3), Scored(31)];
        let hits = histogram(Selection::Tournament(4), &population, 8000);
        // P(index 2 in a 4-draw tournament) = 1 - (3/4)^4 ~ 0.68
        assert!(hits[2] > 4800, "lowest fitness picked {} of 8000 times", hits[2]);
        assert!(hits[0] < hits[2]);
    }

    #[test]
    fn test_uniform_spreads_evenly() {
        let population = [Scored(40), Scored(25), Scored(3), Scored(31)];
        let hits = histogram(Selection::Uniform, &population, 8000);
        assert!(hits.iter().all(|&h| (1600..2400).contains(&h)), "{hits:?}");
    }

    #[test]
    fn test_singleton_population() {
        let population = [Scored(9)];
        let mut rng = create_rng(1);
        assert_eq!(Selection::Uniform.select(&population, &mut rng), 0);
        assert_eq!(Selection::Tournament(5).select(&population, &mut rng), 0);
    }

    #[test]
    #[should_panic(expected = "non-empty population")]
    fn test_empty_population_panics() {
        let population: [Scored; 0] = [];
        Selection::Uniform.select(&population, &mut create_rng(0));
    }
}
