//! GA parameters and the subset-sum preset.

use super::selection::Selection;
use crate::error::InstanceError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Genetic algorithm parameters.
///
/// Lower fitness is better throughout. A run stops when
/// [`GaProblem::is_optimal`](super::GaProblem::is_optimal) accepts the
/// best fitness or after `max_generations` generations.
///
/// ```
/// use np_solvers::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(64)
///     .with_selection(Selection::Tournament(4))
///     .with_elitism_count(6)
///     .with_crossover_rate(0.75);
/// assert!(config.validate().is_ok());
/// assert!(config.with_elitism_count(63).validate().is_err());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaConfig {
    /// Individuals per generation.
    pub population_size: usize,

    pub max_generations: usize,

    pub selection: Selection,

    /// Best-ranked individuals carried over unchanged. Elites are not
    /// mutated and not re-evaluated.
    pub elitism_count: usize,

    /// Chance that two parents are recombined, in `[0, 1]`. Otherwise the
    /// first parent is cloned.
    pub crossover_rate: f64,

    /// Chance that an offspring is mutated, in `[0, 1]`.
    pub mutation_rate: f64,

    /// Evaluate offspring with rayon. Ignored without the `parallel` feature.
    pub parallel: bool,

    /// `None` draws a seed from the OS.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            selection: Selection::default(),
            elitism_count: 10,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            parallel: false,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Preset for subset-sum target matching.
    ///
    /// - Population: 50, Generations: 1000, Elites: 2
    /// - Uniform parent selection, crossover always, mutation 0.1
    pub fn subset_sum() -> Self {
        Self {
            population_size: 50,
            max_generations: 1000,
            selection: Selection::Uniform,
            elitism_count: 2,
            crossover_rate: 1.0,
            mutation_rate: 0.1,
            ..Self::default()
        }
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    pub fn with_elitism_count(mut self, n: usize) -> Self {
        self.elitism_count = n;
        self
    }

    /// Clamped to `[0, 1]`.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Clamped to `[0, 1]`.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks sizes and rates. Engines call this before the first step.
    pub fn validate(&self) -> Result<(), InstanceError> {
        if self.population_size < self.elitism_count + 2 {
            return Err(InstanceError::param(
                "population_size",
                format!(
                    "must be at least elitism_count + 2 = {}, got {}",
                    self.elitism_count + 2,
                    self.population_size
                ),
            ));
        }
        if self.max_generations == 0 {
            return Err(InstanceError::param("max_generations", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(InstanceError::param(
                "crossover_rate",
                format!("must be in [0, 1], got {}", self.crossover_rate),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(InstanceError::param(
                "mutation_rate",
                format!("must be in [0, 1], got {}", self.mutation_rate),
            ));
        }
        if self.selection == Selection::Tournament(0) {
            return Err(InstanceError::param("selection", "tournament size must be at least 1"));
        }
        Ok(())
    }
}
