//! ACO configuration.

use crate::error::InstanceError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which colors an ant may pick for a vertex.
///
/// The two rules are different search strategies and are never mixed
/// within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColorChoice {
    /// Every color is a candidate, weighted by the vertex's pheromone only.
    /// Conflicts are discouraged solely through the cost-scaled deposit.
    #[default]
    PheromoneOnly,

    /// Colors already held by colored neighbors are excluded. If that
    /// leaves nothing, a color is drawn uniformly from all colors.
    AvoidNeighborColors,
}

/// Configuration for [`AntColonyColorer`](super::AntColonyColorer).
///
/// Defaults follow the interactive demo: 10 ants, 10 colors, evaporation
/// rate 0.5.
///
/// # Examples
///
/// ```
/// use np_solvers::aco::{AcoConfig, ColorChoice};
///
/// let config = AcoConfig::default()
///     .with_num_ants(20)
///     .with_max_colors(4)
///     .with_evaporation_rate(0.1)
///     .with_choice(ColorChoice::AvoidNeighborColors)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcoConfig {
    /// Colorings constructed per round.
    pub num_ants: usize,

    /// Colors `0..max_colors` are available.
    pub max_colors: usize,

    /// Fraction of every pheromone entry removed once per round, in `[0, 1]`.
    pub evaporation_rate: f64,

    /// Round budget.
    pub max_rounds: usize,

    /// Lower bound applied after evaporation so entries stay positive even
    /// at `evaporation_rate = 1.0`. The default, `f64::MIN_POSITIVE`, is
    /// far below anything reachable in practical round counts, so decay is
    /// exactly geometric until then.
    pub min_pheromone: f64,

    /// Candidate color rule.
    pub choice: ColorChoice,

    /// Random seed. `None` draws one.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            num_ants: 10,
            max_colors: 10,
            evaporation_rate: 0.5,
            max_rounds: 100,
            min_pheromone: f64::MIN_POSITIVE,
            choice: ColorChoice::default(),
            seed: None,
        }
    }
}

impl AcoConfig {
    pub fn with_num_ants(mut self, n: usize) -> Self {
        self.num_ants = n;
        self
    }

    pub fn with_max_colors(mut self, k: usize) -> Self {
        self.max_colors = k;
        self
    }

    pub fn with_evaporation_rate(mut self, rate: f64) -> Self {
        self.evaporation_rate = rate;
        self
    }

    pub fn with_max_rounds(mut self, n: usize) -> Self {
        self.max_rounds = n;
        self
    }

    pub fn with_min_pheromone(mut self, floor: f64) -> Self {
        self.min_pheromone = floor;
        self
    }

    pub fn with_choice(mut self, choice: ColorChoice) -> Self {
        self.choice = choice;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), InstanceError> {
        if self.num_ants == 0 {
            return Err(InstanceError::param("num_ants", "must be at least 1"));
        }
        if self.max_colors == 0 {
            return Err(InstanceError::param("max_colors", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.evaporation_rate) {
            return Err(InstanceError::param(
                "evaporation_rate",
                format!("must be in [0, 1], got {}", self.evaporation_rate),
            ));
        }
        if self.max_rounds == 0 {
            return Err(InstanceError::param("max_rounds", "must be at least 1"));
        }
        if self.min_pheromone <= 0.0 || !self.min_pheromone.is_finite() {
            return Err(InstanceError::param(
                "min_pheromone",
                format!("must be positive, got {}", self.min_pheromone),
            ));
        }
        Ok(())
    }
}
