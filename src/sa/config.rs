//! SA configuration and cooling schedules.

use crate::error::InstanceError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the temperature falls after each Metropolis move.
///
/// # References
///
/// - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
/// - Lundy & Mees (1986), "Convergence of an annealing algorithm"
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoolingSchedule {
    /// `T <- alpha * T`. After `t` moves, `T = T_0 * alpha^t`.
    Geometric {
        /// In `(0, 1)`; closer to 1 cools more slowly.
        alpha: f64,
    },

    /// `T <- T / (1 + beta * T)`: large drops while hot, small ones near
    /// the floor.
    ///
    /// To land on `T_min` after `n` moves, use
    /// `beta = (T_0 - T_min) / (n * T_0 * T_min)`.
    LundyMees { beta: f64 },
}

impl CoolingSchedule {
    /// Next temperature after one step at `temperature`.
    pub fn cool(&self, temperature: f64) -> f64 {
        match *self {
            CoolingSchedule::Geometric { alpha } => alpha * temperature,
            CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
        }
    }
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.95 }
    }
}

/// Annealing parameters.
///
/// A run ends when the temperature reaches `min_temperature` or, if
/// `max_iterations` is non-zero, after that many moves. Starting at or
/// below the floor is allowed; such a run is done before its first move.
///
/// ```
/// use np_solvers::sa::{CoolingSchedule, SaConfig};
///
/// let slow = SaConfig::tour().with_cooling(CoolingSchedule::Geometric { alpha: 0.999 });
/// assert!(slow.validate().is_ok());
///
/// let cold = SaConfig::tour().with_initial_temperature(0.5);
/// assert!(cold.validate().is_ok());
///
/// let frozen = SaConfig::default().with_initial_temperature(0.0);
/// assert!(frozen.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaConfig {
    /// Starting temperature `T_0`.
    pub initial_temperature: f64,

    /// Done once the temperature is at or below this.
    pub min_temperature: f64,

    pub cooling: CoolingSchedule,

    /// Move budget. 0 = only the temperature floor stops the run.
    pub max_iterations: usize,

    /// `None` draws a seed from the OS.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            min_temperature: 1e-6,
            cooling: CoolingSchedule::default(),
            max_iterations: 0,
            seed: None,
        }
    }
}

impl SaConfig {
    /// Preset for the tour demo: `T_0 = 10000`, geometric cooling 0.995,
    /// floor 1.0 (about 1840 steps).
    pub fn tour() -> Self {
        Self {
            initial_temperature: 10_000.0,
            min_temperature: 1.0,
            cooling: CoolingSchedule::Geometric { alpha: 0.995 },
            ..Self::default()
        }
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), InstanceError> {
        if self.initial_temperature <= 0.0 || !self.initial_temperature.is_finite() {
            return Err(InstanceError::param(
                "initial_temperature",
                format!("must be positive and finite, got {}", self.initial_temperature),
            ));
        }
        if self.min_temperature <= 0.0 || self.min_temperature.is_nan() {
            return Err(InstanceError::param(
                "min_temperature",
                format!("must be positive, got {}", self.min_temperature),
            ));
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if alpha <= 0.0 || alpha >= 1.0 || alpha.is_nan() {
                    return Err(InstanceError::param(
                        "cooling",
                        format!("geometric alpha must be in (0, 1), got {alpha}"),
                    ));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if beta <= 0.0 || !beta.is_finite() {
                    return Err(InstanceError::param(
                        "cooling",
                        format!("lundy-mees beta must be positive, got {beta}"),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometric(alpha: f64) -> SaConfig {
        SaConfig::default().with_cooling(CoolingSchedule::Geometric { alpha })
    }

    #[test]
    fn test_defaults() {
        let config = SaConfig::default();
        assert_eq!(config.initial_temperature, 100.0);
        assert_eq!(config.min_temperature, 1e-6);
        assert_eq!(config.cooling, CoolingSchedule::Geometric { alpha: 0.95 });
        assert_eq!(config.max_iterations, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tour_preset() {
        let config = SaConfig::tour();
        assert_eq!(config.initial_temperature, 10_000.0);
        assert_eq!(config.min_temperature, 1.0);
        assert_eq!(config.cooling, CoolingSchedule::Geometric { alpha: 0.995 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_temperatures_must_be_positive() {
        for t0 in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            assert!(SaConfig::default().with_initial_temperature(t0).validate().is_err(), "T_0 = {t0}");
        }
        assert!(SaConfig::default().with_min_temperature(0.0).validate().is_err());
    }

    #[test]
    fn test_start_below_floor_is_valid() {
        assert!(SaConfig::tour().with_initial_temperature(0.5).validate().is_ok());
        assert!(SaConfig::default()
            .with_initial_temperature(5.0)
            .with_min_temperature(5.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_alpha_range_is_open() {
        assert!(geometric(0.0).validate().is_err());
        assert!(geometric(1.0).validate().is_err());
        assert!(geometric(f64::NAN).validate().is_err());
        assert!(geometric(0.999).validate().is_ok());
    }

    #[test]
    fn test_beta_must_be_positive() {
        for beta in [-0.5, 0.0, f64::INFINITY] {
            let config = SaConfig::default().with_cooling(CoolingSchedule::LundyMees { beta });
            assert!(config.validate().is_err(), "beta = {beta}");
        }
    }

    #[test]
    fn test_cool() {
        let halve = CoolingSchedule::Geometric { alpha: 0.5 };
        assert_eq!(halve.cool(8.0), 4.0);

        // 4 / (1 + 0.25 * 4) = 2
        let lundy = CoolingSchedule::LundyMees { beta: 0.25 };
        assert_eq!(lundy.cool(4.0), 2.0);
    }
}
