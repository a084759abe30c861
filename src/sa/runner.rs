//! SA execution loop.
//!
//! [`SaEngine`] performs one Metropolis move per [`step`](SaEngine::step)
//! and cools once afterwards. [`SaRunner`] drives an engine to completion.

use super::config::SaConfig;
use super::types::SaProblem;
use crate::driver::{Progress, Stepper};
use crate::error::InstanceError;
use crate::random::rng_from_seed;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Best cost is sampled into [`SaResult::cost_history`] this often.
const HISTORY_INTERVAL: usize = 100;

/// Everything an annealing run carries between steps besides its RNG.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnealingState<S> {
    pub current: S,
    pub current_cost: f64,
    pub best: S,
    pub best_cost: f64,

    /// Never increases; strictly positive.
    pub temperature: f64,

    /// Neighbor evaluations so far.
    pub iterations: usize,

    /// Accepted moves, improving ones included.
    pub accepted: usize,

    /// Strictly improving moves.
    pub improving: usize,
}

/// Per-step output of an [`SaEngine`].
#[derive(Debug, Clone)]
pub struct SaSnapshot<S> {
    pub current: S,
    pub current_cost: f64,
    pub best: S,
    pub best_cost: f64,
    pub temperature: f64,
    pub iterations: usize,
    pub done: bool,
}

impl<S> Progress for SaSnapshot<S> {
    fn is_done(&self) -> bool {
        self.done
    }
}

/// Steppable simulated annealing.
///
/// Each step draws one neighbor of the current solution and accepts it
/// if it is cheaper, otherwise with probability `exp((cur - new) / T)`.
/// The temperature is cooled after every step; the run is done once it
/// reaches `config.min_temperature` or the iteration budget is spent.
pub struct SaEngine<P: SaProblem, R: Rng = StdRng> {
    problem: P,
    config: SaConfig,
    state: AnnealingState<P::Solution>,
    rng: R,
}

impl<P: SaProblem> SaEngine<P, StdRng> {
    /// Creates an engine seeded from `config.seed`.
    pub fn new(problem: P, config: SaConfig) -> Result<Self, InstanceError> {
        let rng = rng_from_seed(config.seed);
        Self::with_rng(problem, config, rng)
    }
}

impl<P: SaProblem, R: Rng> SaEngine<P, R> {
    /// Creates an engine whose initial solution is drawn from `rng`.
    pub fn with_rng(problem: P, config: SaConfig, mut rng: R) -> Result<Self, InstanceError> {
        config.validate()?;
        let current = problem.initial_solution(&mut rng);
        let current_cost = problem.cost(&current);
        let state = AnnealingState {
            best: current.clone(),
            best_cost: current_cost,
            current,
            current_cost,
            temperature: config.initial_temperature,
            iterations: 0,
            accepted: 0,
            improving: 0,
        };
        Self::from_state(problem, config, state, rng)
    }

    /// Continues a run from a captured [`state`](Self::state).
    ///
    /// Costs are taken from the state as-is.
    pub fn from_state(
        problem: P,
        config: SaConfig,
        state: AnnealingState<P::Solution>,
        rng: R,
    ) -> Result<Self, InstanceError> {
        config.validate()?;
        if state.temperature <= 0.0 || !state.temperature.is_finite() {
            return Err(InstanceError::param(
                "temperature",
                format!("must be positive and finite, got {}", state.temperature),
            ));
        }
        Ok(Self {
            problem,
            config,
            state,
            rng,
        })
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn config(&self) -> &SaConfig {
        &self.config
    }

    pub fn state(&self) -> &AnnealingState<P::Solution> {
        &self.state
    }

    pub fn into_state(self) -> AnnealingState<P::Solution> {
        self.state
    }

    pub fn temperature(&self) -> f64 {
        self.state.temperature
    }

    pub fn iterations(&self) -> usize {
        self.state.iterations
    }

    pub fn is_done(&self) -> bool {
        self.state.temperature <= self.config.min_temperature
            || (self.config.max_iterations > 0
                && self.state.iterations >= self.config.max_iterations)
    }

    /// Performs one move unless already done.
    pub fn step(&mut self) -> SaSnapshot<P::Solution> {
        self.advance();
        self.snapshot()
    }

    /// [`step`](Self::step) without building a snapshot.
    pub(crate) fn advance(&mut self) {
        if !self.is_done() {
            self.anneal();
        }
    }

    pub fn snapshot(&self) -> SaSnapshot<P::Solution> {
        SaSnapshot {
            current: self.state.current.clone(),
            current_cost: self.state.current_cost,
            best: self.state.best.clone(),
            best_cost: self.state.best_cost,
            temperature: self.state.temperature,
            iterations: self.state.iterations,
            done: self.is_done(),
        }
    }

    fn anneal(&mut self) {
        let state = &mut self.state;
        let neighbor = self.problem.neighbor(&state.current, &mut self.rng);
        let neighbor_cost = self.problem.cost(&neighbor);
        let delta = neighbor_cost - state.current_cost;

        // Metropolis acceptance criterion
        let accept = if delta < 0.0 {
            state.improving += 1;
            true
        } else {
            let probability = (-delta / state.temperature).exp();
            self.rng.random_range(0.0..1.0) < probability
        };

        if accept {
            state.current = neighbor;
            state.current_cost = neighbor_cost;
            state.accepted += 1;

            if state.current_cost < state.best_cost {
                state.best = state.current.clone();
                state.best_cost = state.current_cost;
                debug!(
                    "iteration {}: new best cost {} at T={}",
                    state.iterations, state.best_cost, state.temperature
                );
            }
        }

        state.iterations += 1;
        state.temperature = self.config.cooling.cool(state.temperature);

        if self.is_done() {
            info!(
                "SA finished after {} iterations with best cost {} (T={})",
                self.state.iterations, self.state.best_cost, self.state.temperature
            );
        }
    }
}

impl<P: SaProblem, R: Rng> Stepper for SaEngine<P, R> {
    type Snapshot = SaSnapshot<P::Solution>;

    fn step(&mut self) -> Self::Snapshot {
        SaEngine::step(self)
    }
}

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    pub best: S,

    pub best_cost: f64,

    /// Metropolis moves made.
    pub iterations: usize,

    pub final_temperature: f64,

    /// Moves that replaced the current solution, improving ones included.
    pub accepted_moves: usize,

    /// Moves with a strictly lower cost.
    pub improving_moves: usize,

    /// Stopped by the cancel flag rather than by the schedule.
    pub cancelled: bool,

    /// Best cost sampled every 100 iterations, plus the final value.
    pub cost_history: Vec<f64>,
}

/// Runs an [`SaEngine`] to completion.
pub struct SaRunner;

impl SaRunner {
    pub fn run<P: SaProblem>(
        problem: P,
        config: &SaConfig,
    ) -> Result<SaResult<P::Solution>, InstanceError> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Like [`run`](Self::run), but checks `cancel` before every move.
    pub fn run_with_cancel<P: SaProblem>(
        problem: P,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult<P::Solution>, InstanceError> {
        let mut engine = SaEngine::new(problem, config.clone())?;
        let raised = || cancel.as_ref().is_some_and(|f| f.load(Ordering::Relaxed));
        let mut cost_history = vec![engine.state.best_cost];

        let mut cancelled = false;
        while !engine.is_done() {
            if raised() {
                cancelled = true;
                break;
            }
            engine.anneal();
            if engine.state.iterations.is_multiple_of(HISTORY_INTERVAL) {
                cost_history.push(engine.state.best_cost);
            }
        }

        let state = engine.into_state();
        if cost_history
            .last()
            .is_none_or(|&last| (last - state.best_cost).abs() > 1e-15)
        {
            cost_history.push(state.best_cost);
        }

        Ok(SaResult {
            best: state.best,
            best_cost: state.best_cost,
            iterations: state.iterations,
            final_temperature: state.temperature,
            accepted_moves: state.accepted,
            improving_moves: state.improving,
            cancelled,
            cost_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::sa::CoolingSchedule;

    /// Walk on the integer lattice toward (7, -3); cost is the Manhattan
    /// distance.
    struct Lattice;

    impl SaProblem for Lattice {
        type Solution = (i64, i64);

        fn initial_solution<R: Rng>(&self, rng: &mut R) -> (i64, i64) {
            (rng.random_range(-50..=50), rng.random_range(-50..=50))
        }

        fn cost(&self, &(x, y): &(i64, i64)) -> f64 {
            ((x - 7).abs() + (y + 3).abs()) as f64
        }

        fn neighbor<R: Rng>(&self, &(x, y): &(i64, i64), rng: &mut R) -> (i64, i64) {
            let d = if rng.random_bool(0.5) { 1 } else { -1 };
            if rng.random_bool(0.5) {
                (x + d, y)
            } else {
                (x, y + d)
            }
        }
    }

    fn config(t0: f64, floor: f64, alpha: f64) -> SaConfig {
        SaConfig::default()
            .with_initial_temperature(t0)
            .with_min_temperature(floor)
            .with_cooling(CoolingSchedule::Geometric { alpha })
    }

    #[test]
    fn test_geometric_cooling_reaches_target() {
        let result = SaRunner::run(Lattice, &config(100.0, 0.001, 0.999).with_seed(42)).unwrap();
        assert_eq!(result.best, (7, -3), "stopped at cost {}", result.best_cost);
        assert!(result.improving_moves > 0);
        assert!(result.accepted_moves > result.improving_moves);
        assert!(result.final_temperature <= 0.001);
    }

    #[test]
    fn test_lundy_mees_reaches_target() {
        // beta chosen so the floor is hit after `budget` moves.
        let (t0, floor, budget) = (100.0, 0.001, 50_000);
        let beta = (t0 - floor) / (budget as f64 * t0 * floor);
        let config = SaConfig::default()
            .with_initial_temperature(t0)
            .with_min_temperature(floor)
            .with_cooling(CoolingSchedule::LundyMees { beta })
            .with_max_iterations(budget)
            .with_seed(42);

        let result = SaRunner::run(Lattice, &config).unwrap();
        assert_eq!(result.best_cost, 0.0);
        assert!(result.iterations <= budget);
    }

    #[test]
    fn test_geometric_temperature_formula() {
        let mut engine = SaEngine::new(Lattice, config(500.0, 1.0, 0.97).with_seed(3)).unwrap();
        for t in 1..=100 {
            let expected = 500.0 * 0.97f64.powi(t);
            let got = engine.step().temperature;
            assert!((got - expected).abs() <= expected * 1e-9, "step {t}: {got} vs {expected}");
        }
    }

    #[test]
    fn test_stops_at_temperature_floor() {
        let mut engine = SaEngine::new(Lattice, config(8.0, 1.0, 0.5).with_seed(1)).unwrap();

        let mut steps = 1;
        while !engine.step().done {
            steps += 1;
        }
        // 8 -> 4 -> 2 -> 1: the third step reaches the floor.
        assert_eq!(steps, 3);
        assert_eq!(engine.iterations(), 3);
        assert_eq!(engine.step().iterations, 3);
    }

    #[test]
    fn test_iteration_budget() {
        let config = config(1e10, 1e-15, 0.95).with_max_iterations(100).with_seed(42);
        let result = SaRunner::run(Lattice, &config).unwrap();
        assert_eq!(result.iterations, 100);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_raised_flag_makes_no_moves() {
        let flag = Arc::new(AtomicBool::new(true));
        let result = SaRunner::run_with_cancel(Lattice, &config(1e10, 1e-15, 0.95).with_seed(42), Some(flag)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.cost_history, vec![result.best_cost]);
    }

    #[test]
    fn test_start_at_floor_makes_no_moves() {
        let result = SaRunner::run(Lattice, &config(1.0, 1.0, 0.9).with_seed(4)).unwrap();
        assert_eq!(result.iterations, 0);
        assert_eq!(result.final_temperature, 1.0);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SaConfig::default().with_initial_temperature(0.0);
        assert!(SaRunner::run(Lattice, &config).is_err());
    }

    #[test]
    fn test_cost_history_never_rises() {
        let result = SaRunner::run(Lattice, &config(50.0, 0.01, 0.995).with_seed(42)).unwrap();
        assert!(result.cost_history.len() > 2);
        assert!(result.cost_history.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(result.cost_history.last(), Some(&result.best_cost));
    }

    #[test]
    fn test_hot_start_accepts_most_uphill_moves() {
        let result = SaRunner::run(Lattice, &config(1e8, 1e7, 0.9999).with_seed(42)).unwrap();
        let ratio = result.accepted_moves as f64 / result.iterations as f64;
        assert!(ratio > 0.95, "acceptance ratio {ratio}");
    }

    #[test]
    fn test_resume_reproduces_steps() {
        let config = config(20.0, 0.1, 0.99);
        let mut original = SaEngine::with_rng(Lattice, config.clone(), create_rng(5)).unwrap();
        for _ in 0..10 {
            original.step();
        }
        let state = original.state().clone();

        let mut a = SaEngine::from_state(Lattice, config.clone(), state.clone(), create_rng(99)).unwrap();
        let mut b = SaEngine::from_state(Lattice, config, state, create_rng(99)).unwrap();
        for _ in 0..50 {
            let (sa, sb) = (a.step(), b.step());
            assert_eq!(sa.current, sb.current);
            assert_eq!(sa.best_cost, sb.best_cost);
            assert_eq!(sa.temperature, sb.temperature);
        }
    }

    #[test]
    fn test_from_state_rejects_bad_temperature() {
        let state = AnnealingState {
            current: (7, -3),
            current_cost: 0.0,
            best: (7, -3),
            best_cost: 0.0,
            temperature: 0.0,
            iterations: 0,
            accepted: 0,
            improving: 0,
        };
        assert!(SaEngine::from_state(Lattice, SaConfig::default(), state, create_rng(0)).is_err());
    }
}
