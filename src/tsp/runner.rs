//! Annealing over closed tours.

use super::types::{is_permutation, validate_points, DistanceMatrix, Point};
use crate::driver::{Progress, Stepper};
use crate::error::InstanceError;
use crate::random::rng_from_seed;
use crate::sa::{AnnealingState, SaConfig, SaEngine, SaProblem};
use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tours over a fixed point set, as an [`SaProblem`].
///
/// The neighbor move swaps the cities at two distinct random positions.
#[derive(Debug, Clone)]
pub struct TourProblem {
    distances: DistanceMatrix,
}

impl TourProblem {
    pub fn new(distances: DistanceMatrix) -> Self {
        Self { distances }
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }
}

impl SaProblem for TourProblem {
    type Solution = Vec<usize>;

    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        let mut tour: Vec<usize> = (0..self.distances.len()).collect();
        tour.shuffle(rng);
        tour
    }

    fn cost(&self, tour: &Vec<usize>) -> f64 {
        self.distances.tour_length(tour)
    }

    fn neighbor<R: Rng>(&self, tour: &Vec<usize>, rng: &mut R) -> Vec<usize> {
        let mut next = tour.clone();
        if next.len() >= 2 {
            let picked = index::sample(rng, next.len(), 2);
            next.swap(picked.index(0), picked.index(1));
        }
        next
    }
}

/// Per-step output of an [`AnnealingTourSolver`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TourSnapshot {
    pub current_tour: Vec<usize>,
    pub current_length: f64,
    pub best_tour: Vec<usize>,
    pub best_length: f64,
    pub temperature: f64,
    pub iterations: usize,
    pub done: bool,
}

impl Progress for TourSnapshot {
    fn is_done(&self) -> bool {
        self.done
    }
}

/// Traveling-salesman tour by simulated annealing.
///
/// # Examples
///
/// ```
/// use np_solvers::sa::SaConfig;
/// use np_solvers::tsp::{AnnealingTourSolver, Point};
///
/// let points = vec![
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(0.0, 10.0),
/// ];
/// let mut solver = AnnealingTourSolver::new(points, SaConfig::tour().with_seed(42))?;
/// let snapshot = solver.run();
/// assert!((snapshot.best_length - 40.0).abs() < 1e-9);
/// # Ok::<(), np_solvers::error::InstanceError>(())
/// ```
pub struct AnnealingTourSolver<R: Rng = StdRng> {
    points: Vec<Point>,
    engine: SaEngine<TourProblem, R>,
}

impl AnnealingTourSolver<StdRng> {
    /// Creates a solver seeded from `config.seed`.
    pub fn new(points: Vec<Point>, config: SaConfig) -> Result<Self, InstanceError> {
        let rng = rng_from_seed(config.seed);
        Self::with_rng(points, config, rng)
    }
}

impl<R: Rng> AnnealingTourSolver<R> {
    /// Creates a solver starting from a random shuffled tour.
    ///
    /// Needs at least two distinct points.
    pub fn with_rng(points: Vec<Point>, config: SaConfig, rng: R) -> Result<Self, InstanceError> {
        validate_points(&points, 2)?;
        let problem = TourProblem::new(DistanceMatrix::new(&points));
        let engine = SaEngine::with_rng(problem, config, rng)?;
        Ok(Self { points, engine })
    }

    /// Continues from a captured [`state`](Self::state).
    ///
    /// Both tours must be permutations of the point indices; their lengths
    /// are recomputed.
    pub fn from_state(
        points: Vec<Point>,
        config: SaConfig,
        mut state: AnnealingState<Vec<usize>>,
        rng: R,
    ) -> Result<Self, InstanceError> {
        validate_points(&points, 2)?;
        let n = points.len();
        if !is_permutation(&state.current, n) || !is_permutation(&state.best, n) {
            return Err(InstanceError::param(
                "state",
                format!("tours must be permutations of 0..{n}"),
            ));
        }
        let distances = DistanceMatrix::new(&points);
        state.current_cost = distances.tour_length(&state.current);
        state.best_cost = distances.tour_length(&state.best);
        let engine = SaEngine::from_state(TourProblem::new(distances), config, state, rng)?;
        Ok(Self { points, engine })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn distances(&self) -> &DistanceMatrix {
        self.engine.problem().distances()
    }

    pub fn config(&self) -> &SaConfig {
        self.engine.config()
    }

    pub fn state(&self) -> &AnnealingState<Vec<usize>> {
        self.engine.state()
    }

    pub fn temperature(&self) -> f64 {
        self.engine.temperature()
    }

    pub fn is_done(&self) -> bool {
        self.engine.is_done()
    }

    /// One swap proposal and one cooling step, unless already done.
    pub fn step(&mut self) -> TourSnapshot {
        self.engine.advance();
        self.snapshot()
    }

    /// Steps until the temperature floor.
    pub fn run(&mut self) -> TourSnapshot {
        while !self.engine.is_done() {
            self.engine.advance();
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> TourSnapshot {
        let state = self.engine.state();
        TourSnapshot {
            current_tour: state.current.clone(),
            current_length: state.current_cost,
            best_tour: state.best.clone(),
            best_length: state.best_cost,
            temperature: state.temperature,
            iterations: state.iterations,
            done: self.engine.is_done(),
        }
    }
}

impl<R: Rng> Stepper for AnnealingTourSolver<R> {
    type Snapshot = TourSnapshot;

    fn step(&mut self) -> TourSnapshot {
        AnnealingTourSolver::step(self)
    }
}
