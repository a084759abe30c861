//! Traits a problem implements to run on [`GaEngine`](super::GaEngine).
//!
//! [`Individual`] carries a solution and its cached fitness;
//! [`GaProblem`] creates, scores and recombines individuals.

use rand::Rng;

/// A fitness value. Smaller is better.
///
/// Implemented for `f64` and `u64`.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Placeholder for individuals that have not been evaluated yet.
    fn worst() -> Self;

    /// Lossy view used for fitness histories and log lines.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn worst() -> Self {
        f64::INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

impl Fitness for u64 {
    fn worst() -> Self {
        u64::MAX
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// A member of the population with a cached fitness.
///
/// The engine writes the fitness through
/// [`set_fitness`](Individual::set_fitness) after calling
/// [`GaProblem::evaluate`]; implementations just store it.
pub trait Individual: Clone + Send + Sync {
    type Fitness: Fitness;

    fn fitness(&self) -> Self::Fitness;

    fn set_fitness(&mut self, fitness: Self::Fitness);
}

/// Problem hooks for [`GaEngine`](super::GaEngine).
///
/// Only creation and evaluation are required. The default crossover clones
/// the first parent, the default mutation does nothing and no fitness is
/// ever considered optimal.
///
/// `Send + Sync` lets offspring be scored on rayon threads and engines run
/// inside a [`StepWorker`](crate::driver::StepWorker).
pub trait GaProblem: Send + Sync {
    type Individual: Individual;

    /// A fresh random individual. Its fitness is overwritten on evaluation.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates an individual and returns its fitness. Must be pure.
    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// Offspring of two parents. Surplus children beyond the population
    /// size are dropped.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        _parent2: &Self::Individual,
        _rng: &mut R,
    ) -> Vec<Self::Individual> {
        vec![parent1.clone()]
    }

    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}

    /// True if no individual can do better than `fitness`.
    ///
    /// The engine stops as soon as the best individual is optimal.
    fn is_optimal(&self, _fitness: <Self::Individual as Individual>::Fitness) -> bool {
        false
    }
}
