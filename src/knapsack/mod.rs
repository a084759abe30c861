//! Subset-sum target matching with the GA framework.
//!
//! Given positive item values and a target, find a subset whose sum is as
//! close to the target as possible. A [`Genome`] is one inclusion bit per
//! item; its fitness is `|sum − target|`, and fitness 0 ends the search.
//!
//! Offspring come from single-point crossover of two uniformly drawn
//! parents, followed with probability `mutation_rate` by a single bit flip.

use crate::driver::{Progress, Stepper};
use crate::error::InstanceError;
use crate::ga::{GaConfig, GaEngine, GaProblem, Individual};
use crate::instance::{validate_items, MAX_ITEM_TOTAL};
use crate::random::rng_from_seed;
use rand::rngs::StdRng;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inclusion bit per item. Length always equals the item count.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Genome {
    genes: Vec<bool>,
    fitness: u64,
}

impl Genome {
    /// Unevaluated genome from raw bits.
    pub fn new(genes: Vec<bool>) -> Self {
        Self {
            genes,
            fitness: u64::MAX,
        }
    }

    pub fn genes(&self) -> &[bool] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Indices of included items.
    pub fn included(&self) -> impl Iterator<Item = usize> + '_ {
        self.genes
            .iter()
            .enumerate()
            .filter_map(|(i, &on)| on.then_some(i))
    }
}

impl Individual for Genome {
    type Fitness = u64;

    fn fitness(&self) -> u64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: u64) {
        self.fitness = fitness;
    }
}

/// Item values, target and initial inclusion probability.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubsetSumProblem {
    items: Vec<u64>,
    target: u64,
    init_fraction: f64,
}

impl SubsetSumProblem {
    /// Initial genomes include each item with probability 0.7.
    pub const DEFAULT_INIT_FRACTION: f64 = 0.7;

    pub fn new(items: Vec<u64>, target: u64) -> Result<Self, InstanceError> {
        validate_items(&items)?;
        if target > MAX_ITEM_TOTAL {
            return Err(InstanceError::param(
                "target",
                format!("must not exceed {MAX_ITEM_TOTAL}, got {target}"),
            ));
        }
        Ok(Self {
            items,
            target,
            init_fraction: Self::DEFAULT_INIT_FRACTION,
        })
    }

    /// Sets the per-item inclusion probability of initial genomes.
    pub fn with_init_fraction(mut self, fraction: f64) -> Result<Self, InstanceError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(InstanceError::param(
                "init_fraction",
                format!("must be in [0, 1], got {fraction}"),
            ));
        }
        self.init_fraction = fraction;
        Ok(self)
    }

    pub fn items(&self) -> &[u64] {
        &self.items
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// Sum of included item values.
    pub fn sum(&self, genome: &Genome) -> u64 {
        genome.included().map(|i| self.items[i]).sum()
    }

    /// `sum − target`: negative when under the target. Both terms are at
    /// most `i64::MAX`, so the difference cannot wrap.
    pub fn deviation(&self, genome: &Genome) -> i64 {
        self.sum(genome) as i64 - self.target as i64
    }
}

impl GaProblem for SubsetSumProblem {
    type Individual = Genome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Genome {
        Genome::new(
            (0..self.items.len())
                .map(|_| rng.random_bool(self.init_fraction))
                .collect(),
        )
    }

    fn evaluate(&self, genome: &Genome) -> u64 {
        self.sum(genome).abs_diff(self.target)
    }

    /// Single-point crossover: `p1[..cut] ++ p2[cut..]`, one child.
    fn crossover<R: Rng>(&self, p1: &Genome, p2: &Genome, rng: &mut R) -> Vec<Genome> {
        let cut = rng.random_range(0..self.items.len());
        let mut genes = p1.genes[..cut].to_vec();
        genes.extend_from_slice(&p2.genes[cut..]);
        vec![Genome::new(genes)]
    }

    /// Flips one uniformly random bit.
    fn mutate<R: Rng>(&self, genome: &mut Genome, rng: &mut R) {
        let i = rng.random_range(0..genome.genes.len());
        genome.genes[i] = !genome.genes[i];
    }

    fn is_optimal(&self, fitness: u64) -> bool {
        fitness == 0
    }
}

/// Per-generation output of [`SubsetSumGeneticSolver`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubsetSumSnapshot {
    pub best_genome: Genome,

    /// Sum of the items `best_genome` includes.
    pub best_sum: u64,

    /// `best_sum − target`.
    pub best_deviation: i64,

    pub generation: usize,

    pub done: bool,
}

impl Progress for SubsetSumSnapshot {
    fn is_done(&self) -> bool {
        self.done
    }
}

/// Genetic solver for subset-sum target matching.
///
/// # Examples
///
/// ```
/// use np_solvers::ga::GaConfig;
/// use np_solvers::knapsack::SubsetSumGeneticSolver;
///
/// let config = GaConfig::subset_sum().with_seed(42);
/// let mut solver = SubsetSumGeneticSolver::new(vec![10, 20, 30], 30, config)?;
/// let snapshot = solver.run();
/// assert_eq!(snapshot.best_deviation, 0);
/// # Ok::<(), np_solvers::error::InstanceError>(())
/// ```
pub struct SubsetSumGeneticSolver<R: Rng = StdRng> {
    engine: GaEngine<SubsetSumProblem, R>,
}

impl SubsetSumGeneticSolver<StdRng> {
    /// Creates a solver seeded from `config.seed`.
    pub fn new(items: Vec<u64>, target: u64, config: GaConfig) -> Result<Self, InstanceError> {
        let problem = SubsetSumProblem::new(items, target)?;
        let rng = rng_from_seed(config.seed);
        Self::with_rng(problem, config, rng)
    }
}

impl<R: Rng> SubsetSumGeneticSolver<R> {
    pub fn with_rng(problem: SubsetSumProblem, config: GaConfig, rng: R) -> Result<Self, InstanceError> {
        Ok(Self {
            engine: GaEngine::with_rng(problem, config, rng)?,
        })
    }

    /// Continues from a saved population (e.g. genomes from
    /// [`population`](Self::population)).
    pub fn from_population(
        problem: SubsetSumProblem,
        config: GaConfig,
        genomes: Vec<Genome>,
        generation: usize,
        rng: R,
    ) -> Result<Self, InstanceError> {
        let n = problem.items().len();
        if let Some(bad) = genomes.iter().find(|g| g.len() != n) {
            return Err(InstanceError::param(
                "population",
                format!("genome of length {} for {n} items", bad.len()),
            ));
        }
        Ok(Self {
            engine: GaEngine::from_population(problem, config, genomes, generation, rng)?,
        })
    }

    pub fn problem(&self) -> &SubsetSumProblem {
        self.engine.problem()
    }

    /// Current population, best first.
    pub fn population(&self) -> &[Genome] {
        self.engine.population()
    }

    pub fn generation(&self) -> usize {
        self.engine.generation()
    }

    pub fn fitness_history(&self) -> &[f64] {
        self.engine.fitness_history()
    }

    pub fn is_done(&self) -> bool {
        self.engine.is_done()
    }

    /// Evolves one generation.
    pub fn step(&mut self) -> SubsetSumSnapshot {
        self.engine.step();
        self.snapshot()
    }

    /// Evolves until deviation 0 or the generation budget.
    pub fn run(&mut self) -> SubsetSumSnapshot {
        while !self.engine.is_done() {
            self.engine.step();
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> SubsetSumSnapshot {
        let problem = self.engine.problem();
        let best = self.engine.best();
        SubsetSumSnapshot {
            best_genome: best.clone(),
            best_sum: problem.sum(best),
            best_deviation: problem.deviation(best),
            generation: self.engine.generation(),
            done: self.engine.is_done(),
        }
    }
}

impl<R: Rng> Stepper for SubsetSumGeneticSolver<R> {
    type Snapshot = SubsetSumSnapshot;

    fn step(&mut self) -> SubsetSumSnapshot {
        SubsetSumGeneticSolver::step(self)
    }
}
