//! Generation stepping for the genetic algorithm.
//!
//! [`GaEngine`] advances the population one generation per
//! [`step`](GaEngine::step): rank → keep elites → select, cross over and
//! mutate offspring → evaluate. [`GaRunner`] drives an engine to completion.

use super::config::GaConfig;
use super::types::{Fitness, GaProblem, Individual};
use crate::driver::{Progress, Stepper};
use crate::error::InstanceError;
use crate::random::rng_from_seed;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Per-generation output of a [`GaEngine`].
#[derive(Debug, Clone)]
pub struct GaSnapshot<I: Individual> {
    /// Best individual seen so far.
    pub best: I,

    /// `best.fitness()`.
    pub best_fitness: I::Fitness,

    /// Generations evolved so far. The initial population is generation 0.
    pub generation: usize,

    /// Optimal fitness reached or generation budget spent.
    pub done: bool,
}

impl<I: Individual> Progress for GaSnapshot<I> {
    fn is_done(&self) -> bool {
        self.done
    }
}

/// Steppable genetic algorithm.
///
/// The population is kept sorted by ascending fitness between steps, so
/// `population()[..elitism_count]` are the elites of the next generation.
pub struct GaEngine<P: GaProblem, R: Rng = StdRng> {
    problem: P,
    config: GaConfig,
    population: Vec<P::Individual>,
    best: P::Individual,
    generation: usize,
    fitness_history: Vec<f64>,
    rng: R,
}

impl<P: GaProblem> GaEngine<P, StdRng> {
    /// Creates an engine seeded from `config.seed`.
    pub fn new(problem: P, config: GaConfig) -> Result<Self, InstanceError> {
        let rng = rng_from_seed(config.seed);
        Self::with_rng(problem, config, rng)
    }
}

impl<P: GaProblem, R: Rng> GaEngine<P, R> {
    /// Creates an engine with a random initial population drawn from `rng`.
    pub fn with_rng(problem: P, config: GaConfig, mut rng: R) -> Result<Self, InstanceError> {
        config.validate()?;
        let population = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();
        Self::from_population(problem, config, population, 0, rng)
    }

    /// Continues from a given population at generation `generation`.
    ///
    /// Individuals are (re-)evaluated, so stale fitness values are ignored.
    pub fn from_population(
        problem: P,
        config: GaConfig,
        mut population: Vec<P::Individual>,
        generation: usize,
        rng: R,
    ) -> Result<Self, InstanceError> {
        config.validate()?;
        if population.len() != config.population_size {
            return Err(InstanceError::param(
                "population",
                format!(
                    "expected {} individuals, got {}",
                    config.population_size,
                    population.len()
                ),
            ));
        }

        evaluate_all(&problem, &mut population, config.parallel);
        sort_by_fitness(&mut population);
        let best = population[0].clone();
        let fitness_history = vec![best.fitness().to_f64()];

        Ok(Self {
            problem,
            config,
            population,
            best,
            generation,
            fitness_history,
            rng,
        })
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Current population, best first.
    pub fn population(&self) -> &[P::Individual] {
        &self.population
    }

    pub fn best(&self) -> &P::Individual {
        &self.best
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best-so-far fitness after every generation, starting with the
    /// initial population.
    pub fn fitness_history(&self) -> &[f64] {
        &self.fitness_history
    }

    pub fn is_done(&self) -> bool {
        self.problem.is_optimal(self.best.fitness())
            || self.generation >= self.config.max_generations
    }

    /// Evolves one generation unless already done.
    pub fn step(&mut self) -> GaSnapshot<P::Individual> {
        if !self.is_done() {
            self.evolve();
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> GaSnapshot<P::Individual> {
        GaSnapshot {
            best: self.best.clone(),
            best_fitness: self.best.fitness(),
            generation: self.generation,
            done: self.is_done(),
        }
    }

    fn evolve(&mut self) {
        let config = &self.config;
        let parents = &self.population;

        // Elite preservation
        let elite_count = config.elitism_count;
        let mut next_gen: Vec<P::Individual> = parents[..elite_count].to_vec();

        // Generate offspring from the ranked previous generation
        while next_gen.len() < config.population_size {
            let p1_idx = config.selection.select(parents, &mut self.rng);
            let p2_idx = config.selection.select(parents, &mut self.rng);

            let children = if self.rng.random_range(0.0..1.0) < config.crossover_rate {
                self.problem
                    .crossover(&parents[p1_idx], &parents[p2_idx], &mut self.rng)
            } else {
                vec![parents[p1_idx].clone()]
            };

            for mut child in children {
                if next_gen.len() >= config.population_size {
                    break;
                }
                if self.rng.random_range(0.0..1.0) < config.mutation_rate {
                    self.problem.mutate(&mut child, &mut self.rng);
                }
                next_gen.push(child);
            }
        }

        // Elites keep their fitness; only offspring need evaluation.
        evaluate_all(&self.problem, &mut next_gen[elite_count..], config.parallel);
        sort_by_fitness(&mut next_gen);

        self.population = next_gen;
        self.generation += 1;

        let gen_best = &self.population[0];
        if gen_best.fitness() < self.best.fitness() {
            self.best = gen_best.clone();
            debug!(
                "generation {}: new best fitness {:?}",
                self.generation,
                self.best.fitness()
            );
        }
        self.fitness_history.push(self.best.fitness().to_f64());

        if self.is_done() {
            info!(
                "GA finished at generation {} with best fitness {:?}",
                self.generation,
                self.best.fitness()
            );
        }
    }
}

impl<P: GaProblem, R: Rng> Stepper for GaEngine<P, R> {
    type Snapshot = GaSnapshot<P::Individual>;

    fn step(&mut self) -> Self::Snapshot {
        GaEngine::step(self)
    }
}

/// Outcome of [`GaRunner::run`].
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    pub best: I,

    pub best_fitness: I::Fitness,

    /// Generations evolved before stopping.
    pub generations: usize,

    /// Stopped by the cancel flag rather than by the engine.
    pub cancelled: bool,

    /// See [`GaEngine::fitness_history`].
    pub fitness_history: Vec<f64>,
}

/// Runs a [`GaEngine`] to completion.
///
/// ```
/// use np_solvers::ga::{GaConfig, GaRunner};
/// use np_solvers::knapsack::SubsetSumProblem;
///
/// let problem = SubsetSumProblem::new(vec![3, 9, 14, 20], 23)?;
/// let result = GaRunner::run(problem, &GaConfig::subset_sum().with_seed(42))?;
/// assert_eq!(result.best_fitness, 0);
/// # Ok::<(), np_solvers::error::InstanceError>(())
/// ```
pub struct GaRunner;

impl GaRunner {
    pub fn run<P: GaProblem>(
        problem: P,
        config: &GaConfig,
    ) -> Result<GaResult<P::Individual>, InstanceError> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Like [`run`](Self::run), but checks `cancel` before every generation
    /// and returns the best-so-far individual once it is raised.
    pub fn run_with_cancel<P: GaProblem>(
        problem: P,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<P::Individual>, InstanceError> {
        let mut engine = GaEngine::new(problem, config.clone())?;
        let raised = || cancel.as_ref().is_some_and(|f| f.load(Ordering::Relaxed));

        let mut cancelled = false;
        while !engine.is_done() {
            if raised() {
                cancelled = true;
                break;
            }
            engine.evolve();
        }

        Ok(GaResult {
            best_fitness: engine.best.fitness(),
            best: engine.best,
            generations: engine.generation,
            cancelled,
            fitness_history: engine.fitness_history,
        })
    }
}

/// Sort ascending by fitness (best first). Stable, so elites stay ahead of
/// equally fit offspring.
fn sort_by_fitness<I: Individual>(population: &mut [I]) {
    population.sort_by(|a, b| {
        a.fitness()
            .partial_cmp(&b.fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(feature = "parallel")]
fn evaluate_all<P: GaProblem>(problem: &P, individuals: &mut [P::Individual], parallel: bool) {
    use rayon::prelude::*;

    if parallel {
        individuals.par_iter_mut().for_each(|ind| {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        });
    } else {
        for ind in individuals.iter_mut() {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all<P: GaProblem>(problem: &P, individuals: &mut [P::Individual], _parallel: bool) {
    for ind in individuals.iter_mut() {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::Selection;
    use crate::random::create_rng;

    /// Guess a hidden word over a small alphabet; fitness is the number of
    /// wrong letters.
    #[derive(Clone, Debug, PartialEq)]
    struct Guess {
        letters: Vec<u8>,
        wrong: u64,
    }

    impl Individual for Guess {
        type Fitness = u64;
        fn fitness(&self) -> u64 {
            self.wrong
        }
        fn set_fitness(&mut self, wrong: u64) {
            self.wrong = wrong;
        }
    }

    struct HiddenWord {
        word: Vec<u8>,
        alphabet: u8,
    }

    impl HiddenWord {
        fn new(word: &[u8], alphabet: u8) -> Self {
            Self {
                word: word.to_vec(),
                alphabet,
            }
        }

        fn guess(&self, letters: Vec<u8>) -> Guess {
            Guess {
                letters,
                wrong: u64::worst(),
            }
        }
    }

    impl GaProblem for HiddenWord {
        type Individual = Guess;

        fn create_individual<R: Rng>(&self, rng: &mut R) -> Guess {
            let letters = self.word.iter().map(|_| rng.random_range(0..self.alphabet)).collect();
            self.guess(letters)
        }

        fn evaluate(&self, g: &Guess) -> u64 {
            g.letters.iter().zip(&self.word).filter(|(a, b)| a != b).count() as u64
        }

        fn crossover<R: Rng>(&self, a: &Guess, b: &Guess, rng: &mut R) -> Vec<Guess> {
            let letters = a
                .letters
                .iter()
                .zip(&b.letters)
                .map(|(&x, &y)| if rng.random_bool(0.5) { x } else { y })
                .collect();
            vec![self.guess(letters)]
        }

        fn mutate<R: Rng>(&self, g: &mut Guess, rng: &mut R) {
            let at = rng.random_range(0..g.letters.len());
            g.letters[at] = rng.random_range(0..self.alphabet);
        }

        fn is_optimal(&self, wrong: u64) -> bool {
            wrong == 0
        }
    }

    fn word() -> HiddenWord {
        HiddenWord::new(&[3, 1, 0, 2, 2, 1, 3, 0, 1, 2, 0, 3], 4)
    }

    #[test]
    fn test_closes_in_on_hidden_word() {
        let config = GaConfig::default()
            .with_population_size(60)
            .with_elitism_count(4)
            .with_max_generations(400)
            .with_mutation_rate(0.4)
            .with_seed(42);

        let result = GaRunner::run(word(), &config).unwrap();
        assert!(result.best_fitness <= 2, "{} letters still wrong", result.best_fitness);
        assert_eq!(result.fitness_history.len(), result.generations + 1);
    }

    #[test]
    fn test_optimum_ends_run_early() {
        let problem = HiddenWord::new(&[1, 0, 1, 1, 0, 0], 2);
        let config = GaConfig::default()
            .with_population_size(30)
            .with_elitism_count(2)
            .with_max_generations(1000)
            .with_mutation_rate(0.5)
            .with_seed(42);

        let result = GaRunner::run(problem, &config).unwrap();
        assert_eq!(result.best_fitness, 0);
        assert_eq!(result.best.letters, vec![1, 0, 1, 1, 0, 0]);
        assert!(result.generations < 1000);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_raised_flag_skips_every_generation() {
        let flag = Arc::new(AtomicBool::new(true));
        let result = GaRunner::run_with_cancel(word(), &GaConfig::default().with_seed(42), Some(flag)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.fitness_history.len(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GaConfig::default().with_population_size(3).with_elitism_count(2);
        assert!(GaRunner::run(word(), &config).is_err());
    }

    #[test]
    fn test_elites_survive_each_generation() {
        let config = GaConfig::default()
            .with_population_size(20)
            .with_elitism_count(4)
            .with_max_generations(50)
            .with_mutation_rate(1.0)
            .with_seed(42);

        let mut engine = GaEngine::new(word(), config).unwrap();
        while !engine.is_done() {
            let elites = engine.population()[..4].to_vec();
            engine.step();
            assert_eq!(engine.population().len(), 20);
            assert!(
                elites.iter().all(|e| engine.population().contains(e)),
                "generation {} lost an elite",
                engine.generation()
            );
        }
    }

    #[test]
    fn test_best_so_far_never_worsens() {
        let config = GaConfig::default()
            .with_population_size(20)
            .with_elitism_count(0)
            .with_selection(Selection::Tournament(2))
            .with_max_generations(60)
            .with_seed(7);

        let result = GaRunner::run(word(), &config).unwrap();
        assert!(result.fitness_history.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(result.best_fitness as f64, *result.fitness_history.last().unwrap());
    }

    #[test]
    fn test_step_after_done_is_noop() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_elitism_count(1)
            .with_max_generations(3)
            .with_seed(1);
        let mut engine = GaEngine::new(word(), config).unwrap();
        let mut snap = engine.step();
        while !snap.done {
            snap = engine.step();
        }
        let again = engine.step();
        assert_eq!(again.generation, snap.generation);
        assert_eq!(again.best_fitness, snap.best_fitness);
        assert!(again.generation <= 3);
    }

    #[test]
    fn test_from_population_size_mismatch() {
        let problem = word();
        let config = GaConfig::default().with_population_size(10).with_elitism_count(1);
        let population = vec![problem.guess(vec![0; 12]); 3];
        assert!(GaEngine::from_population(problem, config, population, 0, create_rng(0)).is_err());
    }

    #[test]
    fn test_from_population_reevaluates() {
        let problem = word();
        let config = GaConfig::default().with_population_size(2).with_elitism_count(0);
        let mut perfect = problem.guess(problem.word.clone());
        perfect.wrong = 99;
        let population = vec![problem.guess(vec![0; 12]), perfect];

        let engine = GaEngine::from_population(problem, config, population, 5, create_rng(0)).unwrap();
        assert_eq!(engine.best().fitness(), 0);
        assert_eq!(engine.generation(), 5);
        assert!(engine.is_done());
    }
}
