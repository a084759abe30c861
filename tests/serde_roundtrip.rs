//! Engine state survives a JSON round trip and resumes identically.
#![cfg(feature = "serde")]

use np_solvers::aco::{AcoConfig, AcoState, AntColonyColorer};
use np_solvers::backtrack::{BacktrackConfig, BacktrackState, BacktrackingColorer};
use np_solvers::ga::GaConfig;
use np_solvers::graph::{ColoringSnapshot, Graph};
use np_solvers::knapsack::{Genome, SubsetSumGeneticSolver, SubsetSumProblem};
use np_solvers::random::create_rng;
use np_solvers::sa::{AnnealingState, SaConfig};
use np_solvers::tsp::{random_points, AnnealingTourSolver, Point, TourSnapshot};

fn roundtrip<T: serde::Serialize + serde::de::DeserializeOwned>(value: &T) -> T {
    let json = serde_json::to_string(value).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn backtracking_state_roundtrip() {
    let graph = Graph::random(12, 30, &mut create_rng(2)).unwrap();
    let config = BacktrackConfig::default().with_max_colors(4);
    let mut original = BacktrackingColorer::new(graph.clone(), config.clone()).unwrap();
    original.step_budget(7);

    let state: BacktrackState = roundtrip(original.state());
    assert_eq!(&state, original.state());
    let mut restored = BacktrackingColorer::resume(roundtrip(&graph), roundtrip(&config), state).unwrap();

    for _ in 0..200 {
        assert_eq!(original.step(), restored.step());
    }
}

#[test]
fn aco_state_roundtrip() {
    let graph = Graph::random(50, 100, &mut create_rng(3)).unwrap();
    let config = AcoConfig::default().with_max_colors(4).with_max_rounds(30);
    let mut original = AntColonyColorer::with_rng(graph.clone(), config.clone(), create_rng(3)).unwrap();
    for _ in 0..5 {
        original.step();
    }

    let state: AcoState = roundtrip(original.state());
    let mut a = AntColonyColorer::from_state(graph.clone(), config.clone(), original.state().clone(), create_rng(8)).unwrap();
    let mut b = AntColonyColorer::from_state(graph, config, state, create_rng(8)).unwrap();
    for _ in 0..10 {
        let snap: ColoringSnapshot = a.step();
        assert_eq!(roundtrip(&snap), snap);
        assert_eq!(snap, b.step());
    }
}

#[test]
fn genome_population_roundtrip() {
    let problem = SubsetSumProblem::new(vec![12, 45, 7, 88, 23, 61, 5, 39], 100).unwrap();
    let config = GaConfig::subset_sum().with_population_size(10);
    let mut original = SubsetSumGeneticSolver::with_rng(problem.clone(), config.clone(), create_rng(6)).unwrap();
    original.step();
    original.step();

    let genomes: Vec<Genome> = roundtrip(&original.population().to_vec());
    assert_eq!(genomes, original.population());
    let generation = original.generation();

    let mut a = SubsetSumGeneticSolver::from_population(
        problem.clone(),
        config.clone(),
        original.population().to_vec(),
        generation,
        create_rng(1),
    )
    .unwrap();
    let mut b =
        SubsetSumGeneticSolver::from_population(roundtrip(&problem), roundtrip(&config), genomes, generation, create_rng(1))
            .unwrap();
    for _ in 0..10 {
        assert_eq!(a.step(), b.step());
    }
}

#[test]
fn tour_state_roundtrip() {
    let points: Vec<Point> = random_points(15, 400, 300, 20, &mut create_rng(4)).unwrap();
    let config = SaConfig::tour().with_seed(4);
    let mut original = AnnealingTourSolver::new(points.clone(), config.clone()).unwrap();
    for _ in 0..50 {
        original.step();
    }

    let state: AnnealingState<Vec<usize>> = roundtrip(original.state());
    let mut a =
        AnnealingTourSolver::from_state(points.clone(), config.clone(), original.state().clone(), create_rng(2)).unwrap();
    let mut b = AnnealingTourSolver::from_state(roundtrip(&points), roundtrip(&config), state, create_rng(2)).unwrap();
    for _ in 0..100 {
        let snap: TourSnapshot = a.step();
        assert_eq!(snap, b.step());
    }
}
