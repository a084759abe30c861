//! Steppable solvers for classic NP-hard combinatorial problems.
//!
//! Four engines, each a synchronous state machine whose `step` performs one
//! bounded unit of work and returns an owned snapshot for rendering:
//!
//! - **Backtracking coloring** ([`backtrack`]): exact depth-first graph
//!   coloring with an explicit frame stack; deterministic.
//! - **Ant colony coloring** ([`aco`]): pheromone-guided stochastic search
//!   for a conflict-free coloring.
//! - **Subset-sum GA** ([`knapsack`]): a genetic algorithm over inclusion
//!   vectors, built on the generic [`ga`] framework.
//! - **Annealing tour** ([`tsp`]): simulated annealing over closed tours,
//!   built on the generic [`sa`] framework.
//!
//! Stochastic engines take a seed through their config or an injected RNG,
//! so runs are reproducible. [`driver`] supplies the step loops: a
//! synchronous one and a worker thread that hands snapshots over a channel.
//!
//! # Architecture
//!
//! Problem instances ([`graph::Graph`], item lists, [`tsp::Point`] sets)
//! are built and validated by the caller ([`instance`]) and owned read-only
//! by the engine. Engine state is mutated only by `step`. Presentation
//! (windows, palettes, layout) is out of scope.

pub mod aco;
pub mod backtrack;
pub mod driver;
pub mod error;
pub mod ga;
pub mod graph;
pub mod instance;
pub mod knapsack;
pub mod random;
pub mod sa;
pub mod tsp;
