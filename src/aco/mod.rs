//! Ant Colony Optimization (ACO) for graph coloring.
//!
//! A colony of ants repeatedly builds complete colorings, choosing each
//! vertex's color at random with probability proportional to a learned
//! `(vertex, color)` pheromone weight. Colorings with fewer conflicting
//! edges reinforce their choices more strongly; evaporation lets stale
//! choices fade.
//!
//! Per round the order is fixed: all ants construct, all ants deposit,
//! then the table evaporates once.
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Costa & Hertz (1997), "Ants can colour graphs"
//! - Stützle & Hoos (2000), "MAX-MIN Ant System"

mod config;
mod pheromone;
mod runner;

pub use config::{AcoConfig, ColorChoice};
pub use pheromone::PheromoneTable;
pub use runner::{AcoState, AntColonyColorer};
