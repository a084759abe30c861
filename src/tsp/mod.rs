//! Traveling-salesman tours by simulated annealing.
//!
//! [`AnnealingTourSolver`] wraps the generic [`SaEngine`](crate::sa::SaEngine)
//! around [`TourProblem`]: tours are permutations of the point indices,
//! costs are closed tour lengths over a precomputed [`DistanceMatrix`], and
//! the move swaps two positions. Swaps keep every tour a permutation, so
//! no repair step exists.
//!
//! # References
//!
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod runner;
mod types;

pub use runner::{AnnealingTourSolver, TourProblem, TourSnapshot};
pub use types::{is_permutation, random_points, validate_points, DistanceMatrix, Point};
