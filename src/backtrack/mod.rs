//! Exact graph coloring by backtracking.
//!
//! Vertices are colored one at a time in a fixed order; a color is tried
//! only if no already-colored neighbor holds it. When a vertex runs out of
//! colors the search unassigns it and retries its parent's next color. The
//! search ends with a proper coloring, or proves none exists for the given
//! number of colors once the first vertex runs out.
//!
//! The recursion is unrolled into an explicit stack of per-depth color
//! cursors over a single coloring, so the engine can be advanced one vertex
//! visit at a time.
//!
//! # References
//!
//! - Golomb & Baumert (1965), "Backtrack Programming"
//! - Welsh & Powell (1967), "An upper bound for the chromatic number of a graph"

mod config;
mod runner;

pub use config::{BacktrackConfig, VertexOrder};
pub use runner::{BacktrackState, BacktrackingColorer, SearchStatus};
