//! Vertex colorings and the snapshot both coloring engines report.

use super::Graph;
use crate::driver::Progress;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mapping vertex → color index, where `None` means unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coloring {
    colors: Vec<Option<usize>>,
}

impl Coloring {
    /// All `n` vertices unassigned.
    pub fn unassigned(n: usize) -> Self {
        Self {
            colors: vec![None; n],
        }
    }

    /// A complete coloring from one color per vertex.
    pub fn from_colors(colors: Vec<usize>) -> Self {
        Self {
            colors: colors.into_iter().map(Some).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, v: usize) -> Option<usize> {
        self.colors[v]
    }

    pub fn set(&mut self, v: usize, color: usize) {
        self.colors[v] = Some(color);
    }

    pub fn unset(&mut self, v: usize) {
        self.colors[v] = None;
    }

    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.colors
    }

    /// True if every vertex holds a color.
    pub fn is_complete(&self) -> bool {
        self.colors.iter().all(Option::is_some)
    }

    /// Number of edges whose endpoints hold the same assigned color.
    ///
    /// Edges with an unassigned endpoint never count.
    pub fn conflicts(&self, graph: &Graph) -> usize {
        graph
            .edges()
            .filter(|&(a, b)| matches!((self.colors[a], self.colors[b]), (Some(x), Some(y)) if x == y))
            .count()
    }

    /// Complete and conflict-free.
    pub fn is_proper(&self, graph: &Graph) -> bool {
        self.is_complete() && self.conflicts(graph) == 0
    }

    /// Number of distinct colors in use.
    pub fn colors_used(&self) -> usize {
        let mut seen: Vec<usize> = self.colors.iter().flatten().copied().collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}

/// Per-step output of [`BacktrackingColorer`](crate::backtrack::BacktrackingColorer)
/// and [`AntColonyColorer`](crate::aco::AntColonyColorer).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColoringSnapshot {
    /// Current (backtracking) or best-so-far (ACO) assignment.
    pub assignment: Coloring,

    /// Vertex visits (backtracking) or completed rounds (ACO).
    pub iterations: usize,

    /// Conflicting edges in `assignment`.
    pub conflicts: usize,

    /// The engine will not change `assignment` any further.
    pub done: bool,

    /// `assignment` is complete and conflict-free.
    pub success: bool,
}

impl Progress for ColoringSnapshot {
    fn is_done(&self) -> bool {
        self.done
    }
}
