//! Undirected graphs for the coloring engines.
//!
//! A [`Graph`] owns vertices `0..n`, a set of unique undirected edges and a
//! symmetric adjacency map. It is built once per instance and is read-only
//! to the engines.

mod coloring;

pub use coloring::{Coloring, ColoringSnapshot};

use crate::error::InstanceError;
use rand::Rng;
use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Undirected simple graph (no self-loops, no parallel edges).
///
/// Edges are stored as ordered pairs `(min, max)`. Adjacency is kept
/// symmetric: `u ∈ neighbors(v) ⟺ v ∈ neighbors(u)`.
///
/// # Examples
///
/// ```
/// use np_solvers::graph::Graph;
///
/// let mut g = Graph::new(3);
/// assert!(g.add_edge(0, 1));
/// assert!(!g.add_edge(1, 0)); // duplicate
/// assert!(!g.add_edge(2, 2)); // self-loop
/// assert_eq!(g.edge_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Graph {
    adjacency: Vec<BTreeSet<usize>>,
    edges: BTreeSet<(usize, usize)>,
}

impl Graph {
    /// Creates a graph with `n` isolated vertices.
    pub fn new(n: usize) -> Self {
        Self {
            adjacency: vec![BTreeSet::new(); n],
            edges: BTreeSet::new(),
        }
    }

    /// Builds a graph from an edge list, skipping self-loops and duplicates.
    ///
    /// # Panics
    /// Panics if an endpoint is `>= n`.
    pub fn from_edges<I>(n: usize, edges: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut g = Self::new(n);
        for (a, b) in edges {
            g.add_edge(a, b);
        }
        g
    }

    /// Cycle graph `C_n`: `0-1-…-(n-1)-0`.
    pub fn cycle(n: usize) -> Self {
        Self::from_edges(n, (0..n).map(|i| (i, (i + 1) % n)))
    }

    /// Complete graph `K_n`.
    pub fn complete(n: usize) -> Self {
        Self::from_edges(n, (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j))))
    }

    /// Random graph with exactly `edge_count` unique edges.
    ///
    /// Endpoints are drawn uniformly and redrawn on self-loops or
    /// duplicates.
    pub fn random<R: Rng>(n: usize, edge_count: usize, rng: &mut R) -> Result<Self, InstanceError> {
        let max = max_edges(n);
        if edge_count > max {
            return Err(InstanceError::InfeasibleEdgeCount {
                vertices: n,
                requested: edge_count,
                max,
            });
        }

        let mut g = Self::new(n);
        while g.edge_count() < edge_count {
            let a = rng.random_range(0..n);
            let b = rng.random_range(0..n);
            g.add_edge(a, b);
        }
        Ok(g)
    }

    /// Adds the undirected edge `{a, b}`.
    ///
    /// Returns `false` (and leaves the graph unchanged) for self-loops and
    /// edges already present.
    ///
    /// # Panics
    /// Panics if an endpoint is out of range.
    pub fn add_edge(&mut self, a: usize, b: usize) -> bool {
        let n = self.vertex_count();
        assert!(a < n && b < n, "edge ({a}, {b}) out of range for {n} vertices");
        if a == b {
            return false;
        }
        let key = (a.min(b), a.max(b));
        if !self.edges.insert(key) {
            return false;
        }
        self.adjacency[a].insert(b);
        self.adjacency[b].insert(a);
        true
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Neighbors of `v` in ascending index order.
    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[v].iter().copied()
    }

    pub fn degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }

    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).max().unwrap_or(0)
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.edges.contains(&(a.min(b), a.max(b)))
    }

    /// All edges as `(min, max)` pairs in lexicographic order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().copied()
    }
}

/// `n * (n - 1) / 2`
fn max_edges(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_add_edge_rejects_loops_and_duplicates() {
        let mut g = Graph::new(4);
        assert!(g.add_edge(0, 1));
        assert!(g.add_edge(3, 1));
        assert!(!g.add_edge(1, 0));
        assert!(!g.add_edge(2, 2));
        assert_eq!(g.edge_count(), 2);
        assert!(g.has_edge(1, 3));
        assert!(!g.has_edge(0, 2));
    }

    #[test]
    fn test_adjacency_symmetric() {
        let g = Graph::from_edges(5, [(0, 1), (1, 2), (2, 4), (4, 0), (3, 3)]);
        for u in 0..g.vertex_count() {
            for v in g.neighbors(u) {
                assert!(g.neighbors(v).any(|w| w == u), "{u}-{v} not symmetric");
            }
        }
        assert_eq!(g.degree(3), 0);
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn test_cycle_and_complete() {
        let c4 = Graph::cycle(4);
        assert_eq!(c4.edge_count(), 4);
        assert!((0..4).all(|v| c4.degree(v) == 2));

        let k5 = Graph::complete(5);
        assert_eq!(k5.edge_count(), 10);
        assert_eq!(k5.max_degree(), 4);
    }

    #[test]
    fn test_random_exact_edge_count() {
        let mut rng = create_rng(42);
        let g = Graph::random(50, 100, &mut rng).unwrap();
        assert_eq!(g.vertex_count(), 50);
        assert_eq!(g.edge_count(), 100);
        let degree_sum: usize = (0..50).map(|v| g.degree(v)).sum();
        assert_eq!(degree_sum, 200);
    }

    #[test]
    fn test_random_rejects_too_many_edges() {
        let mut rng = create_rng(42);
        let err = Graph::random(4, 7, &mut rng).unwrap_err();
        assert_eq!(
            err,
            InstanceError::InfeasibleEdgeCount {
                vertices: 4,
                requested: 7,
                max: 6
            }
        );
        // Exactly complete is fine.
        assert_eq!(Graph::random(4, 6, &mut rng).unwrap(), Graph::complete(4));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_panics() {
        Graph::new(2).add_edge(0, 2);
    }
}
