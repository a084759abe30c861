//! Backtracking configuration.

use crate::error::InstanceError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Order in which vertices are assigned colors.
///
/// Both orders are fixed before the search starts, so the explored tree is
/// identical across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VertexOrder {
    /// Vertex index order `0..n`.
    #[default]
    Natural,

    /// Descending degree, ties broken by lower index (Welsh & Powell 1967).
    LargestFirst,
}

/// Configuration for [`BacktrackingColorer`](super::BacktrackingColorer).
///
/// # Examples
///
/// ```
/// use np_solvers::backtrack::{BacktrackConfig, VertexOrder};
///
/// let config = BacktrackConfig::for_vertices(100).with_order(VertexOrder::LargestFirst);
/// assert_eq!(config.max_colors, 11);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BacktrackConfig {
    /// Colors `0..max_colors` are tried at every vertex.
    pub max_colors: usize,

    /// Vertex visiting order.
    pub order: VertexOrder,
}

impl Default for BacktrackConfig {
    fn default() -> Self {
        Self {
            max_colors: 4,
            order: VertexOrder::Natural,
        }
    }
}

impl BacktrackConfig {
    /// Default config with [`default_max_colors`](Self::default_max_colors) for `n` vertices.
    pub fn for_vertices(n: usize) -> Self {
        Self::default().with_max_colors(Self::default_max_colors(n))
    }

    /// `max(4, floor(sqrt(n)) + 1)`
    pub fn default_max_colors(n: usize) -> usize {
        ((n as f64).sqrt().floor() as usize + 1).max(4)
    }

    pub fn with_max_colors(mut self, k: usize) -> Self {
        self.max_colors = k;
        self
    }

    pub fn with_order(mut self, order: VertexOrder) -> Self {
        self.order = order;
        self
    }

    pub fn validate(&self) -> Result<(), InstanceError> {
        if self.max_colors == 0 {
            return Err(InstanceError::param("max_colors", "must be at least 1"));
        }
        Ok(())
    }
}
