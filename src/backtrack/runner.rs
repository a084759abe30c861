//! Depth-first search over an explicit frame stack.

use super::config::{BacktrackConfig, VertexOrder};
use crate::driver::Stepper;
use crate::error::InstanceError;
use crate::graph::{Coloring, ColoringSnapshot, Graph};
use log::{info, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where the search stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchStatus {
    Searching,
    /// Every vertex holds a color and no edge conflicts.
    Solved,
    /// The root vertex ran out of colors: no proper coloring with `max_colors`.
    Exhausted,
}

/// Resumable search position.
///
/// `cursors[d]` is the next color to try for the vertex at depth `d`;
/// vertices at depth `>= depth` other than the current one are unassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BacktrackState {
    pub coloring: Coloring,
    pub cursors: Vec<usize>,
    pub depth: usize,
    pub iterations: usize,
    pub status: SearchStatus,
}

/// Exact graph coloring by depth-first search with pruning.
///
/// One [`step`](Self::step) is one vertex visit: the vertex at the current
/// depth takes the next safe color (descend) or, if none remains, is
/// unassigned (backtrack to its parent). No randomness is involved, so a
/// fixed graph, order, and `max_colors` always yield the same visits.
///
/// # Examples
///
/// ```
/// use np_solvers::backtrack::{BacktrackConfig, BacktrackingColorer};
/// use np_solvers::graph::Graph;
///
/// let triangle = Graph::complete(3);
/// let mut solver = BacktrackingColorer::new(triangle, BacktrackConfig::default().with_max_colors(3))?;
/// let snapshot = solver.run();
/// assert!(snapshot.success);
/// # Ok::<(), np_solvers::error::InstanceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BacktrackingColorer {
    graph: Graph,
    config: BacktrackConfig,
    /// Depth → vertex.
    order: Vec<usize>,
    state: BacktrackState,
}

impl BacktrackingColorer {
    pub fn new(graph: Graph, config: BacktrackConfig) -> Result<Self, InstanceError> {
        config.validate()?;
        let n = graph.vertex_count();
        let state = BacktrackState {
            coloring: Coloring::unassigned(n),
            cursors: vec![0; n],
            depth: 0,
            iterations: 0,
            status: SearchStatus::Searching,
        };
        Self::resume(graph, config, state)
    }

    /// Continues a search from a previously captured [`state`](Self::state).
    pub fn resume(
        graph: Graph,
        config: BacktrackConfig,
        state: BacktrackState,
    ) -> Result<Self, InstanceError> {
        config.validate()?;
        let n = graph.vertex_count();
        if state.coloring.len() != n || state.cursors.len() != n || state.depth > n {
            return Err(InstanceError::param(
                "state",
                format!("search state does not match a graph of {n} vertices"),
            ));
        }
        let out_of_range = state
            .coloring
            .as_slice()
            .iter()
            .flatten()
            .any(|&c| c >= config.max_colors);
        if out_of_range || state.coloring.conflicts(&graph) > 0 {
            return Err(InstanceError::param(
                "state",
                "coloring uses unavailable colors or has conflicts",
            ));
        }
        let order = vertex_order(&graph, config.order);
        Ok(Self {
            graph,
            config,
            order,
            state,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &BacktrackConfig {
        &self.config
    }

    pub fn state(&self) -> &BacktrackState {
        &self.state
    }

    pub fn iterations(&self) -> usize {
        self.state.iterations
    }

    pub fn status(&self) -> SearchStatus {
        self.state.status
    }

    /// Performs one vertex visit.
    pub fn step(&mut self) -> ColoringSnapshot {
        if self.state.status == SearchStatus::Searching {
            self.visit();
        }
        self.snapshot()
    }

    /// Performs at most `budget` vertex visits.
    pub fn step_budget(&mut self, budget: usize) -> ColoringSnapshot {
        for _ in 0..budget {
            if self.state.status != SearchStatus::Searching {
                break;
            }
            self.visit();
        }
        self.snapshot()
    }

    /// Searches to completion.
    pub fn run(&mut self) -> ColoringSnapshot {
        while self.state.status == SearchStatus::Searching {
            self.visit();
        }
        self.snapshot()
    }

    /// The search only assigns safe colors, so `conflicts` is always 0.
    pub fn snapshot(&self) -> ColoringSnapshot {
        debug_assert_eq!(self.state.coloring.conflicts(&self.graph), 0);
        ColoringSnapshot {
            assignment: self.state.coloring.clone(),
            iterations: self.state.iterations,
            conflicts: 0,
            done: self.state.status != SearchStatus::Searching,
            success: self.state.status == SearchStatus::Solved,
        }
    }

    fn visit(&mut self) {
        let st = &mut self.state;
        st.iterations += 1;

        let n = self.order.len();
        if st.depth == n {
            st.status = SearchStatus::Solved;
            return;
        }

        let v = self.order[st.depth];
        let start = st.cursors[st.depth];
        let graph = &self.graph;
        let coloring = &st.coloring;
        let safe = (start..self.config.max_colors)
            .find(|&c| graph.neighbors(v).all(|u| coloring.get(u) != Some(c)));

        match safe {
            Some(c) => {
                trace!("visit {}: vertex {v} <- color {c}", st.iterations);
                st.coloring.set(v, c);
                st.cursors[st.depth] = c + 1;
                st.depth += 1;
                if st.depth == n {
                    st.status = SearchStatus::Solved;
                    info!(
                        "backtracking solved {n} vertices with {} colors after {} visits",
                        self.config.max_colors, st.iterations
                    );
                }
            }
            None => {
                trace!("visit {}: vertex {v} exhausted, backtracking", st.iterations);
                st.coloring.unset(v);
                st.cursors[st.depth] = 0;
                if st.depth == 0 {
                    st.status = SearchStatus::Exhausted;
                    info!(
                        "backtracking exhausted: no {}-coloring after {} visits",
                        self.config.max_colors, st.iterations
                    );
                } else {
                    st.depth -= 1;
                }
            }
        }
    }
}

impl Stepper for BacktrackingColorer {
    type Snapshot = ColoringSnapshot;

    fn step(&mut self) -> ColoringSnapshot {
        BacktrackingColorer::step(self)
    }
}

fn vertex_order(graph: &Graph, order: VertexOrder) -> Vec<usize> {
    let mut vertices: Vec<usize> = (0..graph.vertex_count()).collect();
    if order == VertexOrder::LargestFirst {
        // Stable sort keeps index order among equal degrees.
        vertices.sort_by_key(|&v| std::cmp::Reverse(graph.degree(v)));
    }
    vertices
}
