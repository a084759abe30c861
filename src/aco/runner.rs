//! ACO round loop.

use super::config::{AcoConfig, ColorChoice};
use super::pheromone::PheromoneTable;
use crate::driver::Stepper;
use crate::error::InstanceError;
use crate::graph::{Coloring, ColoringSnapshot, Graph};
use crate::random::rng_from_seed;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Everything the colony carries between rounds besides its RNG.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcoState {
    pub pheromone: PheromoneTable,

    /// Best coloring so far; unassigned before the first round.
    pub best: Coloring,

    /// Conflicts of `best`; `usize::MAX` before the first round.
    pub best_cost: usize,

    pub rounds: usize,
}

/// Graph coloring by ant colony optimization.
///
/// One [`step`](Self::step) is one round:
///
/// 1. every ant builds a full coloring, vertex by vertex in index order,
///    sampling each color with probability proportional to that vertex's
///    pheromone (restricted by [`ColorChoice`]);
/// 2. each ant deposits `1 / (1 + conflicts)` on the entry of every
///    vertex's chosen color;
/// 3. the whole table evaporates once.
///
/// The best (fewest conflicts) coloring across all ants and rounds is
/// tracked; the run ends at zero conflicts or after `max_rounds`.
pub struct AntColonyColorer<R: Rng = StdRng> {
    graph: Graph,
    config: AcoConfig,
    state: AcoState,
    rng: R,
}

impl AntColonyColorer<StdRng> {
    /// Creates a colony seeded from `config.seed`.
    pub fn new(graph: Graph, config: AcoConfig) -> Result<Self, InstanceError> {
        let rng = rng_from_seed(config.seed);
        Self::with_rng(graph, config, rng)
    }
}

impl<R: Rng> AntColonyColorer<R> {
    /// Creates a colony drawing from an injected RNG. `config.seed` is ignored.
    pub fn with_rng(graph: Graph, config: AcoConfig, rng: R) -> Result<Self, InstanceError> {
        let state = AcoState {
            pheromone: PheromoneTable::new(graph.vertex_count(), config.max_colors),
            best: Coloring::unassigned(graph.vertex_count()),
            best_cost: usize::MAX,
            rounds: 0,
        };
        Self::from_state(graph, config, state, rng)
    }

    /// Continues a run from a captured [`state`](Self::state).
    pub fn from_state(
        graph: Graph,
        config: AcoConfig,
        state: AcoState,
        rng: R,
    ) -> Result<Self, InstanceError> {
        config.validate()?;
        let n = graph.vertex_count();
        if state.pheromone.vertices() != n
            || state.pheromone.colors() != config.max_colors
            || state.best.len() != n
        {
            return Err(InstanceError::param(
                "state",
                format!(
                    "colony state does not match {n} vertices and {} colors",
                    config.max_colors
                ),
            ));
        }
        Ok(Self {
            graph,
            config,
            state,
            rng,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    pub fn state(&self) -> &AcoState {
        &self.state
    }

    pub fn pheromone(&self) -> &PheromoneTable {
        &self.state.pheromone
    }

    pub fn rounds(&self) -> usize {
        self.state.rounds
    }

    pub fn is_done(&self) -> bool {
        self.state.best_cost == 0 || self.state.rounds >= self.config.max_rounds
    }

    /// Runs one round unless already done.
    pub fn step(&mut self) -> ColoringSnapshot {
        if !self.is_done() {
            self.round();
        }
        self.snapshot()
    }

    /// Runs rounds until a conflict-free coloring or the round budget.
    pub fn run(&mut self) -> ColoringSnapshot {
        while !self.is_done() {
            self.round();
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> ColoringSnapshot {
        let success = self.state.best_cost == 0;
        ColoringSnapshot {
            assignment: self.state.best.clone(),
            iterations: self.state.rounds,
            conflicts: self.state.best_cost,
            done: self.is_done(),
            success,
        }
    }

    fn round(&mut self) {
        let ants: Vec<(Coloring, usize)> = (0..self.config.num_ants)
            .map(|_| {
                let coloring = build_coloring(
                    &self.graph,
                    &self.state.pheromone,
                    self.config.choice,
                    &mut self.rng,
                );
                let cost = coloring.conflicts(&self.graph);
                (coloring, cost)
            })
            .collect();

        let state = &mut self.state;
        state.rounds += 1;

        for (coloring, cost) in ants {
            let reward = 1.0 / (1.0 + cost as f64);
            for (v, color) in coloring.as_slice().iter().enumerate() {
                if let Some(c) = *color {
                    state.pheromone.deposit(v, c, reward);
                }
            }
            if cost < state.best_cost {
                debug!("round {}: new best coloring with {cost} conflicts", state.rounds);
                state.best = coloring;
                state.best_cost = cost;
            }
        }

        state
            .pheromone
            .evaporate(self.config.evaporation_rate, self.config.min_pheromone);

        if state.best_cost == 0 {
            info!("ant colony found a proper coloring in round {}", state.rounds);
        } else if state.rounds >= self.config.max_rounds {
            info!(
                "ant colony stopped after {} rounds with {} conflicts",
                state.rounds, state.best_cost
            );
        }
    }
}

impl<R: Rng> Stepper for AntColonyColorer<R> {
    type Snapshot = ColoringSnapshot;

    fn step(&mut self) -> ColoringSnapshot {
        AntColonyColorer::step(self)
    }
}

/// One ant's tour over the vertices.
fn build_coloring<R: Rng>(
    graph: &Graph,
    pheromone: &PheromoneTable,
    choice: ColorChoice,
    rng: &mut R,
) -> Coloring {
    let n = graph.vertex_count();
    let k = pheromone.colors();
    let all: Vec<usize> = (0..k).collect();
    let mut coloring = Coloring::unassigned(n);

    for v in 0..n {
        let candidates: Vec<usize> = match choice {
            ColorChoice::PheromoneOnly => all.clone(),
            ColorChoice::AvoidNeighborColors => all
                .iter()
                .copied()
                .filter(|&c| graph.neighbors(v).all(|u| coloring.get(u) != Some(c)))
                .collect(),
        };
        let color = match pheromone.sample(v, &candidates, rng) {
            Some(c) => c,
            None => rng.random_range(0..k),
        };
        coloring.set(v, color);
    }

    coloring
}
