//! Stepping contract and drivers.
//!
//! Every engine in this crate is a synchronous state machine: a call to
//! [`Stepper::step`] does one bounded unit of work and returns an owned
//! snapshot. Pacing, step limits and cancellation live here, outside the
//! engines.
//!
//! - [`StepDriver`]: runs the step loop on the calling thread and hands each
//!   snapshot to a callback.
//! - [`StepWorker`]: runs the same loop on a dedicated thread. The worker
//!   owns the engine; snapshots reach the reader through a channel.

mod worker;

pub use worker::{StepWorker, DEFAULT_BUFFER};

use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A per-step snapshot that knows whether its engine has terminated.
pub trait Progress {
    /// The engine will produce no further change.
    fn is_done(&self) -> bool;
}

/// An engine that can be advanced one bounded unit of work at a time.
pub trait Stepper {
    /// Owned view of the engine state after a step.
    type Snapshot: Progress + Clone;

    /// Performs one unit of work. Calling `step` after termination returns
    /// the final snapshot again without changing state.
    fn step(&mut self) -> Self::Snapshot;
}

/// Why a drive loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The engine reported `is_done`.
    Done,
    /// `max_steps` steps were taken.
    StepLimit,
    /// The cancel flag was raised.
    Cancelled,
}

/// Outcome of a drive loop.
#[derive(Debug, Clone)]
pub struct DriveSummary<S> {
    /// Last snapshot produced, if any step ran.
    pub last: Option<S>,

    /// Number of `step` calls made.
    pub steps: usize,

    pub stop: StopReason,
}

/// Synchronous step loop with a step limit, pacing interval and
/// cooperative cancellation.
///
/// # Examples
///
/// ```
/// use np_solvers::backtrack::{BacktrackConfig, BacktrackingColorer};
/// use np_solvers::driver::{StepDriver, StopReason};
/// use np_solvers::graph::Graph;
///
/// let mut solver = BacktrackingColorer::new(Graph::cycle(6), BacktrackConfig::default())?;
/// let mut frames = 0;
/// let summary = StepDriver::new().run(&mut solver, |_snapshot| frames += 1);
/// assert_eq!(summary.stop, StopReason::Done);
/// assert_eq!(frames, summary.steps);
/// # Ok::<(), np_solvers::error::InstanceError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct StepDriver {
    /// Maximum steps. 0 = no limit.
    pub max_steps: usize,

    /// Pause between steps, for display-paced loops.
    pub interval: Option<Duration>,

    /// Checked before every step.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl StepDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_steps(mut self, n: usize) -> Self {
        self.max_steps = n;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Steps `engine` until it is done, the step limit is hit, or the cancel
    /// flag is raised. Every snapshot is passed to `on_snapshot`.
    pub fn run<E, F>(&self, engine: &mut E, mut on_snapshot: F) -> DriveSummary<E::Snapshot>
    where
        E: Stepper,
        F: FnMut(&E::Snapshot),
    {
        let mut last = None;
        let mut steps = 0usize;

        let stop = loop {
            if self.is_cancelled() {
                break StopReason::Cancelled;
            }
            if self.max_steps > 0 && steps >= self.max_steps {
                break StopReason::StepLimit;
            }

            let snapshot = engine.step();
            steps += 1;
            on_snapshot(&snapshot);
            let done = snapshot.is_done();
            last = Some(snapshot);

            if done {
                break StopReason::Done;
            }
            if let Some(pause) = self.interval {
                std::thread::sleep(pause);
            }
        };

        debug!("drive loop stopped after {steps} steps: {stop:?}");
        DriveSummary { last, steps, stop }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
