//! Background step loop.

use super::{DriveSummary, StepDriver, Stepper};
use crossbeam_channel::{bounded, Receiver, SendTimeoutError};
use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Snapshots buffered between the worker and its reader by default.
pub const DEFAULT_BUFFER: usize = 64;

/// How often a blocked send re-checks the cancel flag.
const SEND_POLL: Duration = Duration::from_millis(10);

/// Runs a [`StepDriver`] loop on a dedicated thread.
///
/// The thread owns the engine for the whole run; the spawning side only
/// ever sees cloned snapshots arriving on [`snapshots`](Self::snapshots).
/// The channel is bounded: once `buffer` snapshots are waiting, the engine
/// pauses until the reader catches up, so no snapshot is lost and memory
/// stays flat. Cancelling or dropping the worker ends a paused loop.
pub struct StepWorker<E: Stepper> {
    receiver: Receiver<E::Snapshot>,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<(E, DriveSummary<E::Snapshot>)>,
}

impl<E> StepWorker<E>
where
    E: Stepper + Send + 'static,
    E::Snapshot: Send + 'static,
{
    /// Moves `engine` onto a new thread and starts stepping it, buffering
    /// up to [`DEFAULT_BUFFER`] snapshots.
    ///
    /// The driver's own cancel flag, if any, is replaced by the worker's.
    pub fn spawn(engine: E, driver: StepDriver) -> Self {
        Self::spawn_with_buffer(engine, driver, DEFAULT_BUFFER)
    }

    /// Like [`spawn`](Self::spawn) with a custom buffer size (at least 1).
    pub fn spawn_with_buffer(mut engine: E, driver: StepDriver, buffer: usize) -> Self {
        let (sender, receiver) = bounded(buffer.max(1));
        let cancel = Arc::new(AtomicBool::new(false));
        let driver = driver.with_cancel(Arc::clone(&cancel));
        let stop = Arc::clone(&cancel);

        let handle = std::thread::spawn(move || {
            let summary = driver.run(&mut engine, |snapshot| {
                let mut pending = snapshot.clone();
                loop {
                    match sender.send_timeout(pending, SEND_POLL) {
                        Ok(()) => break,
                        Err(SendTimeoutError::Timeout(back)) => {
                            if stop.load(Ordering::Relaxed) {
                                break;
                            }
                            pending = back;
                        }
                        Err(SendTimeoutError::Disconnected(_)) => {
                            warn!("snapshot receiver dropped, stopping worker");
                            stop.store(true, Ordering::Relaxed);
                            break;
                        }
                    }
                }
            });
            (engine, summary)
        });

        Self {
            receiver,
            cancel,
            handle,
        }
    }

    /// Snapshots in step order. The channel disconnects when the loop ends.
    pub fn snapshots(&self) -> &Receiver<E::Snapshot> {
        &self.receiver
    }

    /// Asks the loop to stop before its next step.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the loop to end and hands the engine back.
    pub fn join(self) -> std::thread::Result<(E, DriveSummary<E::Snapshot>)> {
        self.handle.join()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backtrack::{BacktrackConfig, BacktrackingColorer, SearchStatus};
    use crate::driver::StopReason;
    use crate::graph::Graph;

    #[test]
    fn test_worker_streams_every_snapshot() {
        let graph = Graph::cycle(10);
        let solver = BacktrackingColorer::new(graph.clone(), BacktrackConfig::default()).unwrap();
        let worker = StepWorker::spawn(solver, StepDriver::new());

        let received: Vec<_> = worker.snapshots().iter().collect();
        let (engine, summary) = worker.join().unwrap();

        assert_eq!(summary.stop, StopReason::Done);
        assert_eq!(received.len(), summary.steps);
        assert_eq!(engine.status(), SearchStatus::Solved);
        let last = received.last().unwrap();
        assert!(last.success);
        assert!(last.assignment.is_proper(&graph));
        for (i, snap) in received.iter().enumerate() {
            assert_eq!(snap.iterations, i + 1);
        }
    }

    #[test]
    fn test_unread_snapshots_stay_bounded() {
        let solver = BacktrackingColorer::new(
            Graph::complete(60),
            BacktrackConfig::default().with_max_colors(59),
        )
        .unwrap();
        let worker = StepWorker::spawn_with_buffer(solver, StepDriver::new(), 8);
        std::thread::sleep(Duration::from_millis(200));
        assert!(worker.snapshots().len() <= 8);
        assert!(!worker.is_finished());

        let first = worker.snapshots().recv().unwrap();
        assert_eq!(first.iterations, 1);
        worker.cancel();
        let (_, summary) = worker.join().unwrap();
        assert_eq!(summary.stop, StopReason::Cancelled);
    }

    #[test]
    fn test_worker_cancel() {
        // K_12 with 11 colors has a huge failing tree.
        let solver = BacktrackingColorer::new(
            Graph::complete(12),
            BacktrackConfig::default().with_max_colors(11),
        )
        .unwrap();
        let worker = StepWorker::spawn(solver, StepDriver::new());
        let first = worker.snapshots().recv().unwrap();
        assert_eq!(first.iterations, 1);
        worker.cancel();

        let (engine, summary) = worker.join().unwrap();
        assert_eq!(summary.stop, StopReason::Cancelled);
        assert_eq!(engine.status(), SearchStatus::Searching);
    }
}
