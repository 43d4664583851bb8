//! Supervised sequential execution of ordered steps under a deadline.
//!
//! A [`TaskRunner`] executes its registered steps strictly in registration
//! order, one at a time, on a background thread. The foreground `start`
//! call races that run against two stop conditions:
//!
//! - the **deadline**, anchored at construction time (construct the runner
//!   immediately before use);
//! - an **interrupt**, delivered through an injectable [`InterruptHandle`]
//!   rather than a platform signal API, so the embedding application
//!   decides what "interrupt" means (ctrl-c, admin endpoint, test trigger).
//!
//! Exactly one terminal outcome is reached: `Ok(())` when every step
//! completed, [`RunError::DeadlineExceeded`], or [`RunError::Interrupted`].
//! Cancellation is cooperative at step granularity — an in-flight step is
//! never preempted; on timeout the runner stops waiting for it and the
//! background thread is left to finish unobserved. A runner is single-use:
//! `start` consumes it.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{after, bounded, select, Receiver, Sender};
use tracing::{debug, info, trace, warn};

use crate::core::RunError;

type Step = Box<dyn FnMut(usize) + Send>;

/// Injectable interrupt source for a [`TaskRunner`].
///
/// Cloneable and sendable; `interrupt` never blocks. The first delivered
/// interrupt stops the run at the next step boundary; later deliveries
/// coalesce into it.
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    tx: Sender<()>,
}

impl InterruptHandle {
    /// Request that the run stop before its next step.
    pub fn interrupt(&self) {
        // Buffered one deep: delivery never blocks, duplicates coalesce.
        let _ = self.tx.try_send(());
    }
}

/// Runs an ordered set of steps within a deadline, stoppable by interrupt.
pub struct TaskRunner {
    /// Fires once the deadline elapses. Anchored at construction.
    deadline: Receiver<Instant>,
    /// Interrupt delivery channel, polled at each step boundary.
    interrupt_rx: Receiver<()>,
    interrupt_tx: Sender<()>,
    /// Steps executed synchronously in index order.
    steps: Vec<Step>,
}

impl TaskRunner {
    /// Create a runner whose deadline starts counting now.
    #[must_use]
    pub fn new(deadline: Duration) -> Self {
        let (interrupt_tx, interrupt_rx) = bounded(1);
        Self {
            deadline: after(deadline),
            interrupt_rx,
            interrupt_tx,
            steps: Vec::new(),
        }
    }

    /// Append a step. Steps receive their zero-based index and run in
    /// registration order.
    pub fn add<F>(&mut self, step: F)
    where
        F: FnMut(usize) + Send + 'static,
    {
        self.steps.push(Box::new(step));
    }

    /// Obtain a handle that can interrupt this run.
    #[must_use]
    pub fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle {
            tx: self.interrupt_tx.clone(),
        }
    }

    /// Execute all steps, blocking until one terminal outcome is reached.
    ///
    /// Consuming `self` makes the runner single-use; construct a new runner
    /// per execution.
    ///
    /// # Errors
    ///
    /// - [`RunError::DeadlineExceeded`] if the deadline elapsed first.
    /// - [`RunError::Interrupted`] if an interrupt was observed at a step
    ///   boundary before all steps completed.
    ///
    /// # Panics
    ///
    /// Panics if the background thread cannot be spawned, or if a step
    /// panicked (the panic is reported, not swallowed).
    pub fn start(self) -> Result<(), RunError> {
        let Self {
            deadline,
            interrupt_rx,
            steps,
            ..
        } = self;

        info!(steps = steps.len(), "runner started");

        // One-shot completion channel; the background thread reports the
        // run outcome exactly once.
        let (complete_tx, complete_rx) = bounded(1);

        thread::Builder::new()
            .name("corral-runner".into())
            .spawn(move || {
                let _ = complete_tx.send(run_steps(steps, &interrupt_rx));
            })
            .expect("failed to spawn runner thread");

        select! {
            recv(complete_rx) -> outcome => {
                outcome.expect("runner thread exited without reporting")
            }
            recv(deadline) -> _ => {
                warn!("deadline exceeded, abandoning in-flight run");
                Err(RunError::DeadlineExceeded)
            }
        }
    }
}

/// Execute each registered step, checking for an interrupt (without
/// blocking) before starting the next one.
fn run_steps(mut steps: Vec<Step>, interrupt: &Receiver<()>) -> Result<(), RunError> {
    for (index, step) in steps.iter_mut().enumerate() {
        if interrupt.try_recv().is_ok() {
            info!(index, "interrupt observed, stopping before step");
            return Err(RunError::Interrupted);
        }
        trace!(index, "running step");
        step(index);
    }

    debug!("all steps completed");
    Ok(())
}
