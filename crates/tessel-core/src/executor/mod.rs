//! Charge-gated task execution.
//!
//! The executor drains a task queue strictly in order, one task at a time.
//! Before every task it reads the surface's charge counter; when the counter
//! is zero it triggers a refill once and then polls at a fixed interval until
//! charges reappear. It never tracks charges itself: the external counter is
//! the only source of truth.
//!
//! ```text
//!            ┌──────────────┐ charges > 0  ┌──────────┐
//!   ────────►│CheckCapacity │─────────────►│ Dispatch │──┐
//!            └──────┬───────┘              └──────────┘  │
//!        charges = 0│  ▲ queue non-empty                 │
//!     trigger refill▼  └─────────────────────────────────┘
//!            ┌──────────────┐ charges > 0
//!            │   PollWait   │────────────► Dispatch
//!            └──────┬───────┘
//!                   └─ sleep(poll_interval), re-query
//! ```
//!
//! Without a [`CancelSignal`] or deadline a run blocks for as long as the
//! counter stays at zero.

mod cancel;
mod config;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub use cancel::CancelSignal;
pub use config::{
    DEFAULT_PAINT_MODE_SETTLE_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SETTLE_MS, ExecutorConfig,
    MIN_POLL_INTERVAL_MS,
};

use crate::clock::Clock;
use crate::error::RunError;
use crate::model::{Origin, PaintTask};
use crate::surface::{Action, ControlSurface};

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Tasks dispatched.
    pub dispatched: usize,
    /// Poll waits performed while out of charges.
    pub poll_cycles: u64,
    /// Refill requests issued.
    pub refill_triggers: u64,
    /// Total time spent in poll waits.
    pub waited: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    CheckCapacity,
    PollWait,
    Dispatch,
    Done,
}

/// Drives paint tasks through a [`ControlSurface`], paced by a [`Clock`].
pub struct Executor<S, C> {
    surface: S,
    clock: C,
    origin: Origin,
    config: ExecutorConfig,
    cancel: Option<CancelSignal>,
    deadline: Option<Instant>,
}

impl<S: ControlSurface, C: Clock> Executor<S, C> {
    /// An executor for tasks built against `origin`, with default pacing.
    pub fn new(surface: S, clock: C, origin: Origin) -> Self {
        Self {
            surface,
            clock,
            origin,
            config: ExecutorConfig::default(),
            cancel: None,
            deadline: None,
        }
    }

    /// Replace the pacing configuration.
    #[must_use]
    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Stop the run when `signal` is raised.
    #[must_use]
    pub fn with_cancel(mut self, signal: CancelSignal) -> Self {
        self.cancel = Some(signal);
        self
    }

    /// Stop waiting for charges once `deadline` passes.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Consume the executor and return its surface and clock.
    pub fn into_parts(self) -> (S, C) {
        (self.surface, self.clock)
    }

    /// Run every task in `tasks`, front to back.
    ///
    /// Each task is removed from the queue only after all of its sub-actions
    /// were issued, so after a failure `tasks` holds exactly the tasks that
    /// were not dispatched.
    ///
    /// # Errors
    ///
    /// - [`RunError::ControlSurfaceUnavailable`] when a control is missing
    ///   during dispatch.
    /// - [`RunError::Cancelled`] when the cancel signal is raised.
    /// - [`RunError::DeadlineExceeded`] when the deadline passes.
    pub fn run(&mut self, tasks: &mut VecDeque<PaintTask>) -> Result<RunReport, RunError> {
        let mut report = RunReport::default();
        let mut phase = Phase::CheckCapacity;

        log::info!("run: {} tasks queued", tasks.len());

        loop {
            phase = match phase {
                Phase::CheckCapacity => {
                    if tasks.is_empty() {
                        Phase::Done
                    } else {
                        self.guard(report.dispatched)?;
                        let charges = self.surface.query_capacity();
                        if charges > 0 {
                            Phase::Dispatch
                        } else {
                            log::info!(
                                "run: out of charges with {} tasks left; requesting refill",
                                tasks.len()
                            );
                            self.surface.trigger_refill();
                            report.refill_triggers += 1;
                            Phase::PollWait
                        }
                    }
                }
                Phase::PollWait => {
                    self.guard(report.dispatched)?;
                    let wait = self.bounded(self.config.poll_interval());
                    self.clock.sleep(wait);
                    report.poll_cycles += 1;
                    report.waited += wait;
                    self.guard(report.dispatched)?;

                    let charges = self.surface.query_capacity();
                    log::trace!("run: poll #{} sees {charges} charges", report.poll_cycles);
                    if charges > 0 {
                        Phase::Dispatch
                    } else {
                        Phase::PollWait
                    }
                }
                Phase::Dispatch => match tasks.front() {
                    Some(task) => {
                        self.dispatch(task, report.dispatched)?;
                        let _ = tasks.pop_front();
                        report.dispatched += 1;
                        Phase::CheckCapacity
                    }
                    None => Phase::Done,
                },
                Phase::Done => {
                    log::info!(
                        "run: finished {} tasks after {} poll waits",
                        report.dispatched,
                        report.poll_cycles
                    );
                    return Ok(report);
                }
            };
        }
    }

    /// [`run`](Self::run) over an owned task list.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run). The undispatched remainder is dropped;
    /// [`RunError::completed`] tells how far the run got.
    pub fn run_all(
        &mut self,
        tasks: impl IntoIterator<Item = PaintTask>,
    ) -> Result<RunReport, RunError> {
        let mut queue: VecDeque<PaintTask> = tasks.into_iter().collect();
        self.run(&mut queue)
    }

    /// Issue the sub-actions for one task, settling after each.
    fn dispatch(&mut self, task: &PaintTask, index: usize) -> Result<(), RunError> {
        let absolute = task.position();
        let steps = [
            (Action::EnterPaintMode, self.config.paint_mode_settle()),
            (
                Action::TargetCoordinate {
                    absolute,
                    relative: self.origin.relative(absolute),
                },
                self.config.settle(),
            ),
            (Action::SelectColor(task.color.clone()), self.config.settle()),
            (Action::Confirm, self.config.settle()),
        ];

        log::debug!(
            "run: task #{index} paints ({}, {}) with color {}",
            task.x,
            task.y,
            task.color
        );

        for (action, settle) in steps {
            self.surface.engage(action).map_err(|missing| {
                log::error!("run: {missing} at task #{index}; aborting");
                RunError::ControlSurfaceUnavailable {
                    control: missing.control,
                    task_index: index,
                    completed: index,
                }
            })?;
            self.clock.sleep(settle);
        }
        Ok(())
    }

    fn guard(&self, completed: usize) -> Result<(), RunError> {
        if self.cancel.as_ref().is_some_and(CancelSignal::is_cancelled) {
            log::info!("run: cancelled after {completed} tasks");
            return Err(RunError::Cancelled { completed });
        }
        if self.deadline.is_some_and(|deadline| self.clock.now() >= deadline) {
            log::warn!("run: deadline passed after {completed} tasks");
            return Err(RunError::DeadlineExceeded { completed });
        }
        Ok(())
    }

    /// `wait`, shortened so it does not sleep past the deadline.
    fn bounded(&self, wait: Duration) -> Duration {
        self.deadline.map_or(wait, |deadline| {
            wait.min(deadline.saturating_duration_since(self.clock.now()))
        })
    }
}

impl<S, C> std::fmt::Debug for Executor<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("origin", &self.origin)
            .field("config", &self.config)
            .field("cancellable", &self.cancel.is_some())
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}
