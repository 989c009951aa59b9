//! Error types for building and running task sequences.
//!
//! A pixel with no palette match is deliberately not represented here: it is
//! a silent skip, counted in [`BuildStats`](crate::BuildStats).

use strum_macros::Display;
use thiserror::Error;

use crate::surface::ControlKind;

/// Why an overlay could not be turned into tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NotReadyReason {
    /// No overlay is loaded.
    #[strum(to_string = "no overlay is loaded")]
    NoOverlay,
    /// The overlay has no decoded image yet.
    #[strum(to_string = "overlay image is missing")]
    MissingBitmap,
    /// The overlay has no placement coordinates yet.
    #[strum(to_string = "overlay start coordinates are missing")]
    MissingOrigin,
    /// The image has zero width or height.
    #[strum(to_string = "overlay image is empty")]
    EmptyBitmap,
    /// The origin, or the far corner of the image, is not representable.
    #[strum(to_string = "overlay coordinates overflow")]
    CoordinateOverflow,
}

/// Failure to build a task sequence. Raised before any task is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The overlay is missing or incomplete. Retrying later may succeed.
    #[error("overlay is not ready: {0}")]
    SourceNotReady(NotReadyReason),
}

/// Failure during a run. Tasks already dispatched stay dispatched; the
/// failing task and everything after it remain queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RunError {
    /// A control needed for dispatch is absent; the UI contract is broken.
    #[error("control surface unavailable: {control} missing while dispatching task #{task_index}")]
    ControlSurfaceUnavailable {
        /// The missing control.
        control: ControlKind,
        /// Zero-based index of the failing task within this run.
        task_index: usize,
        /// Tasks fully dispatched before the failure.
        completed: usize,
    },
    /// The caller raised the run's cancel signal.
    #[error("run cancelled after {completed} task(s)")]
    Cancelled {
        /// Tasks fully dispatched before cancellation.
        completed: usize,
    },
    /// The run's deadline passed while waiting for charges.
    #[error("run deadline exceeded after {completed} task(s)")]
    DeadlineExceeded {
        /// Tasks fully dispatched before the deadline.
        completed: usize,
    },
}

impl RunError {
    /// Number of tasks fully dispatched before the run stopped.
    #[must_use]
    pub const fn completed(&self) -> usize {
        match *self {
            Self::ControlSurfaceUnavailable { completed, .. }
            | Self::Cancelled { completed }
            | Self::DeadlineExceeded { completed } => completed,
        }
    }
}
