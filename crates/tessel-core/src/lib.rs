//! Core scheduling and quantization for Tessel.
//!
//! # Scope
//!
//! This crate provides:
//! - **Data Model** - [`PaintTask`], [`Origin`], [`Rgb`], [`ColorId`]
//! - **Palette Resolution** - exact-match RGB → color identifier snapshots
//! - **Task Building** - row-major decomposition of a bitmap into paint tasks
//! - **Execution** - a charge-gated, strictly sequential dispatch loop
//!
//! Everything that touches a real canvas UI (finding buttons, reading charge
//! counters, synthesizing clicks) sits behind the traits in [`surface`] and
//! [`clock`], so the algorithms here run unchanged against in-memory fakes.
//!
//! # Pipeline
//!
//! ```text
//! OverlaySource ──► build_from_source ──► Vec<PaintTask> ──► Executor::run ──► ControlSurface
//! PaletteSource ──┘
//! ```

pub mod builder;
pub mod clock;
pub mod error;
pub mod executor;
pub mod model;
pub mod palette;
pub mod surface;

pub use builder::{BuildStats, Plan, build, build_from_source, build_with_stats};
pub use clock::{Clock, SystemClock, VirtualClock};
pub use error::{BuildError, NotReadyReason, RunError};
pub use executor::{CancelSignal, Executor, ExecutorConfig, RunReport};
pub use model::{ColorId, DEFAULT_TILE_SIZE, Origin, OriginBasis, PaintTask, Point, Rgb};
pub use palette::{Palette, PaletteControl, resolve};
pub use surface::{
    Action, ControlKind, ControlSurface, MissingControl, Overlay, OverlaySource, PaletteSource,
};
pub use tessel_common::Bitmap;
