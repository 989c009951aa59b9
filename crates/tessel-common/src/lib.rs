//! Common utilities for Tessel.
//!
//! This crate provides shared infrastructure used by every other crate:
//! - **Bitmap** - decoded RGBA pixel grids handed from image sources to the task builder
//! - **Warning System** - deduplicated warnings for non-fatal conditions such as palette misses
//! - **Logging** - one-time `env_logger` initialisation for binaries

pub mod bitmap;
pub mod logging;
pub mod warning;

pub use bitmap::{Bitmap, BitmapError};
