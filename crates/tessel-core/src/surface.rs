//! Capabilities the core needs from the outside world.
//!
//! A real implementation drives a live canvas page; tests and the simulator
//! implement these traits in memory. None of the methods are expected to
//! verify that an action took visible effect.

use strum_macros::Display;
use tessel_common::Bitmap;
use thiserror::Error;

use crate::model::{ColorId, OriginBasis, Point};
use crate::palette::PaletteControl;

/// A UI control the executor may need during dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ControlKind {
    /// The button that enters paint mode and shows the charge counter.
    #[strum(to_string = "paint button")]
    PaintButton,
    /// The board canvas receiving coordinate clicks.
    #[strum(to_string = "canvas")]
    Canvas,
    /// A color selection control.
    #[strum(to_string = "color button")]
    ColorButton,
    /// The control that commits a placed pixel.
    #[strum(to_string = "confirm button")]
    ConfirmButton,
}

/// One sub-action of a paint dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Make sure the paint UI is open. Implementations may no-op when it
    /// already is.
    EnterPaintMode,
    /// Click the canvas at a coordinate.
    TargetCoordinate {
        /// Absolute canvas coordinate of the task.
        absolute: Point,
        /// The same coordinate relative to the run's origin.
        relative: Point,
    },
    /// Select a palette color.
    SelectColor(ColorId),
    /// Commit the pending pixel.
    Confirm,
}

impl Action {
    /// The control this action operates on.
    #[must_use]
    pub const fn control(&self) -> ControlKind {
        match self {
            Self::EnterPaintMode => ControlKind::PaintButton,
            Self::TargetCoordinate { .. } => ControlKind::Canvas,
            Self::SelectColor(_) => ControlKind::ColorButton,
            Self::Confirm => ControlKind::ConfirmButton,
        }
    }
}

/// A required control could not be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{control} not found")]
pub struct MissingControl {
    /// Which control was missing.
    pub control: ControlKind,
}

impl MissingControl {
    /// Report `control` as missing.
    #[must_use]
    pub const fn new(control: ControlKind) -> Self {
        Self { control }
    }
}

/// The automation target: charge counter plus clickable controls.
pub trait ControlSurface {
    /// Current number of available charges. Read fresh on every call.
    fn query_capacity(&mut self) -> u32;

    /// Ask the UI to refill or activate charges. Fire-and-forget.
    fn trigger_refill(&mut self);

    /// Perform one sub-action.
    ///
    /// # Errors
    ///
    /// Returns [`MissingControl`] if the control the action needs is absent.
    fn engage(&mut self, action: Action) -> Result<(), MissingControl>;
}

impl<T: ControlSurface + ?Sized> ControlSurface for &mut T {
    fn query_capacity(&mut self) -> u32 {
        (**self).query_capacity()
    }

    fn trigger_refill(&mut self) {
        (**self).trigger_refill();
    }

    fn engage(&mut self, action: Action) -> Result<(), MissingControl> {
        (**self).engage(action)
    }
}

/// Enumerates the color controls currently offered by the UI.
pub trait PaletteSource {
    /// Every available color control, in UI order.
    fn locate_palette_controls(&self) -> Vec<PaletteControl>;
}

impl<T: PaletteSource + ?Sized> PaletteSource for &T {
    fn locate_palette_controls(&self) -> Vec<PaletteControl> {
        (**self).locate_palette_controls()
    }
}

/// What an overlay currently reports. Either part may still be missing.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    /// The decoded reference image.
    pub bitmap: Option<Bitmap>,
    /// Where the image's top-left pixel goes.
    pub basis: Option<OriginBasis>,
}

/// Provides the reference image and its placement.
pub trait OverlaySource {
    /// The current overlay, or `None` when no overlay is loaded at all.
    fn overlay(&self) -> Option<Overlay>;
}

impl<T: OverlaySource + ?Sized> OverlaySource for &T {
    fn overlay(&self) -> Option<Overlay> {
        (**self).overlay()
    }
}
