//! Bitmap → paint task decomposition.
//!
//! Pixels are visited row-major. A pixel becomes a task only when it is not
//! fully transparent and its RGB value is present in the palette snapshot.
//! There is no nearest-color fallback: the overlay is expected to be
//! quantized to the canvas palette already, and an unmatched pixel is skipped
//! rather than painted in the wrong color.

use std::collections::BTreeSet;

use tessel_common::Bitmap;
use tessel_common::warning::warn_once;

use crate::error::{BuildError, NotReadyReason};
use crate::model::{Origin, PaintTask, Rgb};
use crate::palette::{Palette, resolve};
use crate::surface::{OverlaySource, PaletteSource};

/// Counters describing one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Pixels visited.
    pub pixels: u64,
    /// Pixels skipped because alpha was zero.
    pub transparent: u64,
    /// Pixels skipped because their color is not in the palette.
    pub unmatched: u64,
    /// Tasks emitted.
    pub emitted: u64,
    /// Distinct colors that had no palette entry.
    pub unmatched_colors: BTreeSet<Rgb>,
}

/// Everything produced by [`build_from_source`].
#[derive(Debug, Clone)]
pub struct Plan {
    /// Origin the tasks were placed against. Hand this to the executor.
    pub origin: Origin,
    /// Tasks in row-major order.
    pub tasks: Vec<PaintTask>,
    /// Build counters.
    pub stats: BuildStats,
    /// The palette snapshot the tasks were resolved with.
    pub palette: Palette,
}

/// Decompose `bitmap` into paint tasks placed at `origin`.
///
/// # Errors
///
/// Returns [`BuildError::SourceNotReady`] if the bitmap is empty or the far
/// corner of the image would overflow the coordinate space. Both are checked
/// before any pixel is visited.
pub fn build(
    bitmap: &Bitmap,
    origin: Origin,
    palette: &Palette,
) -> Result<Vec<PaintTask>, BuildError> {
    build_with_stats(bitmap, origin, palette).map(|(tasks, _)| tasks)
}

/// [`build`], also returning [`BuildStats`].
///
/// Each distinct unmatched color is reported once through
/// [`warn_once`].
///
/// # Errors
///
/// Same as [`build`].
pub fn build_with_stats(
    bitmap: &Bitmap,
    origin: Origin,
    palette: &Palette,
) -> Result<(Vec<PaintTask>, BuildStats), BuildError> {
    check_bounds(bitmap, origin)?;

    let mut tasks = Vec::new();
    let mut stats = BuildStats::default();

    for (local_x, local_y, px) in bitmap.pixels() {
        stats.pixels += 1;

        if px[3] == 0 {
            stats.transparent += 1;
            continue;
        }

        let rgb = Rgb::from_rgba(px);
        let Some(color) = palette.get(rgb) else {
            stats.unmatched += 1;
            let _ = stats.unmatched_colors.insert(rgb);
            continue;
        };

        let at = origin.absolute(local_x, local_y);
        tasks.push(PaintTask::new(at.x, at.y, color.clone()));
    }

    stats.emitted = tasks.len() as u64;

    for rgb in &stats.unmatched_colors {
        warn_once("palette", &format!("no palette entry for {rgb}; pixels skipped"));
    }
    log::debug!(
        "build: {} tasks from {}x{} bitmap at ({}, {}); {} transparent, {} unmatched",
        stats.emitted,
        bitmap.width(),
        bitmap.height(),
        origin.x,
        origin.y,
        stats.transparent,
        stats.unmatched,
    );

    Ok((tasks, stats))
}

/// Read the overlay, take a fresh palette snapshot, and build.
///
/// The overlay is checked first; nothing is resolved or built when it is not
/// ready.
///
/// # Errors
///
/// Returns [`BuildError::SourceNotReady`] if there is no overlay, it lacks an
/// image or start coordinates, or the coordinates overflow.
pub fn build_from_source(
    overlay_source: &impl OverlaySource,
    palette_source: &impl PaletteSource,
) -> Result<Plan, BuildError> {
    let not_ready = BuildError::SourceNotReady;

    let overlay = overlay_source
        .overlay()
        .ok_or(not_ready(NotReadyReason::NoOverlay))?;
    let bitmap = overlay
        .bitmap
        .ok_or(not_ready(NotReadyReason::MissingBitmap))?;
    let basis = overlay
        .basis
        .ok_or(not_ready(NotReadyReason::MissingOrigin))?;
    let origin =
        Origin::from_basis(&basis).ok_or(not_ready(NotReadyReason::CoordinateOverflow))?;
    check_bounds(&bitmap, origin)?;

    let palette = resolve(palette_source);
    let (tasks, stats) = build_with_stats(&bitmap, origin, &palette)?;

    log::info!(
        "built {} tasks at origin ({}, {}) using {} palette colors",
        tasks.len(),
        origin.x,
        origin.y,
        palette.len()
    );

    Ok(Plan {
        origin,
        tasks,
        stats,
        palette,
    })
}

fn check_bounds(bitmap: &Bitmap, origin: Origin) -> Result<(), BuildError> {
    if bitmap.is_empty() {
        return Err(BuildError::SourceNotReady(NotReadyReason::EmptyBitmap));
    }
    let fits = origin.x.checked_add(i64::from(bitmap.width())).is_some()
        && origin.y.checked_add(i64::from(bitmap.height())).is_some();
    if fits {
        Ok(())
    } else {
        Err(BuildError::SourceNotReady(
            NotReadyReason::CoordinateOverflow,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColorId;
    use crate::palette::PaletteControl;

    fn red_palette() -> Palette {
        Palette::from_controls([PaletteControl::new(Rgb::new(255, 0, 0), "7")])
    }

    #[test]
    fn test_task_at_origin_plus_offset() {
        let bitmap = Bitmap::from_fn(5, 5, |x, y| {
            if (x, y) == (3, 4) {
                [255, 0, 0, 255]
            } else {
                [0, 0, 0, 0]
            }
        });
        let tasks = build(&bitmap, Origin::new(100, 200), &red_palette()).unwrap();
        assert_eq!(tasks, vec![PaintTask::new(103, 204, ColorId::new("7"))]);
    }

    #[test]
    fn test_partial_alpha_is_paintable() {
        let bitmap = Bitmap::from_fn(1, 1, |_, _| [255, 0, 0, 1]);
        let tasks = build(&bitmap, Origin::default(), &red_palette()).unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn test_empty_bitmap_not_ready() {
        let bitmap = Bitmap::new(0, 0, Vec::new()).unwrap();
        assert_eq!(
            build(&bitmap, Origin::default(), &red_palette()),
            Err(BuildError::SourceNotReady(NotReadyReason::EmptyBitmap))
        );
    }

    #[test]
    fn test_far_corner_overflow_not_ready() {
        let bitmap = Bitmap::from_fn(2, 2, |_, _| [255, 0, 0, 255]);
        assert_eq!(
            build(&bitmap, Origin::new(i64::MAX - 1, 0), &red_palette()),
            Err(BuildError::SourceNotReady(
                NotReadyReason::CoordinateOverflow
            ))
        );
    }

    #[test]
    fn test_stats_count_skips() {
        let bitmap = Bitmap::from_fn(3, 1, |x, _| match x {
            0 => [255, 0, 0, 255],
            1 => [1, 2, 3, 255],
            _ => [255, 0, 0, 0],
        });
        let (tasks, stats) = build_with_stats(&bitmap, Origin::default(), &red_palette()).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(stats.pixels, 3);
        assert_eq!(stats.transparent, 1);
        assert_eq!(stats.unmatched, 1);
        assert_eq!(stats.emitted, 1);
        assert!(stats.unmatched_colors.contains(&Rgb::new(1, 2, 3)));
    }
}
