//! Palette snapshots: exact RGB → color identifier lookup.

use std::collections::BTreeMap;

use crate::model::{ColorId, Rgb};
use crate::surface::PaletteSource;

/// One selectable color as reported by the UI: its rendered color and the
/// identifier used to select it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteControl {
    /// The control's rendered color.
    pub rgb: Rgb,
    /// Identifier handed back when selecting this color.
    pub id: ColorId,
}

impl PaletteControl {
    /// Create a control entry.
    #[must_use]
    pub fn new(rgb: Rgb, id: impl Into<ColorId>) -> Self {
        Self { rgb, id: id.into() }
    }
}

/// An immutable snapshot of the available colors.
///
/// Lookup is exact-match only. When two controls render the same color the
/// one enumerated last wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: BTreeMap<Rgb, ColorId>,
}

impl Palette {
    /// Build a snapshot from controls in enumeration order.
    pub fn from_controls(controls: impl IntoIterator<Item = PaletteControl>) -> Self {
        let mut entries = BTreeMap::new();
        for control in controls {
            if let Some(previous) = entries.insert(control.rgb, control.id) {
                log::debug!(
                    "palette: {} offered by several controls; '{previous}' replaced",
                    control.rgb
                );
            }
        }
        Self { entries }
    }

    /// The identifier for exactly `rgb`, if any control renders it.
    #[must_use]
    pub fn get(&self, rgb: Rgb) -> Option<&ColorId> {
        self.entries.get(&rgb)
    }

    /// Whether some entry maps to `id`.
    #[must_use]
    pub fn contains_id(&self, id: &ColorId) -> bool {
        self.entries.values().any(|candidate| candidate == id)
    }

    /// Number of distinct colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no colors are available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by RGB value.
    pub fn iter(&self) -> impl Iterator<Item = (Rgb, &ColorId)> + '_ {
        self.entries.iter().map(|(rgb, id)| (*rgb, id))
    }
}

impl FromIterator<PaletteControl> for Palette {
    fn from_iter<I: IntoIterator<Item = PaletteControl>>(iter: I) -> Self {
        Self::from_controls(iter)
    }
}

/// Take a fresh palette snapshot from `source`.
///
/// Never cached: the set of available colors may change between builds.
pub fn resolve(source: &impl PaletteSource) -> Palette {
    let palette = Palette::from_controls(source.locate_palette_controls());
    log::debug!("palette: resolved {} colors", palette.len());
    palette
}
