//! Tests for palette resolution against a control source.

use std::cell::RefCell;

use tessel_core::{ColorId, PaletteControl, PaletteSource, Rgb, resolve};

struct Controls(RefCell<Vec<PaletteControl>>);

impl PaletteSource for Controls {
    fn locate_palette_controls(&self) -> Vec<PaletteControl> {
        self.0.borrow().clone()
    }
}

fn control(rgb: (u8, u8, u8), id: &str) -> PaletteControl {
    PaletteControl::new(Rgb::new(rgb.0, rgb.1, rgb.2), ColorId::from_control_id(id))
}

#[test]
fn test_duplicate_rgb_resolves_to_last_seen() {
    let source = Controls(RefCell::new(vec![
        control((255, 255, 255), "color-1"),
        control((0, 0, 0), "color-2"),
        control((255, 255, 255), "color-5"),
    ]));

    let first = resolve(&source);
    let second = resolve(&source);

    assert_eq!(first.get(Rgb::new(255, 255, 255)), Some(&ColorId::new("5")));
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_resolution_follows_control_changes() {
    let source = Controls(RefCell::new(vec![control((10, 20, 30), "color-4")]));
    assert!(resolve(&source).get(Rgb::new(10, 20, 30)).is_some());

    source.0.borrow_mut().clear();
    assert!(resolve(&source).is_empty());
}

#[test]
fn test_no_controls_gives_empty_palette() {
    let source = Controls(RefCell::new(Vec::new()));
    let palette = resolve(&source);
    assert!(palette.is_empty());
    assert_eq!(palette.get(Rgb::new(0, 0, 0)), None);
}
