//! Integration tests for the file-backed overlay and palette sources.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use tempfile::TempDir;
use tessel_core::{
    BuildError, ColorId, NotReadyReason, Origin, OverlaySource, PaintTask, PaletteSource, Rgb,
    build_from_source, resolve,
};
use tessel_overlay::{FileOverlay, FilePalette, OverlayError};

/// 3x2 image: red, transparent, blue / unmatched green, red, blue.
fn sample_image() -> image::RgbaImage {
    image::RgbaImage::from_fn(3, 2, |x, y| match (x, y) {
        (0, 0) | (1, 1) => image::Rgba([255, 0, 0, 255]),
        (1, 0) => image::Rgba([255, 0, 0, 0]),
        (0, 1) => image::Rgba([0, 200, 0, 255]),
        _ => image::Rgba([0, 0, 255, 255]),
    })
}

fn write(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
}

fn write_palette(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("palette.json");
    write(
        &path,
        r##"{
            "controls": [
                { "id": "color-7", "color": "rgb(255, 0, 0)" },
                { "id": "color-3", "color": "#0000ff" },
                { "id": "color-9", "color": "rgba(0, 0, 0, 1)" }
            ]
        }"##,
    );
    path
}

#[test]
fn test_png_overlay_end_to_end() {
    let dir = TempDir::new().unwrap();
    sample_image().save(dir.path().join("art.png")).unwrap();
    let overlay_path = dir.path().join("overlay.json");
    write(
        &overlay_path,
        r#"{ "image": "art.png", "region": { "x": 1, "y": 0 }, "pixel": { "x": 10, "y": 20 } }"#,
    );
    let palette_path = write_palette(dir.path());

    let plan = build_from_source(&FileOverlay::new(&overlay_path), &FilePalette::new(&palette_path))
        .unwrap();

    assert_eq!(plan.origin, Origin::new(1010, 20));
    assert_eq!(
        plan.tasks,
        vec![
            PaintTask::new(1010, 20, ColorId::new("7")),
            PaintTask::new(1012, 20, ColorId::new("3")),
            PaintTask::new(1011, 21, ColorId::new("7")),
            PaintTask::new(1012, 21, ColorId::new("3")),
        ]
    );
    assert_eq!(plan.stats.transparent, 1);
    assert_eq!(plan.stats.unmatched, 1);
}

#[test]
fn test_data_url_overlay() {
    let dir = TempDir::new().unwrap();
    let mut png = Vec::new();
    sample_image()
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
    let overlay_path = dir.path().join("overlay.json");
    write(
        &overlay_path,
        &format!(
            r#"{{ "image": "data:image/png;base64,{encoded}", "region": {{ "x": 0, "y": 0 }}, "pixel": {{ "x": 0, "y": 0 }}, "tile_size": 500 }}"#
        ),
    );

    let overlay = FileOverlay::new(&overlay_path).overlay().unwrap();
    let bitmap = overlay.bitmap.unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (3, 2));
    assert_eq!(bitmap.pixel(2, 1), Some([0, 0, 255, 255]));
    assert_eq!(overlay.basis.unwrap().tile_size, Some(500));
}

#[test]
fn test_missing_manifest_is_no_overlay() {
    let dir = TempDir::new().unwrap();
    let palette_path = write_palette(dir.path());
    let overlay = FileOverlay::new(dir.path().join("absent.json"));

    assert!(overlay.overlay().is_none());
    assert!(matches!(overlay.load(), Err(OverlayError::Io { .. })));
    assert_eq!(
        build_from_source(&overlay, &FilePalette::new(palette_path)).unwrap_err(),
        BuildError::SourceNotReady(NotReadyReason::NoOverlay)
    );
}

#[test]
fn test_missing_image_is_incomplete_overlay() {
    let dir = TempDir::new().unwrap();
    let overlay_path = dir.path().join("overlay.json");
    write(
        &overlay_path,
        r#"{ "image": "nowhere.png", "region": { "x": 0, "y": 0 }, "pixel": { "x": 0, "y": 0 } }"#,
    );
    let palette_path = write_palette(dir.path());

    let overlay = FileOverlay::new(&overlay_path).overlay().unwrap();
    assert!(overlay.bitmap.is_none());
    assert!(overlay.basis.is_some());
    assert_eq!(
        build_from_source(&FileOverlay::new(&overlay_path), &FilePalette::new(palette_path))
            .unwrap_err(),
        BuildError::SourceNotReady(NotReadyReason::MissingBitmap)
    );
}

#[test]
fn test_malformed_manifest_reports_path() {
    let dir = TempDir::new().unwrap();
    let overlay_path = dir.path().join("overlay.json");
    write(&overlay_path, r#"{ "image": 5 }"#);

    let err = FileOverlay::new(&overlay_path).load().unwrap_err();
    assert!(matches!(err, OverlayError::Manifest { .. }));
    assert!(err.to_string().contains("overlay.json"));
}

#[test]
fn test_palette_skips_bad_entries() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("palette.json");
    write(
        &path,
        r#"{ "controls": [
            { "id": "color-1", "color": "rgb(1, 2, 3)" },
            { "id": "color-2", "color": "hotpink" }
        ] }"#,
    );
    let source = FilePalette::new(&path);

    let controls = source.locate_palette_controls();
    assert_eq!(controls.len(), 1);
    assert_eq!(controls[0].id, ColorId::new("1"));
    assert!(matches!(source.try_controls(), Err(OverlayError::Color(_))));
}

#[test]
fn test_palette_file_reread_each_resolve() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("palette.json");
    write(&path, r##"{ "controls": [ { "id": "color-1", "color": "#000" } ] }"##);
    let source = FilePalette::new(&path);
    assert_eq!(resolve(&source).get(Rgb::new(0, 0, 0)), Some(&ColorId::new("1")));

    write(&path, r##"{ "controls": [ { "id": "color-4", "color": "#000" } ] }"##);
    assert_eq!(resolve(&source).get(Rgb::new(0, 0, 0)), Some(&ColorId::new("4")));
}
