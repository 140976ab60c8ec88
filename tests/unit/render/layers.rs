use std::io::Cursor;
use std::sync::Arc;

use super::*;
use crate::edit::model::{BlendMode, Placement};

fn solid(w: u32, h: u32, px: [u8; 4]) -> RasterBuffer {
    RasterBuffer::solid(w, h, px).unwrap()
}

fn layer(id: &str, px: [u8; 4], placement: Placement) -> OverlayImage {
    OverlayImage::new(id, OverlaySource::Raster(solid(4, 4, px))).with_placement(placement)
}

fn full() -> Placement {
    Placement {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
    }
}

#[test]
fn empty_stack_is_identity() {
    let base = solid(5, 5, [1, 2, 3, 255]);
    let out = apply_layers(&base, &[]).unwrap();
    assert_eq!(out.raster, base);
    assert!(out.skipped.is_empty());
}

#[test]
fn zero_opacity_leaves_base_exactly() {
    let base = solid(5, 5, [1, 2, 3, 200]);
    let overlay = layer("a", [255, 255, 255, 255], full()).with_opacity(0.0);
    let out = apply_layers(&base, &[overlay]).unwrap();
    assert_eq!(out.raster, base);
}

#[test]
fn opaque_source_over_replaces_covered_area() {
    let base = solid(10, 10, [0, 0, 0, 255]);
    let overlay = layer(
        "a",
        [255, 0, 0, 255],
        Placement {
            x: 50.0,
            y: 0.0,
            width: 50.0,
            height: 100.0,
        },
    );
    let out = apply_layers(&base, &[overlay]).unwrap();
    assert_eq!(out.raster.pixel(4, 5), Some([0, 0, 0, 255]));
    assert_eq!(out.raster.pixel(5, 5), Some([255, 0, 0, 255]));
    assert_eq!(out.raster.pixel(9, 9), Some([255, 0, 0, 255]));
}

#[test]
fn later_overlay_wins_where_they_overlap() {
    let base = solid(10, 10, [0, 0, 0, 255]);
    let a = layer(
        "a",
        [255, 0, 0, 255],
        Placement {
            x: 0.0,
            y: 0.0,
            width: 60.0,
            height: 60.0,
        },
    );
    let b = layer(
        "b",
        [0, 0, 255, 255],
        Placement {
            x: 40.0,
            y: 40.0,
            width: 60.0,
            height: 60.0,
        },
    );
    let out = apply_layers(&base, &[a, b]).unwrap();
    assert_eq!(out.raster.pixel(1, 1), Some([255, 0, 0, 255]));
    assert_eq!(out.raster.pixel(5, 5), Some([0, 0, 255, 255]));
    assert_eq!(out.raster.pixel(9, 9), Some([0, 0, 255, 255]));
}

#[test]
fn multiply_blend_darkens_base() {
    let base = solid(2, 2, [128, 128, 128, 255]);
    let overlay = layer("m", [128, 0, 0, 255], full()).with_blend_mode(BlendMode::Multiply);
    let out = apply_layers(&base, &[overlay]).unwrap();
    assert_eq!(out.raster.pixel(0, 0), Some([64, 0, 0, 255]));
}

#[test]
fn undecodable_overlay_is_skipped_and_reported() {
    let base = solid(4, 4, [9, 9, 9, 255]);
    let bad = OverlayImage::new(
        "broken",
        OverlaySource::Encoded {
            bytes: Arc::from(&b"not an image"[..]),
            mime: Some("image/png".to_string()),
        },
    )
    .with_placement(full());
    let good = layer("ok", [0, 255, 0, 255], full());
    let out = apply_layers(&base, &[bad, good]).unwrap();

    assert_eq!(out.raster.pixel(0, 0), Some([0, 255, 0, 255]));
    assert_eq!(out.skipped.len(), 1);
    assert!(matches!(
        &out.skipped[0],
        EditorError::OverlayDecode { id, .. } if id == "broken"
    ));
}

#[test]
fn encoded_overlay_is_decoded_lazily() {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();

    let base = solid(4, 4, [0, 0, 0, 255]);
    let overlay = OverlayImage::new(
        "png",
        OverlaySource::Encoded {
            bytes: Arc::from(png),
            mime: None,
        },
    )
    .with_placement(full());
    let out = apply_layers(&base, &[overlay]).unwrap();
    assert_eq!(out.raster.pixel(3, 3), Some([10, 20, 30, 255]));
}

#[test]
fn zero_size_placement_is_skipped() {
    let base = solid(4, 4, [0, 0, 0, 255]);
    let overlay = layer(
        "tiny",
        [255, 255, 255, 255],
        Placement {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 50.0,
        },
    );
    let out = apply_layers(&base, &[overlay]).unwrap();
    assert_eq!(out.raster, base);
    assert_eq!(out.skipped.len(), 1);
}

#[test]
fn transparent_overlay_pixels_leave_translucent_base_exact() {
    let base = solid(4, 4, [200, 100, 50, 3]);
    let out = apply_layers(&base, &[layer("clear", [0, 0, 0, 0], full())]).unwrap();
    assert_eq!(out.raster, base);

    let mut cutout = vec![0u8; 4 * 4 * 4];
    cutout[..4].copy_from_slice(&[0, 0, 255, 255]);
    let overlay = OverlayImage::new(
        "cutout",
        OverlaySource::Raster(RasterBuffer::from_rgba8(4, 4, cutout).unwrap()),
    )
    .with_placement(full());
    let out = apply_layers(&base, &[overlay]).unwrap();
    assert_eq!(out.raster.pixel(0, 0), Some([0, 0, 255, 255]));
    for (x, y) in [(3, 0), (0, 3), (3, 3), (2, 2)] {
        assert_eq!(out.raster.pixel(x, y), Some([200, 100, 50, 3]));
    }
}

#[test]
fn covered_runs_split_on_transparent_pixels() {
    let row = [
        0, 0, 0, 0, //
        1, 1, 1, 9, //
        2, 2, 2, 9, //
        0, 0, 0, 0, //
        3, 3, 3, 1,
    ];
    assert_eq!(covered_runs(&row), vec![(1, 3), (4, 5)]);
    assert!(covered_runs(&[0u8; 8]).is_empty());
}
