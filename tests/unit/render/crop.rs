use super::*;

fn indexed(w: u32, h: u32) -> RasterBuffer {
    let mut data = Vec::new();
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[x as u8, y as u8, 0, 255]);
        }
    }
    RasterBuffer::from_rgba8(w, h, data).unwrap()
}

#[test]
fn full_frame_crop_is_identity() {
    let base = indexed(7, 5);
    assert_eq!(apply_crop(&base, &CropRegion::full()).unwrap(), base);
}

#[test]
fn center_quadrant_of_200_square() {
    let base = indexed(200, 200);
    let out = apply_crop(&base, &CropRegion::new(25.0, 25.0, 50.0, 50.0)).unwrap();
    assert_eq!((out.width(), out.height()), (100, 100));
    assert_eq!(out.pixel(0, 0), Some([50, 50, 0, 255]));
    assert_eq!(out.pixel(99, 99), Some([149, 149, 0, 255]));
}

#[test]
fn empty_region_is_a_silent_no_op() {
    let base = indexed(10, 10);
    assert_eq!(apply_crop(&base, &CropRegion::default()).unwrap(), base);
    assert_eq!(
        apply_crop(&base, &CropRegion::new(10.0, 10.0, 50.0, 0.0)).unwrap(),
        base
    );
    // 5% of 10 px floors to zero.
    assert_eq!(
        apply_crop(&base, &CropRegion::new(0.0, 0.0, 5.0, 50.0)).unwrap(),
        base
    );
}

#[test]
fn region_past_the_edge_is_clamped() {
    let base = indexed(10, 10);
    let out = apply_crop(&base, &CropRegion::new(80.0, 0.0, 50.0, 100.0)).unwrap();
    assert_eq!((out.width(), out.height()), (2, 10));
    assert_eq!(out.pixel(0, 0), Some([8, 0, 0, 255]));
}

#[test]
fn crop_rect_floors_each_component() {
    let base = indexed(33, 33);
    let rect = crop_rect(&base, &CropRegion::new(10.0, 10.0, 50.0, 50.0));
    assert_eq!(
        rect,
        PixelRect {
            x: 3,
            y: 3,
            width: 16,
            height: 16
        }
    );
}
