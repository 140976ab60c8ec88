use super::*;

#[test]
fn raster_rejects_bad_dimensions() {
    assert!(RasterBuffer::from_rgba8(0, 1, vec![]).is_err());
    assert!(RasterBuffer::from_rgba8(1, 0, vec![]).is_err());
    assert!(RasterBuffer::from_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(RasterBuffer::from_rgba8(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn solid_fills_every_pixel() {
    let r = RasterBuffer::solid(3, 2, [1, 2, 3, 4]).unwrap();
    assert_eq!(r.width(), 3);
    assert_eq!(r.height(), 2);
    assert!(r.as_rgba8().chunks_exact(4).all(|px| px == [1, 2, 3, 4]));
    assert_eq!(r.pixel(2, 1), Some([1, 2, 3, 4]));
    assert_eq!(r.pixel(3, 0), None);
}

#[test]
fn percent_rect_floors_each_component() {
    let r = PixelRect::from_percent(25.0, 25.0, 50.0, 50.0, 200, 200);
    assert_eq!(
        r,
        PixelRect {
            x: 50,
            y: 50,
            width: 100,
            height: 100
        }
    );

    let r = PixelRect::from_percent(33.3, 0.0, 33.3, 100.0, 10, 7);
    assert_eq!(r.x, 3);
    assert_eq!(r.width, 3);
    assert_eq!(r.height, 7);
}

#[test]
fn percent_rect_clamps_inside_image() {
    let r = PixelRect::from_percent(80.0, 80.0, 50.0, 50.0, 10, 10).clamp_to(10, 10);
    assert_eq!(r.x, 8);
    assert_eq!(r.width, 2);
    assert_eq!(r.height, 2);
    assert!(PixelRect::from_percent(0.0, 0.0, 0.0, 10.0, 10, 10).is_empty());
}

#[test]
fn rgba_image_round_trip_keeps_pixels() {
    let r = RasterBuffer::from_rgba8(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    let back = RasterBuffer::from_rgba_image(r.to_rgba_image()).unwrap();
    assert_eq!(back, r);
}
