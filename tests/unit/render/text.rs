use super::*;
use crate::assets::color::Rgba8;
use crate::edit::model::FontFace;

fn system_fonts() -> Option<FontBook> {
    let book = FontBook::load(None, true);
    (!book.is_empty()).then_some(book)
}

fn hello(size: f64) -> TextOverlay {
    TextOverlay {
        text: "Hello".to_string(),
        font: FontFace::Arial,
        size,
        color: Rgba8::WHITE,
        x: 50.0,
        y: 50.0,
    }
}

#[test]
fn empty_text_is_a_no_op() {
    let base = RasterBuffer::solid(8, 8, [0, 0, 0, 255]).unwrap();
    let out = apply_text(
        &base,
        &TextOverlay::default(),
        &FontBook::empty(),
        &mut TextLayoutEngine::new(),
    )
    .unwrap();
    assert_eq!(out, base);
}

#[test]
fn missing_fonts_are_font_errors() {
    let base = RasterBuffer::solid(8, 8, [0, 0, 0, 255]).unwrap();
    let err = apply_text(
        &base,
        &hello(10.0),
        &FontBook::empty(),
        &mut TextLayoutEngine::new(),
    )
    .unwrap_err();
    assert!(matches!(err, EditorError::Font(_)));
}

#[test]
fn zero_size_is_a_no_op() {
    let base = RasterBuffer::solid(8, 8, [0, 0, 0, 255]).unwrap();
    let out = apply_text(
        &base,
        &hello(0.0),
        &FontBook::empty(),
        &mut TextLayoutEngine::new(),
    )
    .unwrap();
    assert_eq!(out, base);
}

#[test]
fn text_is_drawn_near_the_anchor() {
    let Some(fonts) = system_fonts() else {
        return;
    };
    let base = RasterBuffer::solid(200, 100, [0, 0, 0, 255]).unwrap();
    let out = apply_text(&base, &hello(10.0), &fonts, &mut TextLayoutEngine::new()).unwrap();
    assert_eq!((out.width(), out.height()), (200, 100));

    let mut lit = Vec::new();
    for y in 0..100 {
        for x in 0..200 {
            if out.pixel(x, y).unwrap()[0] > 0 {
                lit.push((x, y));
            }
        }
    }
    assert!(!lit.is_empty());
    let cx = lit.iter().map(|p| f64::from(p.0)).sum::<f64>() / lit.len() as f64;
    let cy = lit.iter().map(|p| f64::from(p.1)).sum::<f64>() / lit.len() as f64;
    assert!((cx - 100.0).abs() < 25.0, "cx={cx}");
    assert!((cy - 50.0).abs() < 25.0, "cy={cy}");
    // Corners stay untouched.
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(199, 99), Some([0, 0, 0, 255]));
}
