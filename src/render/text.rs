use crate::assets::fonts::{FontBook, TextLayoutEngine};
use crate::edit::model::TextOverlay;
use crate::effects::composite::premul_over_in_place_opacity;
use crate::foundation::core::{Affine, RasterBuffer};
use crate::foundation::error::{EditorError, EditorResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Draw one centered, single-line text overlay onto `base`.
///
/// Font size is `size` percent of the image width; the layout box is centered on the anchor.
#[tracing::instrument(skip(base, fonts, engine), fields(w = base.width(), h = base.height()))]
pub fn apply_text(
    base: &RasterBuffer,
    overlay: &TextOverlay,
    fonts: &FontBook,
    engine: &mut TextLayoutEngine,
) -> EditorResult<RasterBuffer> {
    if overlay.text.is_empty() {
        return Ok(base.clone());
    }
    let (width, height) = (base.width(), base.height());
    let size_px = (overlay.size / 100.0 * f64::from(width)) as f32;
    if !size_px.is_finite() || size_px <= 0.0 {
        tracing::debug!(size = overlay.size, "text size rounds to nothing");
        return Ok(base.clone());
    }

    let (Ok(w16), Ok(h16)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(EditorError::validation(format!(
            "text rendering supports images up to {0}x{0}",
            u16::MAX
        )));
    };

    let font = fonts.resolve(overlay.font)?;
    let layout = engine.layout_line(&overlay.text, &font, size_px, overlay.color)?;

    let anchor_x = overlay.x / 100.0 * f64::from(width);
    let anchor_y = overlay.y / 100.0 * f64::from(height);
    let origin = Affine::translate((
        anchor_x - f64::from(layout.width()) / 2.0,
        anchor_y - f64::from(layout.height()) / 2.0,
    ));

    let font_data = vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
        font.index,
    );

    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_transform(vello_cpu::kurbo::Affine::new(origin.as_coeffs()));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&font_data)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }

    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    let mut out = base.as_rgba8().to_vec();
    over_straight(&mut out, pixmap.data_as_u8_slice());
    RasterBuffer::from_rgba8(width, height, out)
}

/// Source-over premultiplied `src` onto straight `dst`, leaving uncovered pixels untouched.
fn over_straight(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        premultiply_rgba8_in_place(d);
        premul_over_in_place_opacity(d, s, 1.0);
        unpremultiply_rgba8_in_place(d);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
