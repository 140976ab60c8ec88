use std::borrow::Cow;

use crate::assets::decode::decode_image;
use crate::edit::model::{OverlayImage, OverlaySource, clamp_unit_percent};
use crate::effects::composite::composite_rgba8_premul;
use crate::foundation::core::{PixelRect, RasterBuffer};
use crate::foundation::error::{EditorError, EditorResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Result of compositing a layer stack.
#[derive(Debug)]
pub struct Composited {
    /// Base with every drawable overlay folded in.
    pub raster: RasterBuffer,
    /// One [`EditorError::OverlayDecode`] per overlay that was skipped.
    pub skipped: Vec<EditorError>,
}

/// Fold `overlays` over `base` in painter's order.
///
/// Pixels no overlay touches are copied verbatim.
#[tracing::instrument(skip(base, overlays), fields(w = base.width(), h = base.height(), n = overlays.len()))]
pub fn apply_layers(base: &RasterBuffer, overlays: &[OverlayImage]) -> EditorResult<Composited> {
    let mut canvas: Cow<'_, RasterBuffer> = Cow::Borrowed(base);
    let mut skipped = Vec::new();

    for overlay in overlays {
        match composite_one(&canvas, overlay) {
            Ok(Some(next)) => canvas = Cow::Owned(next),
            Ok(None) => {}
            Err(EditorError::OverlayDecode { id, reason }) => {
                tracing::warn!(id = %id, reason = %reason, "skipping overlay");
                skipped.push(EditorError::OverlayDecode { id, reason });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(Composited {
        raster: canvas.into_owned(),
        skipped,
    })
}

/// Composite one overlay; `Ok(None)` when it draws nothing.
fn composite_one(base: &RasterBuffer, overlay: &OverlayImage) -> EditorResult<Option<RasterBuffer>> {
    if overlay.opacity <= 0.0 {
        return Ok(None);
    }

    let skip = |reason: String| EditorError::OverlayDecode {
        id: overlay.id.clone(),
        reason,
    };

    let (bw, bh) = (base.width(), base.height());
    let p = overlay.placement;
    let rect = PixelRect::from_percent(
        clamp_unit_percent(p.x),
        clamp_unit_percent(p.y),
        clamp_unit_percent(p.width),
        clamp_unit_percent(p.height),
        bw,
        bh,
    );
    if rect.is_empty() {
        return Err(skip("placement covers no pixels".to_string()));
    }

    let decoded;
    let source = match &overlay.source {
        OverlaySource::Raster(r) => r,
        OverlaySource::Encoded { bytes, mime } => {
            decoded = decode_image(bytes, mime.as_deref()).map_err(|e| skip(e.to_string()))?;
            &decoded
        }
    };

    // Resample in premultiplied space so transparent texels do not bleed color.
    let mut src_img = source.to_rgba_image();
    premultiply_rgba8_in_place(&mut src_img);
    let resized = if src_img.dimensions() == (rect.width, rect.height) {
        src_img
    } else {
        image::imageops::resize(
            &src_img,
            rect.width,
            rect.height,
            image::imageops::FilterType::Triangle,
        )
    };
    let src = resized.as_raw();

    let clip = rect.clamp_to(bw, bh);
    if clip.is_empty() {
        return Ok(None);
    }

    let mut out = base.as_rgba8().to_vec();
    let dst_stride = bw as usize * 4;
    let src_stride = rect.width as usize * 4;
    let row_len = clip.width as usize * 4;
    for row in 0..clip.height as usize {
        let d0 = (clip.y as usize + row) * dst_stride + clip.x as usize * 4;
        let s0 = row * src_stride;
        let dst_row = &mut out[d0..d0 + row_len];
        let src_row = &src[s0..s0 + row_len];
        for (start, end) in covered_runs(src_row) {
            let dst_run = &mut dst_row[start * 4..end * 4];
            premultiply_rgba8_in_place(dst_run);
            composite_rgba8_premul(
                dst_run,
                &src_row[start * 4..end * 4],
                overlay.opacity,
                overlay.blend_mode,
            )?;
            unpremultiply_rgba8_in_place(dst_run);
        }
    }

    RasterBuffer::from_rgba8(bw, bh, out).map(Some)
}

/// Pixel index ranges `[start, end)` of a premultiplied row whose alpha is nonzero.
///
/// Backdrop pixels outside these runs never round-trip through premultiplication.
fn covered_runs(row: &[u8]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, px) in row.chunks_exact(4).enumerate() {
        match (px[3] != 0, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, row.len() / 4));
    }
    runs
}

#[cfg(test)]
#[path = "../../tests/unit/render/layers.rs"]
mod tests;
