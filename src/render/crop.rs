use crate::edit::model::CropRegion;
use crate::foundation::core::{PixelRect, RasterBuffer, byte_len};
use crate::foundation::error::{EditorError, EditorResult};

/// Extract `region` (percentages of `base`) verbatim.
///
/// A region that is empty, or that floors to zero pixels, returns `base` unchanged.
#[tracing::instrument(skip(base), fields(w = base.width(), h = base.height()))]
pub fn apply_crop(base: &RasterBuffer, region: &CropRegion) -> EditorResult<RasterBuffer> {
    match crop_pixels(base, region) {
        Err(EditorError::EmptyRegion) => {
            tracing::debug!("crop region is empty; keeping image unchanged");
            Ok(base.clone())
        }
        other => other,
    }
}

/// Pixel rectangle selected by `region`, clamped to the image.
pub fn crop_rect(base: &RasterBuffer, region: &CropRegion) -> PixelRect {
    PixelRect::from_percent(
        region.x,
        region.y,
        region.width,
        region.height,
        base.width(),
        base.height(),
    )
    .clamp_to(base.width(), base.height())
}

fn crop_pixels(base: &RasterBuffer, region: &CropRegion) -> EditorResult<RasterBuffer> {
    if region.is_empty() {
        return Err(EditorError::EmptyRegion);
    }
    let rect = crop_rect(base, region);
    if rect.is_empty() {
        return Err(EditorError::EmptyRegion);
    }

    let src = base.as_rgba8();
    let stride = base.width() as usize * 4;
    let row_len = rect.width as usize * 4;
    let mut out = Vec::with_capacity(byte_len(rect.width, rect.height)?);
    for y in rect.y..rect.y + rect.height {
        let start = y as usize * stride + rect.x as usize * 4;
        out.extend_from_slice(&src[start..start + row_len]);
    }
    RasterBuffer::from_rgba8(rect.width, rect.height, out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/crop.rs"]
mod tests;
