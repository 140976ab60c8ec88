use std::io::Cursor;

use crate::foundation::core::RasterBuffer;
use crate::foundation::error::{EditorError, EditorResult};

/// Decode encoded image bytes into a straight RGBA8 [`RasterBuffer`].
///
/// `mime` selects the decoder when it names a known image format; otherwise the format is
/// sniffed from the bytes.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_image(bytes: &[u8], mime: Option<&str>) -> EditorResult<RasterBuffer> {
    if bytes.is_empty() {
        return Err(EditorError::decode("image bytes are empty"));
    }

    let declared = mime.and_then(image::ImageFormat::from_mime_type);
    let dyn_img = match declared {
        Some(format) => image::load_from_memory_with_format(bytes, format)
            .or_else(|_| image::load_from_memory(bytes)),
        None => image::load_from_memory(bytes),
    }
    .map_err(|e| EditorError::decode(e.to_string()))?;

    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(EditorError::decode("decoded image has zero size"));
    }
    RasterBuffer::from_rgba_image(rgba)
}

/// Encode a raster as PNG at its own pixel dimensions.
#[tracing::instrument(skip(raster), fields(w = raster.width(), h = raster.height()))]
pub fn encode_png(raster: &RasterBuffer) -> EditorResult<Vec<u8>> {
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(raster.to_rgba_image())
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| EditorError::Other(anyhow::Error::new(e).context("encode png")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
