use crate::edit::model::{AdjustmentParams, GeometryParams};
use crate::effects::filters::{adjustment_chain, apply_filter_chain};
use crate::foundation::core::{Affine, Point, RasterBuffer, Vec2, byte_len};
use crate::foundation::error::EditorResult;
use crate::foundation::math::{premul_f32, unpremul_u8};

/// Apply tonal adjustments, the preset stack, then rotation and flips.
///
/// The output canvas is the axis-aligned bounding box of the rotated source: quarter turns
/// swap width and height exactly, other angles grow the canvas with transparent corners.
#[tracing::instrument(skip(base), fields(w = base.width(), h = base.height()))]
pub fn apply_transform(
    base: &RasterBuffer,
    adjustment: &AdjustmentParams,
    geometry: &GeometryParams,
) -> EditorResult<RasterBuffer> {
    let filtered = apply_filter_chain(base, &adjustment_chain(adjustment))?;
    if geometry.is_neutral() {
        return Ok(filtered);
    }
    apply_geometry(&filtered, geometry)
}

/// Output canvas size for `geometry` applied to a `width` x `height` source.
pub fn rotated_canvas(width: u32, height: u32, geometry: &GeometryParams) -> (u32, u32) {
    if geometry.is_quarter_turn() {
        let quarter = (geometry.rotation() / 90.0) as u32 % 4;
        return if quarter % 2 == 1 {
            (height, width)
        } else {
            (width, height)
        };
    }
    let (sin, cos) = geometry.rotation().to_radians().sin_cos();
    let (w, h) = (f64::from(width), f64::from(height));
    let bw = (w * cos.abs() + h * sin.abs() - 1e-9).ceil().max(1.0);
    let bh = (w * sin.abs() + h * cos.abs() - 1e-9).ceil().max(1.0);
    (bw as u32, bh as u32)
}

/// Forward mapping from source pixel space to output pixel space.
fn canvas_affine(src: (u32, u32), out: (u32, u32), geometry: &GeometryParams) -> Affine {
    let c_src = Vec2::new(f64::from(src.0) / 2.0, f64::from(src.1) / 2.0);
    let c_out = Vec2::new(f64::from(out.0) / 2.0, f64::from(out.1) / 2.0);
    Affine::translate(c_out)
        * Affine::rotate(geometry.rotation().to_radians())
        * Affine::scale_non_uniform(geometry.scale_x(), geometry.scale_y())
        * Affine::translate(-c_src)
}

fn apply_geometry(src: &RasterBuffer, geometry: &GeometryParams) -> EditorResult<RasterBuffer> {
    let (sw, sh) = (src.width(), src.height());
    let (ow, oh) = rotated_canvas(sw, sh, geometry);
    let inverse = canvas_affine((sw, sh), (ow, oh), geometry).inverse();
    let nearest = geometry.is_quarter_turn();

    let mut out = vec![0u8; byte_len(ow, oh)?];
    for y in 0..oh {
        for x in 0..ow {
            let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let px = if nearest {
                sample_nearest(src, p)
            } else {
                sample_bilinear(src, p)
            };
            let idx = ((y as usize) * (ow as usize) + (x as usize)) * 4;
            out[idx..idx + 4].copy_from_slice(&px);
        }
    }

    tracing::debug!(from = ?(sw, sh), to = ?(ow, oh), nearest, "geometry applied");
    RasterBuffer::from_rgba8(ow, oh, out)
}

fn sample_nearest(src: &RasterBuffer, p: Point) -> [u8; 4] {
    let (x, y) = (p.x.floor(), p.y.floor());
    if x < 0.0 || y < 0.0 {
        return [0, 0, 0, 0];
    }
    src.pixel(x as u32, y as u32).unwrap_or([0, 0, 0, 0])
}

fn sample_bilinear(src: &RasterBuffer, p: Point) -> [u8; 4] {
    // Pixel centers sit at half-integers.
    let fx = p.x - 0.5;
    let fy = p.y - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = (fx - x0) as f32;
    let ty = (fy - y0) as f32;

    let tap = |dx: f64, dy: f64| -> [f32; 4] {
        let (x, y) = (x0 + dx, y0 + dy);
        if x < 0.0 || y < 0.0 {
            return [0.0; 4];
        }
        src.pixel(x as u32, y as u32)
            .map(premul_f32)
            .unwrap_or([0.0; 4])
    };

    let p00 = tap(0.0, 0.0);
    let p10 = tap(1.0, 0.0);
    let p01 = tap(0.0, 1.0);
    let p11 = tap(1.0, 1.0);

    let mut acc = [0.0f32; 4];
    for c in 0..4 {
        let top = p00[c] * (1.0 - tx) + p10[c] * tx;
        let bottom = p01[c] * (1.0 - tx) + p11[c] * tx;
        acc[c] = top * (1.0 - ty) + bottom * ty;
    }
    unpremul_u8(acc)
}

#[cfg(test)]
#[path = "../../tests/unit/render/transform.rs"]
mod tests;
