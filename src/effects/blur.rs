use crate::foundation::core::byte_len;
use crate::foundation::error::{EditorError, EditorResult};

/// Kernel radius used for a CSS `blur(<sigma>px)`.
pub(crate) fn radius_for_sigma(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (3.0 * sigma).ceil() as u32
}

/// Separable gaussian blur over premultiplied RGBA8.
///
/// Samples outside the image are transparent black, as with CSS `blur()`, so content
/// near the border fades out instead of smearing the edge pixels.
pub(crate) fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> EditorResult<Vec<u8>> {
    let expected_len = byte_len(width, height)?;
    if src.len() != expected_len {
        return Err(EditorError::validation(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = Kernel::gaussian(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];
    convolve(src, &mut tmp, width, height, &kernel, Axis::Horizontal);
    convolve(&tmp, &mut out, width, height, &kernel, Axis::Vertical);
    Ok(out)
}

/// Normalized 1D gaussian taps in Q16; they sum to exactly `1 << 16`.
struct Kernel {
    taps: Vec<u32>,
    radius: i64,
}

impl Kernel {
    fn gaussian(radius: u32, sigma: f32) -> EditorResult<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(EditorError::validation("blur sigma must be > 0"));
        }

        let r = i64::from(radius);
        let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
        let weights: Vec<f64> = (-r..=r)
            .map(|i| {
                let x = i as f64;
                (-x * x / denom).exp()
            })
            .collect();
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return Err(EditorError::validation("gaussian kernel sum is zero"));
        }

        let mut taps: Vec<u32> = weights
            .iter()
            .map(|w| ((w / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
            .collect();

        // Rounding drift goes into the center tap.
        let drift = 65536 - taps.iter().map(|&t| i64::from(t)).sum::<i64>();
        let mid = taps.len() / 2;
        taps[mid] = (i64::from(taps[mid]) + drift).clamp(0, 65536) as u32;

        Ok(Self { taps, radius: r })
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn convolve(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &Kernel, axis: Axis) {
    let (w, h) = (i64::from(width), i64::from(height));
    let (len, step) = match axis {
        Axis::Horizontal => (w, 1),
        Axis::Vertical => (h, w),
    };

    for y in 0..h {
        for x in 0..w {
            let pos = match axis {
                Axis::Horizontal => x,
                Axis::Vertical => y,
            };
            let here = y * w + x;
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.taps.iter().enumerate() {
                let offset = ki as i64 - k.radius;
                if !(0..len).contains(&(pos + offset)) {
                    continue;
                }
                let idx = ((here + offset * step) as usize) * 4;
                for (a, &v) in acc.iter_mut().zip(&src[idx..idx + 4]) {
                    *a += u64::from(kw) * u64::from(v);
                }
            }
            let out = (here as usize) * 4;
            for (d, a) in dst[out..out + 4].iter_mut().zip(acc) {
                *d = q16_to_u8(a);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
