use crate::edit::model::{AdjustmentParams, NEUTRAL_PERCENT, Preset};
use crate::effects::blur::{blur_rgba8_premul, radius_for_sigma};
use crate::foundation::core::RasterBuffer;
use crate::foundation::error::EditorResult;
use crate::foundation::math::{premultiply_rgba8_in_place, unit_to_u8, unpremultiply_rgba8_in_place};

/// 4x5 row-major color matrix over straight unit RGBA; column 5 is the offset.
pub(crate) type ColorMatrix = [f32; 20];

pub(crate) const IDENTITY: ColorMatrix = [
    1.0, 0.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, 0.0,
];

/// One stage of a CSS `filter` list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum FilterOp {
    /// Per-pixel color matrix; output clamps to `[0, 1]`.
    Matrix(ColorMatrix),
    /// Gaussian blur with `sigma` in pixels.
    Blur { sigma: f32 },
}

impl FilterOp {
    pub(crate) fn brightness(amount: f32) -> Self {
        let a = amount.max(0.0);
        Self::Matrix(rgb_linear(a, 0.0))
    }

    pub(crate) fn contrast(amount: f32) -> Self {
        let a = amount.max(0.0);
        Self::Matrix(rgb_linear(a, 0.5 - 0.5 * a))
    }

    pub(crate) fn saturate(amount: f32) -> Self {
        let s = amount.max(0.0);
        Self::Matrix(rgb_matrix([
            [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
        ]))
    }

    pub(crate) fn grayscale(amount: f32) -> Self {
        let k = 1.0 - amount.clamp(0.0, 1.0);
        Self::Matrix(rgb_matrix([
            [0.2126 + 0.7874 * k, 0.7152 - 0.7152 * k, 0.0722 - 0.0722 * k],
            [0.2126 - 0.2126 * k, 0.7152 + 0.2848 * k, 0.0722 - 0.0722 * k],
            [0.2126 - 0.2126 * k, 0.7152 - 0.7152 * k, 0.0722 + 0.9278 * k],
        ]))
    }

    pub(crate) fn sepia(amount: f32) -> Self {
        let k = 1.0 - amount.clamp(0.0, 1.0);
        Self::Matrix(rgb_matrix([
            [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
            [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
            [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
        ]))
    }

    pub(crate) fn invert(amount: f32) -> Self {
        let a = amount.clamp(0.0, 1.0);
        Self::Matrix(rgb_linear(1.0 - 2.0 * a, a))
    }

    pub(crate) fn hue_rotate(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::Matrix(rgb_matrix([
            [
                0.213 + cos * 0.787 - sin * 0.213,
                0.715 - cos * 0.715 - sin * 0.715,
                0.072 - cos * 0.072 + sin * 0.928,
            ],
            [
                0.213 - cos * 0.213 + sin * 0.143,
                0.715 + cos * 0.285 + sin * 0.140,
                0.072 - cos * 0.072 - sin * 0.283,
            ],
            [
                0.213 - cos * 0.213 - sin * 0.787,
                0.715 - cos * 0.715 + sin * 0.715,
                0.072 + cos * 0.928 + sin * 0.072,
            ],
        ]))
    }

    pub(crate) fn blur(sigma: f32) -> Self {
        Self::Blur { sigma }
    }

    pub(crate) fn is_identity(&self) -> bool {
        match self {
            FilterOp::Matrix(m) => m
                .iter()
                .zip(IDENTITY.iter())
                .all(|(a, b)| (a - b).abs() < 1e-6),
            FilterOp::Blur { sigma } => radius_for_sigma(*sigma) == 0,
        }
    }
}

fn rgb_linear(slope: f32, intercept: f32) -> ColorMatrix {
    [
        slope, 0.0, 0.0, 0.0, intercept, //
        0.0, slope, 0.0, 0.0, intercept, //
        0.0, 0.0, slope, 0.0, intercept, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn rgb_matrix(m: [[f32; 3]; 3]) -> ColorMatrix {
    [
        m[0][0], m[0][1], m[0][2], 0.0, 0.0, //
        m[1][0], m[1][1], m[1][2], 0.0, 0.0, //
        m[2][0], m[2][1], m[2][2], 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

/// Filter stack of a named preset.
pub(crate) fn preset_chain(preset: Preset) -> Vec<FilterOp> {
    match preset {
        Preset::None => Vec::new(),
        Preset::Sepia => vec![FilterOp::sepia(1.0)],
        Preset::Grayscale => vec![FilterOp::grayscale(1.0)],
        Preset::Vintage => vec![
            FilterOp::sepia(0.6),
            FilterOp::contrast(0.75),
            FilterOp::brightness(1.2),
            FilterOp::saturate(1.2),
        ],
        Preset::Invert => vec![FilterOp::invert(1.0)],
        Preset::Sunny => vec![
            FilterOp::saturate(1.5),
            FilterOp::brightness(1.1),
            FilterOp::sepia(0.2),
        ],
        Preset::Cool => vec![
            FilterOp::contrast(1.1),
            FilterOp::saturate(1.5),
            FilterOp::hue_rotate(180.0),
        ],
        Preset::Noir => vec![
            FilterOp::grayscale(1.0),
            FilterOp::contrast(1.5),
            FilterOp::brightness(0.9),
        ],
        Preset::Lomo => vec![FilterOp::saturate(1.6), FilterOp::contrast(1.4)],
        Preset::Dreamy => vec![
            FilterOp::saturate(1.2),
            FilterOp::blur(1.0),
            FilterOp::contrast(0.9),
        ],
        Preset::Faded => vec![
            FilterOp::contrast(0.8),
            FilterOp::brightness(1.15),
            FilterOp::saturate(0.8),
        ],
    }
}

/// Full filter list for `params`: brightness, contrast, saturate, then the preset stack.
///
/// Identity stages are dropped so neutral params yield an empty chain.
pub(crate) fn adjustment_chain(params: &AdjustmentParams) -> Vec<FilterOp> {
    let pct = |v: f64| (v / NEUTRAL_PERCENT) as f32;
    let mut chain = vec![
        FilterOp::brightness(pct(params.brightness())),
        FilterOp::contrast(pct(params.contrast())),
        FilterOp::saturate(pct(params.saturation())),
    ];
    chain.extend(preset_chain(params.preset));
    chain.retain(|op| !op.is_identity());
    chain
}

/// Run `chain` over `base`. Matrix stages run in straight unit floats; blur stages run on
/// premultiplied RGBA8.
#[tracing::instrument(skip(base, chain), fields(w = base.width(), h = base.height(), stages = chain.len()))]
pub(crate) fn apply_filter_chain(
    base: &RasterBuffer,
    chain: &[FilterOp],
) -> EditorResult<RasterBuffer> {
    if chain.is_empty() {
        return Ok(base.clone());
    }

    let (width, height) = (base.width(), base.height());
    let mut work: Vec<f32> = base
        .as_rgba8()
        .iter()
        .map(|&v| f32::from(v) / 255.0)
        .collect();

    for op in chain {
        match op {
            FilterOp::Matrix(m) => color_matrix_in_place(&mut work, m),
            FilterOp::Blur { sigma } => {
                let mut bytes = quantize(&work);
                premultiply_rgba8_in_place(&mut bytes);
                let mut blurred =
                    blur_rgba8_premul(&bytes, width, height, radius_for_sigma(*sigma), *sigma)?;
                unpremultiply_rgba8_in_place(&mut blurred);
                work = blurred.iter().map(|&v| f32::from(v) / 255.0).collect();
            }
        }
    }

    RasterBuffer::from_rgba8(width, height, quantize(&work))
}

fn color_matrix_in_place(px: &mut [f32], m: &ColorMatrix) {
    for p in px.chunks_exact_mut(4) {
        let [r, g, b, a] = [p[0], p[1], p[2], p[3]];
        p[0] = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        p[1] = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        p[2] = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        p[3] = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);
    }
}

fn quantize(px: &[f32]) -> Vec<u8> {
    px.iter().map(|&v| unit_to_u8(v)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filters.rs"]
mod tests;
