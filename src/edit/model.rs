use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::assets::color::Rgba8;
use crate::foundation::core::RasterBuffer;

/// Neutral value of every tonal percentage.
pub const NEUTRAL_PERCENT: f64 = 100.0;
/// Upper bound of every tonal percentage.
pub const MAX_PERCENT: f64 = 200.0;

/// Named filter stack applied after the scalar adjustments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// No preset.
    #[default]
    None,
    /// Full sepia tone.
    Sepia,
    /// Full grayscale.
    Grayscale,
    /// Warm, low-contrast sepia.
    Vintage,
    /// Color inversion.
    Invert,
    /// Saturated and bright with a hint of sepia.
    Sunny,
    /// Hue rotated by half a turn.
    Cool,
    /// High-contrast black and white.
    Noir,
    /// Saturated, punchy contrast.
    Lomo,
    /// Soft blur with lifted saturation.
    Dreamy,
    /// Washed-out, low-contrast look.
    Faded,
}

impl Preset {
    /// All presets in display order.
    pub const ALL: [Preset; 11] = [
        Preset::None,
        Preset::Sepia,
        Preset::Grayscale,
        Preset::Vintage,
        Preset::Invert,
        Preset::Sunny,
        Preset::Cool,
        Preset::Noir,
        Preset::Lomo,
        Preset::Dreamy,
        Preset::Faded,
    ];

    /// Stable lowercase identifier.
    pub fn name(self) -> &'static str {
        match self {
            Preset::None => "none",
            Preset::Sepia => "sepia",
            Preset::Grayscale => "grayscale",
            Preset::Vintage => "vintage",
            Preset::Invert => "invert",
            Preset::Sunny => "sunny",
            Preset::Cool => "cool",
            Preset::Noir => "noir",
            Preset::Lomo => "lomo",
            Preset::Dreamy => "dreamy",
            Preset::Faded => "faded",
        }
    }
}

/// Scalar tonal adjustments plus the selected preset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAdjustment")]
pub struct AdjustmentParams {
    brightness: f64,
    contrast: f64,
    saturation: f64,
    /// Preset applied after the scalar adjustments.
    pub preset: Preset,
}

impl Default for AdjustmentParams {
    fn default() -> Self {
        Self {
            brightness: NEUTRAL_PERCENT,
            contrast: NEUTRAL_PERCENT,
            saturation: NEUTRAL_PERCENT,
            preset: Preset::None,
        }
    }
}

impl AdjustmentParams {
    /// Build params with each percentage clamped to `[0, 200]`.
    pub fn new(brightness: f64, contrast: f64, saturation: f64, preset: Preset) -> Self {
        Self {
            brightness: clamp_percent(brightness),
            contrast: clamp_percent(contrast),
            saturation: clamp_percent(saturation),
            preset,
        }
    }

    /// Brightness percentage.
    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    /// Contrast percentage.
    pub fn contrast(&self) -> f64 {
        self.contrast
    }

    /// Saturation percentage.
    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    /// Set brightness, clamped to `[0, 200]`.
    pub fn set_brightness(&mut self, v: f64) {
        self.brightness = clamp_percent(v);
    }

    /// Set contrast, clamped to `[0, 200]`.
    pub fn set_contrast(&mut self, v: f64) {
        self.contrast = clamp_percent(v);
    }

    /// Set saturation, clamped to `[0, 200]`.
    pub fn set_saturation(&mut self, v: f64) {
        self.saturation = clamp_percent(v);
    }

    /// Select `preset`, or clear it when it is already selected.
    pub fn toggle_preset(&mut self, preset: Preset) {
        self.preset = if self.preset == preset {
            Preset::None
        } else {
            preset
        };
    }

    /// Return `true` when applying these params changes nothing.
    pub fn is_neutral(&self) -> bool {
        self.brightness == NEUTRAL_PERCENT
            && self.contrast == NEUTRAL_PERCENT
            && self.saturation == NEUTRAL_PERCENT
            && self.preset == Preset::None
    }
}

fn clamp_percent(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, MAX_PERCENT)
    } else {
        NEUTRAL_PERCENT
    }
}

/// Rotation and flip parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGeometry")]
pub struct GeometryParams {
    rotation: f64,
    scale_x: f64,
    scale_y: f64,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl GeometryParams {
    /// Build params; rotation is normalized to `[0, 360)` and scales collapse to their sign.
    pub fn new(rotation: f64, scale_x: f64, scale_y: f64) -> Self {
        Self {
            rotation: normalize_degrees(rotation),
            scale_x: unit_sign(scale_x),
            scale_y: unit_sign(scale_y),
        }
    }

    /// Rotation in degrees, in `[0, 360)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Horizontal scale, `1` or `-1`.
    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    /// Vertical scale, `1` or `-1`.
    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    /// Rotate by `degrees` (negative rotates counter-clockwise).
    pub fn rotate_by(&mut self, degrees: f64) {
        if degrees.is_finite() {
            self.rotation = normalize_degrees(self.rotation + degrees);
        }
    }

    /// Mirror about the vertical axis.
    pub fn flip_horizontal(&mut self) {
        self.scale_x = -self.scale_x;
    }

    /// Mirror about the horizontal axis.
    pub fn flip_vertical(&mut self) {
        self.scale_y = -self.scale_y;
    }

    /// Return `true` when the rotation is a whole number of quarter turns.
    pub fn is_quarter_turn(&self) -> bool {
        (self.rotation / 90.0).fract() == 0.0
    }

    /// Return `true` when applying these params changes nothing.
    pub fn is_neutral(&self) -> bool {
        self.rotation == 0.0 && self.scale_x == 1.0 && self.scale_y == 1.0
    }
}

/// Wire form of [`AdjustmentParams`]; deserialized values go through the clamping constructor.
#[derive(Deserialize)]
#[serde(default)]
struct RawAdjustment {
    brightness: f64,
    contrast: f64,
    saturation: f64,
    preset: Preset,
}

impl Default for RawAdjustment {
    fn default() -> Self {
        Self {
            brightness: NEUTRAL_PERCENT,
            contrast: NEUTRAL_PERCENT,
            saturation: NEUTRAL_PERCENT,
            preset: Preset::None,
        }
    }
}

impl From<RawAdjustment> for AdjustmentParams {
    fn from(raw: RawAdjustment) -> Self {
        Self::new(raw.brightness, raw.contrast, raw.saturation, raw.preset)
    }
}

/// Wire form of [`GeometryParams`]; deserialized values go through the normalizing constructor.
#[derive(Deserialize)]
#[serde(default)]
struct RawGeometry {
    rotation: f64,
    scale_x: f64,
    scale_y: f64,
}

impl Default for RawGeometry {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl From<RawGeometry> for GeometryParams {
    fn from(raw: RawGeometry) -> Self {
        Self::new(raw.rotation, raw.scale_x, raw.scale_y)
    }
}

fn normalize_degrees(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let r = deg.rem_euclid(360.0);
    if r >= 360.0 { 0.0 } else { r }
}

fn unit_sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Rectangle in percentages of the source image dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    /// Left edge, percent of width.
    pub x: f64,
    /// Top edge, percent of height.
    pub y: f64,
    /// Width, percent of width. `0` means not yet defined.
    pub width: f64,
    /// Height, percent of height. `0` means not yet defined.
    pub height: f64,
}

impl CropRegion {
    /// Build a region with each component clamped to `[0, 100]`.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: clamp_unit_percent(x),
            y: clamp_unit_percent(y),
            width: clamp_unit_percent(width),
            height: clamp_unit_percent(height),
        }
    }

    /// The whole frame.
    pub fn full() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }

    /// Return `true` when the region has no area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

pub(crate) fn clamp_unit_percent(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Font faces offered for text overlays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    /// Arial.
    #[default]
    Arial,
    /// Verdana.
    Verdana,
    /// Georgia.
    Georgia,
    /// Times New Roman.
    #[serde(rename = "Times New Roman")]
    TimesNewRoman,
    /// Courier New.
    #[serde(rename = "Courier New")]
    CourierNew,
    /// Lucida Console.
    #[serde(rename = "Lucida Console")]
    LucidaConsole,
    /// Impact.
    Impact,
    /// Comic Sans MS.
    #[serde(rename = "Comic Sans MS")]
    ComicSansMs,
}

impl FontFace {
    /// All faces in display order.
    pub const ALL: [FontFace; 8] = [
        FontFace::Arial,
        FontFace::Verdana,
        FontFace::Georgia,
        FontFace::TimesNewRoman,
        FontFace::CourierNew,
        FontFace::LucidaConsole,
        FontFace::Impact,
        FontFace::ComicSansMs,
    ];

    /// Family name as installed on most systems.
    pub fn family_name(self) -> &'static str {
        match self {
            FontFace::Arial => "Arial",
            FontFace::Verdana => "Verdana",
            FontFace::Georgia => "Georgia",
            FontFace::TimesNewRoman => "Times New Roman",
            FontFace::CourierNew => "Courier New",
            FontFace::LucidaConsole => "Lucida Console",
            FontFace::Impact => "Impact",
            FontFace::ComicSansMs => "Comic Sans MS",
        }
    }

    /// Generic family used when the named family is not installed.
    pub fn generic(self) -> GenericFamily {
        match self {
            FontFace::Arial | FontFace::Verdana | FontFace::Impact => GenericFamily::SansSerif,
            FontFace::Georgia | FontFace::TimesNewRoman => GenericFamily::Serif,
            FontFace::CourierNew | FontFace::LucidaConsole => GenericFamily::Monospace,
            FontFace::ComicSansMs => GenericFamily::Cursive,
        }
    }
}

/// CSS generic font families used as fallbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenericFamily {
    /// `sans-serif`.
    SansSerif,
    /// `serif`.
    Serif,
    /// `monospace`.
    Monospace,
    /// `cursive`.
    Cursive,
}

/// Single-line text overlay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOverlay {
    /// Text to draw; empty means nothing is drawn.
    pub text: String,
    /// Font face.
    pub font: FontFace,
    /// Font size as a percentage of the image width.
    pub size: f64,
    /// Fill color.
    pub color: Rgba8,
    /// Anchor x, percent of width. The text is centered on the anchor.
    pub x: f64,
    /// Anchor y, percent of height. The text is centered on the anchor.
    pub y: f64,
}

impl Default for TextOverlay {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: FontFace::Arial,
            size: 5.0,
            color: Rgba8::WHITE,
            x: 50.0,
            y: 50.0,
        }
    }
}

/// Separable blend modes; identifiers serialize verbatim as canvas composite operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Plain alpha compositing.
    #[default]
    SourceOver,
    /// `s * d`.
    Multiply,
    /// `s + d - s * d`.
    Screen,
    /// Hard-light with the layers swapped.
    Overlay,
    /// `min(s, d)`.
    Darken,
    /// `max(s, d)`.
    Lighten,
    /// Brightens the backdrop toward the source.
    ColorDodge,
    /// Darkens the backdrop toward the source.
    ColorBurn,
    /// Multiply or screen depending on the source.
    HardLight,
    /// Softer hard-light.
    SoftLight,
}

impl BlendMode {
    /// All blend modes in display order.
    pub const ALL: [BlendMode; 10] = [
        BlendMode::SourceOver,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
    ];

    /// Interchange identifier, e.g. `"color-dodge"`.
    pub fn id(self) -> &'static str {
        match self {
            BlendMode::SourceOver => "source-over",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
        }
    }
}

/// Where an overlay's pixels come from.
#[derive(Clone, Debug)]
pub enum OverlaySource {
    /// Already decoded raster.
    Raster(RasterBuffer),
    /// Encoded bytes, decoded when the overlay is composited.
    Encoded {
        /// Encoded image bytes.
        bytes: Arc<[u8]>,
        /// Declared MIME type, if known.
        mime: Option<String>,
    },
}

/// Placement rectangle in percentages of the base image dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Left edge, percent of base width.
    pub x: f64,
    /// Top edge, percent of base height.
    pub y: f64,
    /// Width, percent of base width.
    pub width: f64,
    /// Height, percent of base height.
    pub height: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            x: 25.0,
            y: 25.0,
            width: 50.0,
            height: 50.0,
        }
    }
}

/// One image layer composited over the base.
#[derive(Clone, Debug)]
pub struct OverlayImage {
    /// Unique id within the session.
    pub id: String,
    /// Pixel source.
    pub source: OverlaySource,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Blend mode.
    pub blend_mode: BlendMode,
    /// Placement rectangle.
    pub placement: Placement,
}

impl OverlayImage {
    /// Overlay with full opacity, `source-over` and the default placement.
    pub fn new(id: impl Into<String>, source: OverlaySource) -> Self {
        Self {
            id: id.into(),
            source,
            opacity: 1.0,
            blend_mode: BlendMode::SourceOver,
            placement: Placement::default(),
        }
    }

    /// Builder: set opacity, clamped to `[0, 1]`.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self
    }

    /// Builder: set blend mode.
    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    /// Builder: set placement.
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/model.rs"]
mod tests;
