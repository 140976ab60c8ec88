use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assets::color::Rgba8;
use crate::edit::model::{BlendMode, FontFace, Preset};
use crate::foundation::error::{EditorError, EditorResult};

/// Ordered list of edit steps replayed through an [`crate::EditorSession`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditScript {
    /// Steps in replay order.
    pub steps: Vec<EditStep>,
}

/// One scripted edit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditStep {
    /// Set tonal percentages; omitted fields keep their pending value.
    Adjust(AdjustStep),
    /// Select a filter preset.
    Preset {
        /// Preset to select; `none` clears it.
        name: Preset,
    },
    /// Rotate clockwise by `degrees`.
    Rotate {
        /// Degrees to add to the pending rotation.
        degrees: f64,
    },
    /// Mirror along one axis.
    Flip {
        /// Axis to mirror.
        axis: FlipAxis,
    },
    /// Crop to a percentage rectangle.
    Crop(CropStep),
    /// Draw a single line of text.
    Text(TextStep),
    /// Composite image overlays.
    Layer(LayerStep),
    /// Step back one snapshot.
    Undo,
    /// Step forward one snapshot.
    Redo,
}

/// Mirror axis of a [`EditStep::Flip`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipAxis {
    /// Mirror left to right.
    Horizontal,
    /// Mirror top to bottom.
    Vertical,
}

/// Payload of [`EditStep::Adjust`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdjustStep {
    /// Brightness percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    /// Contrast percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
    /// Saturation percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation: Option<f64>,
}

/// Payload of [`EditStep::Crop`], in percentages of the current image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CropStep {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Payload of [`EditStep::Text`]; omitted fields use the text tool defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextStep {
    /// Text to draw.
    pub text: String,
    /// Font face.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontFace>,
    /// Size as a percentage of image width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Fill color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba8>,
    /// Anchor x percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Anchor y percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// Payload of [`EditStep::Layer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerStep {
    /// Overlays, bottom to top.
    pub overlays: Vec<OverlaySpec>,
}

/// One overlay of a [`LayerStep`], read from an image file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlaySpec {
    /// Unique id within the step.
    pub id: String,
    /// Image file; relative paths resolve against the script's directory.
    pub source: PathBuf,
    /// Opacity in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    /// Blend mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    /// Left edge percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Top edge percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Width percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Height percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl EditScript {
    /// Parse a script from a JSON reader. The result is not yet validated.
    pub fn from_reader<R: std::io::Read>(r: R) -> EditorResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| EditorError::validation(format!("parse edit script JSON: {e}")))
    }

    /// Parse a script from a JSON file on disk. The result is not yet validated.
    pub fn from_path(path: impl AsRef<Path>) -> EditorResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            EditorError::validation(format!("open edit script '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject non-finite numbers, blank text and duplicate overlay ids.
    pub fn validate(&self) -> EditorResult<()> {
        for (i, step) in self.steps.iter().enumerate() {
            step.validate()
                .map_err(|e| EditorError::validation(format!("step {i}: {}", reason(e))))?;
        }
        Ok(())
    }
}

fn reason(e: EditorError) -> String {
    match e {
        EditorError::Validation(msg) => msg,
        other => other.to_string(),
    }
}

impl EditStep {
    /// Validate one step in isolation.
    pub fn validate(&self) -> EditorResult<()> {
        match self {
            EditStep::Adjust(a) => {
                finite_opt("brightness", a.brightness)?;
                finite_opt("contrast", a.contrast)?;
                finite_opt("saturation", a.saturation)
            }
            EditStep::Preset { .. } | EditStep::Flip { .. } => Ok(()),
            EditStep::Undo | EditStep::Redo => Ok(()),
            EditStep::Rotate { degrees } => finite("degrees", *degrees),
            EditStep::Crop(c) => {
                finite("x", c.x)?;
                finite("y", c.y)?;
                finite("width", c.width)?;
                finite("height", c.height)
            }
            EditStep::Text(t) => {
                if t.text.is_empty() {
                    return Err(EditorError::validation("text must be non-empty"));
                }
                finite_opt("size", t.size)?;
                if t.size.is_some_and(|s| s < 0.0) {
                    return Err(EditorError::validation("size must be >= 0"));
                }
                finite_opt("x", t.x)?;
                finite_opt("y", t.y)
            }
            EditStep::Layer(l) => {
                let mut seen = HashSet::new();
                for o in &l.overlays {
                    if o.id.trim().is_empty() {
                        return Err(EditorError::validation("overlay id must be non-empty"));
                    }
                    if !seen.insert(o.id.as_str()) {
                        return Err(EditorError::validation(format!(
                            "duplicate overlay id '{}'",
                            o.id
                        )));
                    }
                    if o.opacity.is_some_and(|v| !v.is_finite()) {
                        return Err(EditorError::validation(format!(
                            "overlay '{}' opacity must be finite",
                            o.id
                        )));
                    }
                    for (name, v) in [
                        ("x", o.x),
                        ("y", o.y),
                        ("width", o.width),
                        ("height", o.height),
                    ] {
                        finite_opt(name, v)?;
                    }
                }
                Ok(())
            }
        }
    }
}

fn finite(name: &str, v: f64) -> EditorResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(EditorError::validation(format!("{name} must be finite")))
    }
}

fn finite_opt(name: &str, v: Option<f64>) -> EditorResult<()> {
    v.map_or(Ok(()), |v| finite(name, v))
}

#[cfg(test)]
#[path = "../../tests/unit/script/model.rs"]
mod tests;
