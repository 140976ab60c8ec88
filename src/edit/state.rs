use serde::{Deserialize, Serialize};

use crate::edit::model::{AdjustmentParams, CropRegion, GeometryParams, OverlayImage, TextOverlay};

/// Editing tools a session can activate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Brightness, contrast and saturation sliders.
    Adjust,
    /// Quarter-turn rotation.
    Rotate,
    /// Horizontal and vertical mirroring.
    Flip,
    /// Preset filter picker.
    Filters,
    /// Crop rectangle.
    Crop,
    /// Text overlay.
    Text,
    /// Image layers with blend modes.
    Layer,
}

impl Tool {
    /// Tools that share one tonal/geometric payload and auto-commit when left.
    pub fn is_transform_family(self) -> bool {
        matches!(self, Tool::Adjust | Tool::Rotate | Tool::Flip | Tool::Filters)
    }
}

/// Pending, uncommitted parameters of the active tool.
#[derive(Clone, Debug, Default)]
pub enum EditState {
    /// Nothing pending.
    #[default]
    Empty,
    /// Tonal and geometric parameters shared by the transform family.
    Transform {
        /// Tonal adjustments and preset.
        adjustment: AdjustmentParams,
        /// Rotation and flips.
        geometry: GeometryParams,
    },
    /// Crop rectangle.
    Crop(CropRegion),
    /// Text overlay.
    Text(TextOverlay),
    /// Overlay layers plus the session-scoped selection.
    Layers {
        /// Layers in painter's order.
        overlays: Vec<OverlayImage>,
        /// Id of the selected layer; never read by the compositor.
        selected: Option<String>,
    },
}

impl EditState {
    /// Fresh neutral state for `tool`.
    pub fn fresh(tool: Tool) -> Self {
        match tool {
            Tool::Adjust | Tool::Rotate | Tool::Flip | Tool::Filters => EditState::Transform {
                adjustment: AdjustmentParams::default(),
                geometry: GeometryParams::default(),
            },
            Tool::Crop => EditState::Crop(CropRegion::default()),
            Tool::Text => EditState::Text(TextOverlay::default()),
            Tool::Layer => EditState::Layers {
                overlays: Vec::new(),
                selected: None,
            },
        }
    }

    /// Return `true` when committing this state would change nothing.
    pub fn is_neutral(&self) -> bool {
        match self {
            EditState::Empty => true,
            EditState::Transform {
                adjustment,
                geometry,
            } => adjustment.is_neutral() && geometry.is_neutral(),
            EditState::Crop(region) => region.is_empty(),
            EditState::Text(overlay) => overlay.text.is_empty(),
            EditState::Layers { overlays, .. } => overlays.is_empty(),
        }
    }

    /// Return `true` when this state can be edited by `tool`.
    pub fn matches(&self, tool: Tool) -> bool {
        match self {
            EditState::Empty => false,
            EditState::Transform { .. } => tool.is_transform_family(),
            EditState::Crop(_) => tool == Tool::Crop,
            EditState::Text(_) => tool == Tool::Text,
            EditState::Layers { .. } => tool == Tool::Layer,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/state.rs"]
mod tests;
