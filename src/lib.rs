//! Retouch is a non-destructive raster image editing core.
//!
//! Every committed edit produces a new immutable snapshot in a linear undo/redo history.
//! The public API is session-oriented:
//!
//! - Load an image into an [`EditorSession`]
//! - Select a [`Tool`], adjust its pending parameters and [`EditorSession::apply`] them
//! - Undo, redo, hand the present image to an [`ImageService`] or export it as PNG
//!
//! The commit engines ([`apply_transform`], [`apply_crop`], [`apply_text`],
//! [`apply_layers`]) are pure functions of a snapshot and parameters and can be used
//! without a session.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod edit;
mod effects;
mod foundation;
mod history;
mod render;
mod script;
mod session;

pub use crate::foundation::core::{Affine, PixelRect, Point, RasterBuffer, Vec2};
pub use crate::foundation::error::{EditorError, EditorResult, ServiceErrorKind};

pub use crate::assets::color::Rgba8;
pub use crate::assets::decode::{decode_image, encode_png};
pub use crate::assets::fonts::{FontBook, ResolvedFont, TextLayoutEngine};
pub use crate::config::{ENV_FONTS_DIR, ENV_HISTORY_LIMIT, EditorConfig};
pub use crate::edit::model::{
    AdjustmentParams, BlendMode, CropRegion, FontFace, GenericFamily, GeometryParams,
    OverlayImage, OverlaySource, Placement, Preset, TextOverlay,
};
pub use crate::edit::state::{EditState, Tool};
pub use crate::history::stack::HistoryStack;
pub use crate::render::crop::apply_crop;
pub use crate::render::layers::{Composited, apply_layers};
pub use crate::render::text::apply_text;
pub use crate::render::transform::apply_transform;
pub use crate::script::model::{
    AdjustStep, CropStep, EditScript, EditStep, FlipAxis, LayerStep, OverlaySpec, TextStep,
};
pub use crate::script::run::{ReplayReport, replay};
pub use crate::session::editor::{EditorSession, ToolState};
pub use crate::session::service::{
    AiInstruction, Completion, ImageService, REQUEST_MIME, ServiceFailure, ServiceRequest,
    ServiceResponse, ServiceTicket,
};
