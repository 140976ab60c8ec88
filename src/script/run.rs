use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::edit::model::{CropRegion, OverlayImage, OverlaySource, Placement};
use crate::edit::state::Tool;
use crate::foundation::error::EditorResult;
use crate::script::model::{EditScript, EditStep, FlipAxis, LayerStep, TextStep};
use crate::session::editor::EditorSession;

/// Summary of one script replay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Number of steps executed.
    pub steps: usize,
    /// History revision before replay.
    pub start_revision: u64,
    /// History revision after replay.
    pub end_revision: u64,
    /// Overlays skipped during layer steps, as display messages.
    pub warnings: Vec<String>,
}

/// Validate `script` and replay it against `session`.
///
/// Tonal and geometric steps accumulate in the shared transform payload and are committed
/// when a later step leaves that family, or at the end of the script. Crop, text and
/// layer steps are applied immediately. Overlay paths resolve against `base_dir`.
#[tracing::instrument(skip(session, script), fields(steps = script.steps.len()))]
pub fn replay(
    session: &mut EditorSession,
    script: &EditScript,
    base_dir: &Path,
) -> EditorResult<ReplayReport> {
    script.validate()?;

    let mut report = ReplayReport {
        start_revision: session.history().revision(),
        ..ReplayReport::default()
    };

    for step in &script.steps {
        run_step(session, step, base_dir, &mut report)?;
        report.steps += 1;
    }
    session.deactivate()?;

    report.end_revision = session.history().revision();
    tracing::debug!(?report, "script replayed");
    Ok(report)
}

fn run_step(
    session: &mut EditorSession,
    step: &EditStep,
    base_dir: &Path,
    report: &mut ReplayReport,
) -> EditorResult<()> {
    match step {
        EditStep::Adjust(a) => {
            activate(session, Tool::Adjust)?;
            let params = session.adjustment_mut()?;
            if let Some(v) = a.brightness {
                params.set_brightness(v);
            }
            if let Some(v) = a.contrast {
                params.set_contrast(v);
            }
            if let Some(v) = a.saturation {
                params.set_saturation(v);
            }
        }
        EditStep::Preset { name } => {
            activate(session, Tool::Filters)?;
            session.adjustment_mut()?.preset = *name;
        }
        EditStep::Rotate { degrees } => {
            activate(session, Tool::Rotate)?;
            session.geometry_mut()?.rotate_by(*degrees);
        }
        EditStep::Flip { axis } => {
            activate(session, Tool::Flip)?;
            let geometry = session.geometry_mut()?;
            match axis {
                FlipAxis::Horizontal => geometry.flip_horizontal(),
                FlipAxis::Vertical => geometry.flip_vertical(),
            }
        }
        EditStep::Crop(c) => {
            activate(session, Tool::Crop)?;
            *session.crop_mut()? = CropRegion::new(c.x, c.y, c.width, c.height);
            session.apply()?;
        }
        EditStep::Text(t) => {
            activate(session, Tool::Text)?;
            fill_text(session, t)?;
            session.apply()?;
        }
        EditStep::Layer(l) => {
            activate(session, Tool::Layer)?;
            add_overlays(session, l, base_dir)?;
            session.apply()?;
            report
                .warnings
                .extend(session.warnings().iter().map(ToString::to_string));
        }
        EditStep::Undo => {
            session.deactivate()?;
            if !session.undo() {
                tracing::debug!("undo: nothing to undo");
            }
        }
        EditStep::Redo => {
            session.deactivate()?;
            if !session.redo() {
                tracing::debug!("redo: nothing to redo");
            }
        }
    }
    Ok(())
}

/// Make `tool` active without toggling it off when it already is.
fn activate(session: &mut EditorSession, tool: Tool) -> EditorResult<()> {
    if session.active_tool() == Some(tool) {
        return Ok(());
    }
    session.select_tool(tool)
}

fn fill_text(session: &mut EditorSession, t: &TextStep) -> EditorResult<()> {
    let overlay = session.text_mut()?;
    overlay.text = t.text.clone();
    if let Some(font) = t.font {
        overlay.font = font;
    }
    if let Some(size) = t.size {
        overlay.size = size;
    }
    if let Some(color) = t.color {
        overlay.color = color;
    }
    if let Some(x) = t.x {
        overlay.x = x;
    }
    if let Some(y) = t.y {
        overlay.y = y;
    }
    Ok(())
}

fn add_overlays(session: &mut EditorSession, step: &LayerStep, base_dir: &Path) -> EditorResult<()> {
    for spec in &step.overlays {
        let path = base_dir.join(&spec.source);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read overlay '{}' from '{}'", spec.id, path.display()))?;

        let defaults = Placement::default();
        let placement = Placement {
            x: spec.x.unwrap_or(defaults.x),
            y: spec.y.unwrap_or(defaults.y),
            width: spec.width.unwrap_or(defaults.width),
            height: spec.height.unwrap_or(defaults.height),
        };
        let mut overlay = OverlayImage::new(
            spec.id.clone(),
            OverlaySource::Encoded {
                bytes: Arc::from(bytes),
                mime: None,
            },
        )
        .with_placement(placement);
        if let Some(opacity) = spec.opacity {
            overlay = overlay.with_opacity(opacity);
        }
        if let Some(mode) = spec.blend_mode {
            overlay = overlay.with_blend_mode(mode);
        }
        session.add_overlay(overlay)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/script/run.rs"]
mod tests;
