use crate::assets::decode::{decode_image, encode_png};
use crate::assets::fonts::{FontBook, TextLayoutEngine};
use crate::config::EditorConfig;
use crate::edit::model::{AdjustmentParams, CropRegion, GeometryParams, OverlayImage, TextOverlay};
use crate::edit::state::{EditState, Tool};
use crate::foundation::core::RasterBuffer;
use crate::foundation::error::{EditorError, EditorResult};
use crate::history::stack::HistoryStack;
use crate::render::crop::apply_crop;
use crate::render::layers::apply_layers;
use crate::render::text::apply_text;
use crate::render::transform::apply_transform;
use crate::session::service::{
    AiInstruction, Completion, ImageService, REQUEST_MIME, ServiceFailure, ServiceRequest,
    ServiceResponse, ServiceTicket,
};

/// Which tool is active, with its pending parameters.
#[derive(Clone, Debug, Default)]
pub enum ToolState {
    /// No tool active.
    #[default]
    Idle,
    /// `tool` is active and `edit` holds its uncommitted parameters.
    ToolActive {
        /// Active tool.
        tool: Tool,
        /// Pending parameters.
        edit: EditState,
    },
}

/// One editing session: the undo/redo history, the active tool and the service boundary.
///
/// Tool switches follow one rule: adjust/rotate/flip/filters share a pending payload, and
/// leaving that family commits any non-neutral parameters. Crop, text and layer edits need
/// an explicit [`EditorSession::apply`] and are discarded on switch.
pub struct EditorSession {
    history: HistoryStack,
    state: ToolState,
    error: Option<EditorError>,
    warnings: Vec<EditorError>,
    fonts: FontBook,
    text_engine: TextLayoutEngine,
    pending: Option<ServiceTicket>,
    next_sequence: u64,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("history", &self.history)
            .field("state", &self.state)
            .field("error", &self.error)
            .field("warnings", &self.warnings.len())
            .field("pending", &self.pending)
            .finish()
    }
}

impl EditorSession {
    /// Session configured by `config`; fonts load according to its font settings.
    pub fn new(config: &EditorConfig) -> Self {
        let fonts = FontBook::load(config.fonts_dir.as_deref(), config.load_system_fonts);
        Self::with_fonts(config, fonts)
    }

    /// Session using an already-built font book.
    pub fn with_fonts(config: &EditorConfig, fonts: FontBook) -> Self {
        Self {
            history: HistoryStack::with_limit(config.history_limit),
            state: ToolState::Idle,
            error: None,
            warnings: Vec::new(),
            fonts,
            text_engine: TextLayoutEngine::new(),
            pending: None,
            next_sequence: 0,
        }
    }

    // ---------------------------------------------------------------------------------------
    // Image in/out
    // ---------------------------------------------------------------------------------------

    /// Decode `bytes` and commit the result as the new present, resetting the active tool.
    pub fn load_image(&mut self, bytes: &[u8], mime: Option<&str>) -> EditorResult<()> {
        let raster = decode_image(bytes, mime)?;
        self.load_raster(raster);
        Ok(())
    }

    /// Commit an already-decoded raster as the new present, resetting the active tool.
    pub fn load_raster(&mut self, raster: RasterBuffer) {
        self.history.commit(raster);
        self.state = ToolState::Idle;
        self.error = None;
    }

    /// PNG bytes of the present snapshot. Pending tool parameters are not included.
    pub fn export_png(&self) -> EditorResult<Vec<u8>> {
        encode_png(self.current().ok_or(EditorError::NoImage)?)
    }

    /// Present snapshot.
    pub fn current(&self) -> Option<&RasterBuffer> {
        self.history.current()
    }

    /// Underlying history.
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    // ---------------------------------------------------------------------------------------
    // History
    // ---------------------------------------------------------------------------------------

    /// Step back one snapshot.
    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            self.error = None;
        }
        moved
    }

    /// Step forward one snapshot.
    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            self.error = None;
        }
        moved
    }

    /// Return `true` when [`EditorSession::undo`] would succeed.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Return `true` when [`EditorSession::redo`] would succeed.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---------------------------------------------------------------------------------------
    // Error state
    // ---------------------------------------------------------------------------------------

    /// Last service error, cleared by the next successful operation.
    pub fn error(&self) -> Option<&EditorError> {
        self.error.as_ref()
    }

    /// Clear the error state.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Overlays skipped by the last layer commit.
    pub fn warnings(&self) -> &[EditorError] {
        &self.warnings
    }

    // ---------------------------------------------------------------------------------------
    // Tool state machine
    // ---------------------------------------------------------------------------------------

    /// Current tool state.
    pub fn tool_state(&self) -> &ToolState {
        &self.state
    }

    /// Active tool, if any.
    pub fn active_tool(&self) -> Option<Tool> {
        match &self.state {
            ToolState::Idle => None,
            ToolState::ToolActive { tool, .. } => Some(*tool),
        }
    }

    /// Pending parameters of the active tool ([`EditState::Empty`] when idle).
    pub fn edit_state(&self) -> &EditState {
        static EMPTY: EditState = EditState::Empty;
        match &self.state {
            ToolState::Idle => &EMPTY,
            ToolState::ToolActive { edit, .. } => edit,
        }
    }

    /// Activate `tool`, or deactivate it when it is already active.
    ///
    /// Leaving the transform family auto-commits its non-neutral parameters first; if that
    /// commit fails the state is left unchanged.
    pub fn select_tool(&mut self, tool: Tool) -> EditorResult<()> {
        if self.active_tool() == Some(tool) {
            return self.deactivate();
        }
        if self.current().is_none() {
            return Err(EditorError::NoImage);
        }

        let prev = std::mem::take(&mut self.state);
        let next = match prev {
            ToolState::ToolActive { tool: from, edit }
                if from.is_transform_family() && tool.is_transform_family() =>
            {
                tracing::debug!(?from, to = ?tool, "carrying transform parameters");
                ToolState::ToolActive { tool, edit }
            }
            ToolState::ToolActive { tool: from, edit } => {
                if let Err(e) = self.leave(from, &edit) {
                    self.state = ToolState::ToolActive { tool: from, edit };
                    return Err(e);
                }
                ToolState::ToolActive {
                    tool,
                    edit: EditState::fresh(tool),
                }
            }
            ToolState::Idle => ToolState::ToolActive {
                tool,
                edit: EditState::fresh(tool),
            },
        };
        self.state = next;
        Ok(())
    }

    /// Return to idle, auto-committing pending transform parameters.
    pub fn deactivate(&mut self) -> EditorResult<()> {
        let prev = std::mem::take(&mut self.state);
        if let ToolState::ToolActive { tool, edit } = prev {
            if let Err(e) = self.leave(tool, &edit) {
                self.state = ToolState::ToolActive { tool, edit };
                return Err(e);
            }
        }
        Ok(())
    }

    /// Exit handling for `tool`: commit transform parameters, discard anything else.
    fn leave(&mut self, tool: Tool, edit: &EditState) -> EditorResult<()> {
        if !tool.is_transform_family() {
            if !edit.is_neutral() {
                tracing::debug!(?tool, "discarding uncommitted edit");
            }
            return Ok(());
        }
        if edit.is_neutral() {
            return Ok(());
        }
        tracing::debug!(?tool, "auto-committing transform parameters");
        self.commit_edit(edit).map(|_| ())
    }

    /// Commit the active tool's parameters and return to idle.
    ///
    /// Returns `Ok(false)` when nothing changed, in which case no history entry is added.
    /// That includes edits whose output equals the present image pixel for pixel, such as
    /// flipping a symmetric image; those leave the history untouched.
    pub fn apply(&mut self) -> EditorResult<bool> {
        if self.current().is_none() {
            return Err(EditorError::NoImage);
        }
        let prev = std::mem::take(&mut self.state);
        let ToolState::ToolActive { tool, edit } = prev else {
            return Ok(false);
        };
        match self.commit_edit(&edit) {
            Ok(committed) => Ok(committed),
            Err(e) => {
                self.state = ToolState::ToolActive { tool, edit };
                Err(e)
            }
        }
    }

    /// Run the engine for `edit` over the present snapshot and commit a changed result.
    ///
    /// An output identical to the present snapshot is dropped and `Ok(false)` is returned.
    fn commit_edit(&mut self, edit: &EditState) -> EditorResult<bool> {
        let base = self.history.current().ok_or(EditorError::NoImage)?;
        if edit.is_neutral() {
            return Ok(false);
        }

        let next = match edit {
            EditState::Empty => return Ok(false),
            EditState::Transform {
                adjustment,
                geometry,
            } => apply_transform(base, adjustment, geometry)?,
            EditState::Crop(region) => apply_crop(base, region)?,
            EditState::Text(overlay) => {
                apply_text(base, overlay, &self.fonts, &mut self.text_engine)?
            }
            EditState::Layers { overlays, .. } => {
                let composited = apply_layers(base, overlays)?;
                self.warnings = composited.skipped;
                composited.raster
            }
        };

        if Some(&next) == self.history.current() {
            tracing::debug!("edit produced no change; nothing committed");
            return Ok(false);
        }
        self.history.commit(next);
        self.error = None;
        Ok(true)
    }

    fn edit_mut(&mut self, wanted: &[Tool]) -> EditorResult<&mut EditState> {
        match &mut self.state {
            ToolState::ToolActive { tool, edit } if wanted.contains(tool) => Ok(edit),
            ToolState::ToolActive { tool, .. } => Err(EditorError::validation(format!(
                "{tool:?} tool does not edit these parameters"
            ))),
            ToolState::Idle => Err(EditorError::validation("no tool is active")),
        }
    }

    /// Pending tonal adjustments (any transform-family tool).
    pub fn adjustment_mut(&mut self) -> EditorResult<&mut AdjustmentParams> {
        match self.edit_mut(&[Tool::Adjust, Tool::Rotate, Tool::Flip, Tool::Filters])? {
            EditState::Transform { adjustment, .. } => Ok(adjustment),
            _ => Err(EditorError::validation("transform parameters unavailable")),
        }
    }

    /// Pending rotation and flips (any transform-family tool).
    pub fn geometry_mut(&mut self) -> EditorResult<&mut GeometryParams> {
        match self.edit_mut(&[Tool::Adjust, Tool::Rotate, Tool::Flip, Tool::Filters])? {
            EditState::Transform { geometry, .. } => Ok(geometry),
            _ => Err(EditorError::validation("transform parameters unavailable")),
        }
    }

    /// Pending crop rectangle (crop tool).
    pub fn crop_mut(&mut self) -> EditorResult<&mut CropRegion> {
        match self.edit_mut(&[Tool::Crop])? {
            EditState::Crop(region) => Ok(region),
            _ => Err(EditorError::validation("crop parameters unavailable")),
        }
    }

    /// Pending text overlay (text tool).
    pub fn text_mut(&mut self) -> EditorResult<&mut TextOverlay> {
        match self.edit_mut(&[Tool::Text])? {
            EditState::Text(overlay) => Ok(overlay),
            _ => Err(EditorError::validation("text parameters unavailable")),
        }
    }

    fn layers_mut(&mut self) -> EditorResult<(&mut Vec<OverlayImage>, &mut Option<String>)> {
        match self.edit_mut(&[Tool::Layer])? {
            EditState::Layers { overlays, selected } => Ok((overlays, selected)),
            _ => Err(EditorError::validation("layer parameters unavailable")),
        }
    }

    /// Append an overlay on top of the pending stack (layer tool). Ids must be unique.
    pub fn add_overlay(&mut self, overlay: OverlayImage) -> EditorResult<()> {
        let (overlays, selected) = self.layers_mut()?;
        if overlays.iter().any(|o| o.id == overlay.id) {
            return Err(EditorError::validation(format!(
                "duplicate overlay id '{}'",
                overlay.id
            )));
        }
        *selected = Some(overlay.id.clone());
        overlays.push(overlay);
        Ok(())
    }

    /// Remove an overlay by id; `Ok(false)` when no such overlay exists.
    pub fn remove_overlay(&mut self, id: &str) -> EditorResult<bool> {
        let (overlays, selected) = self.layers_mut()?;
        let before = overlays.len();
        overlays.retain(|o| o.id != id);
        if selected.as_deref() == Some(id) {
            *selected = None;
        }
        Ok(overlays.len() != before)
    }

    /// Mutable access to one pending overlay by id.
    pub fn overlay_mut(&mut self, id: &str) -> EditorResult<Option<&mut OverlayImage>> {
        let (overlays, _) = self.layers_mut()?;
        Ok(overlays.iter_mut().find(|o| o.id == id))
    }

    /// Select an overlay (or clear the selection). The compositor never reads it.
    pub fn select_overlay(&mut self, id: Option<&str>) -> EditorResult<()> {
        let (overlays, selected) = self.layers_mut()?;
        match id {
            Some(id) if !overlays.iter().any(|o| o.id == id) => Err(EditorError::validation(
                format!("no overlay with id '{id}'"),
            )),
            Some(id) => {
                *selected = Some(id.to_string());
                Ok(())
            }
            None => {
                *selected = None;
                Ok(())
            }
        }
    }

    /// Id of the selected overlay.
    pub fn selected_overlay(&self) -> Option<&str> {
        match self.edit_state() {
            EditState::Layers { selected, .. } => selected.as_deref(),
            _ => None,
        }
    }

    // ---------------------------------------------------------------------------------------
    // Service boundary
    // ---------------------------------------------------------------------------------------

    /// Return `true` while a service request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Package the present image for the AI service. A newer request supersedes older ones.
    pub fn begin_service_request(
        &mut self,
        instruction: &AiInstruction,
    ) -> EditorResult<ServiceRequest> {
        let prompt = instruction.prompt().trim();
        if prompt.is_empty() {
            return Err(EditorError::validation("AI prompt must not be empty"));
        }
        let image = self.export_png()?;

        self.next_sequence = self.next_sequence.wrapping_add(1);
        let ticket = ServiceTicket {
            sequence: self.next_sequence,
            revision: self.history.revision(),
        };
        self.pending = Some(ticket);
        tracing::debug!(?ticket, "service request issued");

        Ok(ServiceRequest {
            ticket,
            image,
            mime_type: REQUEST_MIME,
            prompt: prompt.to_string(),
        })
    }

    /// Apply a service result if `ticket` is still current; otherwise drop it as stale.
    pub fn complete_service_request(
        &mut self,
        ticket: ServiceTicket,
        outcome: Result<ServiceResponse, ServiceFailure>,
    ) -> Completion {
        if self.pending != Some(ticket) {
            tracing::warn!(?ticket, "dropping superseded service completion");
            return Completion::Stale;
        }
        self.pending = None;
        if ticket.revision != self.history.revision() {
            tracing::warn!(
                ?ticket,
                revision = self.history.revision(),
                "dropping stale service completion"
            );
            return Completion::Stale;
        }

        let result = outcome
            .map_err(|f| EditorError::service(&f.message))
            .and_then(|resp| {
                if resp.image.is_empty() {
                    return Err(EditorError::EmptyResponse);
                }
                decode_image(&resp.image, resp.mime_type.as_deref())
            });

        match result {
            Ok(raster) => {
                self.load_raster(raster);
                Completion::Applied
            }
            Err(e) => {
                tracing::warn!(error = %e, "service request failed");
                self.error = Some(e);
                Completion::Failed
            }
        }
    }

    /// Issue a request to `service`, wait for it and complete it.
    #[tracing::instrument(skip(self, service))]
    pub fn run_service(
        &mut self,
        service: &mut dyn ImageService,
        instruction: &AiInstruction,
    ) -> EditorResult<Completion> {
        let request = self.begin_service_request(instruction)?;
        let outcome = service.edit(&request);
        Ok(self.complete_service_request(request.ticket, outcome))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
