use serde::{Deserialize, Serialize};

/// MIME type of the image sent with every service request.
pub const REQUEST_MIME: &str = "image/png";

const REMOVE_BACKGROUND_PROMPT: &str =
    "remove the background, return the result as a png with a transparent background";
const UPSCALE_PROMPT: &str =
    "upscale this image to a higher resolution, sharpening fine detail without changing its content";
const COLORIZE_PROMPT: &str =
    "colorize this image with natural, realistic colors while preserving every detail";

/// What the AI service is asked to do with the present image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "prompt", rename_all = "kebab-case")]
pub enum AiInstruction {
    /// Free-form edit instruction.
    Prompt(String),
    /// Cut the subject out onto a transparent background.
    RemoveBackground,
    /// Increase resolution.
    Upscale,
    /// Add color to a monochrome image.
    Colorize,
}

impl AiInstruction {
    /// Prompt text sent to the service.
    pub fn prompt(&self) -> &str {
        match self {
            AiInstruction::Prompt(p) => p.as_str(),
            AiInstruction::RemoveBackground => REMOVE_BACKGROUND_PROMPT,
            AiInstruction::Upscale => UPSCALE_PROMPT,
            AiInstruction::Colorize => COLORIZE_PROMPT,
        }
    }
}

/// Identifies one outstanding request and the history revision it was issued against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ServiceTicket {
    pub(crate) sequence: u64,
    pub(crate) revision: u64,
}

impl ServiceTicket {
    /// History revision the request was issued against.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Payload handed to the AI service.
#[derive(Clone)]
pub struct ServiceRequest {
    /// Ticket to pass back on completion.
    pub ticket: ServiceTicket,
    /// PNG encoding of the present image.
    pub image: Vec<u8>,
    /// Always [`REQUEST_MIME`].
    pub mime_type: &'static str,
    /// Instruction text.
    pub prompt: String,
}

impl std::fmt::Debug for ServiceRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRequest")
            .field("ticket", &self.ticket)
            .field("image_len", &self.image.len())
            .field("mime_type", &self.mime_type)
            .field("prompt", &self.prompt)
            .finish()
    }
}

/// Image returned by the service.
#[derive(Clone, Debug, Default)]
pub struct ServiceResponse {
    /// Encoded image bytes.
    pub image: Vec<u8>,
    /// Declared MIME type, if any; the format is sniffed otherwise.
    pub mime_type: Option<String>,
}

/// Raw failure reported by the service, classified by the session on completion.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ServiceFailure {
    /// Failure message as reported by the service.
    pub message: String,
}

impl ServiceFailure {
    /// Wrap a raw service message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// What happened to a completed request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The result replaced the present image.
    Applied,
    /// The request failed; the session error state holds the classified error.
    Failed,
    /// History moved on since the request was issued; the result was dropped.
    Stale,
}

/// Blocking client for an image-editing service.
pub trait ImageService {
    /// Perform `request` and return the edited image.
    fn edit(&mut self, request: &ServiceRequest) -> Result<ServiceResponse, ServiceFailure>;
}

impl<F> ImageService for F
where
    F: FnMut(&ServiceRequest) -> Result<ServiceResponse, ServiceFailure>,
{
    fn edit(&mut self, request: &ServiceRequest) -> Result<ServiceResponse, ServiceFailure> {
        self(request)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/service.rs"]
mod tests;
