/// Convenience result type used across retouch.
pub type EditorResult<T> = Result<T, EditorError>;

/// Classification of AI service failures, each mapped to a distinct user-facing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceErrorKind {
    /// The service refused the request for regional or permission reasons.
    RegionRestricted,
    /// Credentials or service configuration are missing or invalid.
    Credentials,
    /// Any other failure reported by the service.
    Failed,
}

/// Top-level error taxonomy used by editor APIs.
#[derive(thiserror::Error, Debug)]
pub enum EditorError {
    /// Malformed or unreadable image bytes.
    #[error("decode error: {0}")]
    Decode(String),

    /// Crop region with zero width or height. Engines treat this as a silent no-op.
    #[error("crop region is empty")]
    EmptyRegion,

    /// One overlay was skipped while compositing (undecodable or empty placement); the
    /// others are unaffected.
    #[error("overlay '{id}' skipped: {reason}")]
    OverlayDecode {
        /// Id of the skipped overlay.
        id: String,
        /// Underlying decode failure.
        reason: String,
    },

    /// Failure reported by the AI service boundary.
    #[error("{message}")]
    Service {
        /// Failure class.
        kind: ServiceErrorKind,
        /// User-facing message.
        message: String,
    },

    /// The service completed without returning a usable image.
    #[error("no image data found in the service response")]
    EmptyResponse,

    /// Invalid user-provided parameters or script data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The operation needs a loaded image and none is present.
    #[error("no image loaded")]
    NoImage,

    /// No usable font face could be resolved or shaped.
    #[error("font error: {0}")]
    Font(String),

    /// Invalid configuration file or environment override.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EditorError {
    /// Build a [`EditorError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`EditorError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`EditorError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`EditorError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a classified [`EditorError::Service`] from a raw service failure message.
    pub fn service(raw_message: impl AsRef<str>) -> Self {
        let raw = raw_message.as_ref();
        let lower = raw.to_lowercase();
        if lower.contains("region not supported") || lower.contains("permission denied") {
            return Self::Service {
                kind: ServiceErrorKind::RegionRestricted,
                message: "We're sorry, but AI features are not available in your region."
                    .to_string(),
            };
        }
        if lower.contains("api key") {
            return Self::Service {
                kind: ServiceErrorKind::Credentials,
                message: "There seems to be an issue with the API key configuration.".to_string(),
            };
        }
        let message = if raw.trim().is_empty() {
            "An unknown error occurred while communicating with the AI service.".to_string()
        } else {
            raw.to_string()
        };
        Self::Service {
            kind: ServiceErrorKind::Failed,
            message,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
