use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Logger error: {0}")]
    Logger(String),
}

pub type Result<T> = std::result::Result<T, BotError>;

/// Why an image generation attempt produced no image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    /// The response carried no image entries.
    NoData,
    /// The first entry had no base64 payload.
    NoBase64,
    /// The base64 payload could not be decoded.
    Decode,
    Authentication,
    RateLimited,
    ContentPolicy,
    InvalidRequest,
    /// The provider answered with a server error or an unreadable body.
    Provider,
    /// The request never got a response.
    Transport,
}

impl GenerationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationErrorKind::NoData => "no_data",
            GenerationErrorKind::NoBase64 => "no_base64",
            GenerationErrorKind::Decode => "decode",
            GenerationErrorKind::Authentication => "authentication",
            GenerationErrorKind::RateLimited => "rate_limited",
            GenerationErrorKind::ContentPolicy => "content_policy",
            GenerationErrorKind::InvalidRequest => "invalid_request",
            GenerationErrorKind::Provider => "provider",
            GenerationErrorKind::Transport => "transport",
        }
    }

    /// Failures that may succeed if the same request is sent again later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GenerationErrorKind::RateLimited
                | GenerationErrorKind::Provider
                | GenerationErrorKind::Transport
        )
    }
}

impl fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failed generation. Displays as the bare message so it can be shown to users verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            kind.as_str().replace('_', " ")
        } else {
            message
        };
        Self { kind, message }
    }

    pub fn no_data() -> Self {
        Self::new(GenerationErrorKind::NoData, "No image data returned.")
    }

    pub fn no_base64() -> Self {
        Self::new(GenerationErrorKind::NoBase64, "No image data base64 returned.")
    }
}

/// Error raised by an [`ImageProvider`](crate::openai::ImageProvider) call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub kind: GenerationErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

impl ProviderError {
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl From<ProviderError> for GenerationError {
    fn from(err: ProviderError) -> Self {
        GenerationError::new(err.kind, err.message)
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_decode() {
            GenerationErrorKind::Provider
        } else {
            GenerationErrorKind::Transport
        };
        let status = err.status().map(|s| s.as_u16());
        Self {
            kind,
            message: err.to_string(),
            status,
        }
    }
}
