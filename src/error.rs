//! Error types for the email classifier.

use std::time::Duration;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    /// Shell line that fixes the error, when there is an obvious one.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MissingEnvVar(var) => Some(format!("export {var}=...")),
            Self::InvalidValue { .. } => None,
        }
    }
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Provider {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },
}

/// Attachment text extraction errors.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Unsupported attachment type: {content_type}")]
    UnsupportedType { content_type: String },

    #[error("Unreadable PDF attachment: {reason}")]
    UnreadablePdf { reason: String },

    #[error("Attachment is not valid UTF-8 text: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),

    #[error("Extraction worker failed: {0}")]
    Worker(String),
}

/// Error kinds surfaced to callers of the processing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent missing, empty or wrongly typed content.
    BadInput,
    /// The external model call failed or timed out. Transient.
    ModelUnavailable,
    /// The model answered but the answer could not be used.
    ModelOutputInvalid,
    /// Something failed inside the service itself.
    Internal,
}

/// Pipeline errors for a single email processing request.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("{0}")]
    BadInput(String),

    #[error("{0}")]
    ModelUnavailable(String),

    #[error("{0}")]
    ModelOutputInvalid(String),

    #[error("{0}")]
    Internal(String),
}

impl ProcessError {
    /// The kind of this error, used for status mapping at the boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadInput(_) => ErrorKind::BadInput,
            Self::ModelUnavailable(_) => ErrorKind::ModelUnavailable,
            Self::ModelOutputInvalid(_) => ErrorKind::ModelOutputInvalid,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<ExtractError> for ProcessError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedType { .. } => {
                Self::BadInput("invalid file type: only PDF and plain text files are accepted".into())
            }
            ExtractError::UnreadablePdf { .. } => {
                Self::BadInput(format!("unreadable attachment: {err}"))
            }
            ExtractError::InvalidEncoding(_) => {
                Self::BadInput(format!("unreadable attachment: {err}"))
            }
            ExtractError::Worker(reason) => Self::Internal(format!("extraction failed: {reason}")),
        }
    }
}
