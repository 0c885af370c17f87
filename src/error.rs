//! Error types for Onshape API operations.

use thiserror::Error;

/// Errors that can occur during Onshape API operations.
#[derive(Debug, Error)]
pub enum OnshapeError {
    /// Credentials or other configuration are missing or invalid.
    #[error("Onshape configuration required: {0}")]
    ConfigMissing(String),

    /// A header name or value could not be used on the wire.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The API answered with a non-success status.
    #[error("Onshape API error ({status_code}): {message}")]
    UnexpectedStatus { status_code: u16, message: String },

    /// The API answered with a 307 that was not followed.
    #[error("Redirected to {location}")]
    Redirect { location: String },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl OnshapeError {
    /// HTTP status code carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status_code, .. } => Some(*status_code),
            Self::Redirect { .. } => Some(307),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for Onshape operations.
pub type Result<T> = core::result::Result<T, OnshapeError>;
