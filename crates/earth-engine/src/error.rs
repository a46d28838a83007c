//! Error types for the Earth Engine client.

use thiserror::Error;

/// Errors that can occur while talking to Earth Engine.
#[derive(Error, Debug)]
pub enum EarthEngineError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Earth Engine returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    InvalidResponse(String),

    #[error("Failed to read download archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Band '{0}' missing from download archive")]
    MissingBand(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Earth Engine operations.
pub type Result<T> = std::result::Result<T, EarthEngineError>;
