//! Error types for dataset operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building, splitting or measuring a dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Earth Engine request failed: {0}")]
    EarthEngine(#[from] earth_engine::EarthEngineError),

    #[error("Raster processing failed: {0}")]
    Imagery(#[from] imagery::ImageryError),

    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: imagery::ImageryError,
    },

    #[error("Failed to list {path}: {message}")]
    Listing { path: PathBuf, message: String },

    #[error("No images found in {0}")]
    EmptyCorpus(PathBuf),

    #[error("Export returned {count} bands, expected {expected}")]
    BandCount { expected: usize, count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
