//! Error types for raster processing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while decoding or composing rasters.
#[derive(Error, Debug)]
pub enum ImageryError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode TIFF {path}: {source}")]
    Tiff {
        path: PathBuf,
        #[source]
        source: tiff::TiffError,
    },

    #[error("Unsupported raster layout in {path}: {message}")]
    UnsupportedLayout { path: PathBuf, message: String },

    #[error("Band size mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    ShapeMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    #[error("Band holds {actual} samples, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for raster operations.
pub type Result<T> = std::result::Result<T, ImageryError>;
