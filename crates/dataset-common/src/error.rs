//! Error types for the shared dataset types.

use thiserror::Error;

/// Result type alias using DatasetCommonError.
pub type DatasetCommonResult<T> = Result<T, DatasetCommonError>;

#[derive(Debug, Error)]
pub enum DatasetCommonError {
    #[error("Invalid bounding box format: {0}. Expected 'min_lon,min_lat,max_lon,max_lat'")]
    InvalidBboxFormat(String),

    #[error("Invalid number in bounding box: {0}")]
    InvalidBboxNumber(String),

    #[error("Inverted bounding box: min ({min_lon}, {min_lat}) exceeds max ({max_lon}, {max_lat})")]
    InvertedBbox {
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
    },
}
