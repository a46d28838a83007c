//! Common types shared across the cropland dataset crates.
//!
//! - [`Coordinate`] and [`SquareRegion`]: the ground footprint of one sample
//! - [`BoundingBox`]: the area sample centers are drawn from
//! - [`layout`]: directory names and zero-padded sample filenames

pub mod bbox;
pub mod error;
pub mod layout;
pub mod square;

pub use bbox::BoundingBox;
pub use error::{DatasetCommonError, DatasetCommonResult};
pub use layout::{sample_file_name, DatasetLayout, Partition, SampleKind};
pub use square::{square, Coordinate, SquareRegion, EARTH_CIRCUMFERENCE_KM};
