//! Raster processing for dataset samples.
//!
//! Turns decoded remote-sensing bands into the 8-bit images written to the
//! dataset:
//!
//! - [`band`]: single-band GeoTIFF decoding into `f64` grids
//! - [`scale`]: reflectance and cultivation intensity mappings
//! - [`compose`]: stacking bands into RGB / grayscale images
//! - [`crop`]: top-left square crops with an undersized fallback
//! - [`encode`]: JPEG encoding of the finished samples

pub mod band;
pub mod compose;
pub mod crop;
pub mod encode;
pub mod error;
pub mod scale;

pub use band::{read_band, Band};
pub use compose::{cultivation_image, true_color_image};
pub use crop::{crop_top_left, Crop};
pub use encode::{encode_jpeg, write_jpeg, JPEG_QUALITY};
pub use error::{ImageryError, Result};
pub use scale::{cultivation_intensity, optical_intensity, REFLECTANCE_CEILING};
