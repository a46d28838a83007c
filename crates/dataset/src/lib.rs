//! Dataset assembly for paired cropland samples.
//!
//! # Architecture
//!
//! - [`source`]: fetches one optical and one cultivation image for a square
//!   region through an [`ImageSource`]; [`EarthEngineSource`] is the remote
//!   implementation
//! - [`generator`]: the sampling loop writing `copernicus/` and `usda_nass/`
//!   pairs under shared six-digit names
//! - [`split`]: shuffled train/test partitioning of existing pairs
//! - [`stats`]: white/black pixel balance of cultivation images
//!
//! Everything runs strictly sequentially: one fetch at a time, one file at a
//! time.

pub mod corpus;
pub mod error;
pub mod generator;
pub mod progress;
pub mod source;
pub mod split;
pub mod stats;

pub use error::{DatasetError, Result};
pub use generator::{GenerationSummary, Generator, GeneratorConfig};
pub use progress::{BatchProgress, LogProgress, ProgressSink, PROGRESS_INTERVAL};
pub use source::{EarthEngineSource, ImageSource, Sample};
pub use split::{partition, split_dataset, SplitOptions, SplitSummary};
pub use stats::{pixel_balance, PixelBalance};
