//! The sample generation loop.
//!
//! For each iteration a center is drawn uniformly from the bounding box, the
//! square around it is fetched from both sources, and the two images are
//! written as `copernicus/NNNNNN.jpg` and `usda_nass/NNNNNN.jpg` with the same
//! sequence number. Any error aborts the run; pairs already written stay on
//! disk and are not resumed from.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use dataset_common::{square, BoundingBox, DatasetLayout, SampleKind};
use image::ImageBuffer;
use imagery::encode::JpegPixel;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DatasetError, Result};
use crate::progress::{BatchProgress, ProgressSink, PROGRESS_INTERVAL};
use crate::source::ImageSource;

/// Parameters of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of pairs to generate
    #[serde(default = "default_count")]
    pub count: u64,
    /// Sequence number of the first pair
    #[serde(default)]
    pub start_index: u64,
    /// Area sample centers are drawn from
    #[serde(default = "default_bounds")]
    pub bounds: BoundingBox,
    /// Side of the sampled square in kilometers
    #[serde(default = "default_square_size_km")]
    pub square_size_km: f64,
    /// Export resolution in meters per pixel
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Edge of the top-left crop; `None` keeps the full export
    #[serde(default = "default_crop_size")]
    pub crop_size: Option<u32>,
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
    /// RNG seed for reproducible sample locations
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_count() -> u64 {
    30000
}

fn default_bounds() -> BoundingBox {
    BoundingBox::new(-121.0, 36.0, -89.0, 45.0)
}

fn default_square_size_km() -> f64 {
    3.75
}

fn default_scale() -> f64 {
    20.0
}

fn default_crop_size() -> Option<u32> {
    Some(224)
}

fn default_output_root() -> PathBuf {
    PathBuf::from("dataset")
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            start_index: 0,
            bounds: default_bounds(),
            square_size_km: default_square_size_km(),
            scale: default_scale(),
            crop_size: default_crop_size(),
            output_root: default_output_root(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        self.bounds
            .validate()
            .map_err(|e| DatasetError::InvalidConfig(e.to_string()))?;
        if !(self.square_size_km > 0.0) {
            return Err(DatasetError::InvalidConfig(
                "square_size_km must be > 0".to_string(),
            ));
        }
        if !(self.scale > 0.0) {
            return Err(DatasetError::InvalidConfig("scale must be > 0".to_string()));
        }
        if self.crop_size == Some(0) {
            return Err(DatasetError::InvalidConfig(
                "crop_size must be > 0".to_string(),
            ));
        }
        if self.last_index().is_none() && self.count > 0 {
            return Err(DatasetError::InvalidConfig(format!(
                "start_index {} + count {} overflows the sample numbering",
                self.start_index, self.count
            )));
        }
        Ok(())
    }

    /// Sequence number of the last pair, `None` when nothing is generated
    /// or the range does not fit in `u64`.
    pub fn last_index(&self) -> Option<u64> {
        self.count
            .checked_sub(1)
            .and_then(|offset| self.start_index.checked_add(offset))
    }
}

/// Totals of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    /// Pairs written
    pub generated: u64,
    /// Images kept uncropped because they were smaller than the crop
    pub undersized: u64,
    /// Sequence number range written, if any
    pub indices: Option<(u64, u64)>,
    pub elapsed: Duration,
}

pub struct Generator {
    config: GeneratorConfig,
    layout: DatasetLayout,
    rng: StdRng,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let layout = DatasetLayout::new(&config.output_root);
        Ok(Self {
            config,
            layout,
            rng,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    /// Generate `count` pairs, reporting to `progress`.
    pub async fn run<S, P>(&mut self, source: &S, progress: &mut P) -> Result<GenerationSummary>
    where
        S: ImageSource + ?Sized,
        P: ProgressSink + ?Sized,
    {
        for kind in SampleKind::ALL {
            tokio::fs::create_dir_all(self.layout.kind_dir(kind)).await?;
        }

        info!(
            count = self.config.count,
            start_index = self.config.start_index,
            bounds = %self.config.bounds,
            root = %self.layout.root().display(),
            "Starting sample generation"
        );

        let run_start = Instant::now();
        let mut batch_start = Instant::now();
        let mut undersized = 0u64;

        for i in 0..self.config.count {
            if i > 0 && i % PROGRESS_INTERVAL == 0 {
                progress.batch_complete(BatchProgress {
                    generated: i,
                    batch_elapsed: batch_start.elapsed(),
                });
                batch_start = Instant::now();
            }

            let center = self.config.bounds.sample(&mut self.rng);
            let region = square(center, self.config.square_size_km);
            // in range: checked by `validate` in `new`
            let index = self.config.start_index + i;

            debug!(index, lon = center.lon, lat = center.lat, "Sampling location");

            let optical = source
                .fetch_optical(&region, self.config.scale, self.config.crop_size)
                .await?;
            let cultivation = source
                .fetch_cultivation(&region, self.config.scale, self.config.crop_size)
                .await?;

            if optical.undersized {
                undersized += 1;
                progress.undersized(index, SampleKind::Optical, optical.image.dimensions());
            }
            if cultivation.undersized {
                undersized += 1;
                progress.undersized(
                    index,
                    SampleKind::Cultivation,
                    cultivation.image.dimensions(),
                );
            }

            self.write(SampleKind::Optical, index, &optical.image).await?;
            self.write(SampleKind::Cultivation, index, &cultivation.image)
                .await?;
        }

        let summary = GenerationSummary {
            generated: self.config.count,
            undersized,
            indices: self
                .config
                .last_index()
                .map(|last| (self.config.start_index, last)),
            elapsed: run_start.elapsed(),
        };

        info!(
            generated = summary.generated,
            undersized = summary.undersized,
            elapsed_secs = summary.elapsed.as_secs_f64(),
            "Sample generation complete"
        );

        Ok(summary)
    }

    async fn write<Px>(
        &self,
        kind: SampleKind,
        index: u64,
        image: &ImageBuffer<Px, Vec<u8>>,
    ) -> Result<()>
    where
        Px: JpegPixel,
    {
        let path = self.layout.sample_path(kind, index);
        let bytes = imagery::encode_jpeg(image).map_err(|source| DatasetError::ImageWrite {
            path: path.clone(),
            source,
        })?;
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }
}
