//! Train/test partitioning of collected pairs.
//!
//! The cultivation directory is authoritative for which pairs exist. Names
//! are shuffled, the first `floor(fraction * n)` go to `train/` and the rest
//! to `test/`. Both images of each pair are decoded and re-encoded into the
//! partition; a missing optical counterpart fails the split with a read
//! error.

use std::path::Path;

use dataset_common::{DatasetLayout, Partition, SampleKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::corpus::list_sample_names;
use crate::error::{DatasetError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct SplitOptions {
    /// Share of pairs placed in the training partition
    pub train_fraction: f64,
    /// RNG seed for a reproducible shuffle
    pub seed: Option<u64>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            train_fraction: 0.8,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSummary {
    pub train: Vec<String>,
    pub test: Vec<String>,
}

/// Shuffle `names` and cut them into `(train, test)`.
///
/// The training side holds exactly `floor(train_fraction * n)` names.
pub fn partition<R: Rng + ?Sized>(
    mut names: Vec<String>,
    train_fraction: f64,
    rng: &mut R,
) -> (Vec<String>, Vec<String>) {
    names.shuffle(rng);
    let cutoff = ((train_fraction * names.len() as f64).floor() as usize).min(names.len());
    let test = names.split_off(cutoff);
    (names, test)
}

/// Copy every pair under `root` into `root/train` or `root/test`.
pub fn split_dataset(root: &Path, options: &SplitOptions) -> Result<SplitSummary> {
    if !(0.0..=1.0).contains(&options.train_fraction) {
        return Err(DatasetError::InvalidConfig(format!(
            "train_fraction must be within [0, 1], got {}",
            options.train_fraction
        )));
    }

    let layout = DatasetLayout::new(root);
    let names = list_sample_names(&layout.kind_dir(SampleKind::Cultivation))?;

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (train, test) = partition(names, options.train_fraction, &mut rng);

    info!(
        train = train.len(),
        test = test.len(),
        root = %root.display(),
        "Splitting dataset"
    );

    copy_partition(&layout, Partition::Train, &train)?;
    copy_partition(&layout, Partition::Test, &test)?;

    Ok(SplitSummary { train, test })
}

fn copy_partition(layout: &DatasetLayout, partition: Partition, names: &[String]) -> Result<()> {
    for kind in SampleKind::ALL {
        std::fs::create_dir_all(layout.partition_dir(partition, kind))?;
    }

    for name in names {
        for kind in SampleKind::ALL {
            let src = layout.kind_dir(kind).join(name);
            let dst = layout.partition_dir(partition, kind).join(name);
            copy_image(&src, &dst, kind)?;
        }
        debug!(name = %name, partition = partition.dir_name(), "Copied pair");
    }
    Ok(())
}

fn copy_image(src: &Path, dst: &Path, kind: SampleKind) -> Result<()> {
    let image = image::open(src).map_err(|source| DatasetError::ImageRead {
        path: src.to_path_buf(),
        source,
    })?;

    let written = match kind {
        SampleKind::Optical => imagery::write_jpeg(dst, &image.to_rgb8()),
        SampleKind::Cultivation => imagery::write_jpeg(dst, &image.to_luma8()),
    };
    written.map_err(|source| DatasetError::ImageWrite {
        path: dst.to_path_buf(),
        source,
    })
}
