//! On-disk layout of a dataset.
//!
//! ```text
//! <root>/copernicus/000123.jpg      optical sample
//! <root>/usda_nass/000123.jpg       cultivation sample
//! <root>/train/{copernicus,usda_nass}/...
//! <root>/test/{copernicus,usda_nass}/...
//! ```
//!
//! Pairs are joined only by identical file names.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extension of every sample image.
pub const SAMPLE_EXTENSION: &str = "jpg";

/// Which half of a sample pair an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleKind {
    /// True-color Sentinel-2 composite
    Optical,
    /// Cropland Data Layer cultivation mask
    Cultivation,
}

impl SampleKind {
    pub const ALL: [SampleKind; 2] = [SampleKind::Optical, SampleKind::Cultivation];

    pub fn dir_name(&self) -> &'static str {
        match self {
            SampleKind::Optical => "copernicus",
            SampleKind::Cultivation => "usda_nass",
        }
    }
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partition {
    Train,
    Test,
}

impl Partition {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Test => "test",
        }
    }
}

/// File name of sample `index`: six-digit zero-padded stem plus extension.
pub fn sample_file_name(index: u64) -> String {
    format!("{:06}.{}", index, SAMPLE_EXTENSION)
}

/// Resolves paths inside a dataset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind_dir(&self, kind: SampleKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    pub fn sample_path(&self, kind: SampleKind, index: u64) -> PathBuf {
        self.kind_dir(kind).join(sample_file_name(index))
    }

    pub fn partition_dir(&self, partition: Partition, kind: SampleKind) -> PathBuf {
        self.root.join(partition.dir_name()).join(kind.dir_name())
    }

    /// Layout rooted at one partition, e.g. `<root>/train`.
    pub fn partition(&self, partition: Partition) -> DatasetLayout {
        DatasetLayout::new(self.root.join(partition.dir_name()))
    }
}
