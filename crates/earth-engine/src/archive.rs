//! Extracted per-band download archives.
//!
//! A `ZIPPED_GEO_TIFF_PER_BAND` download holds one `<prefix>.<band>.tif`
//! (plus a `.tfw` world file) per band. Files are extracted into a fresh
//! temporary directory owned by [`BandArchive`]; dropping the archive removes
//! the directory, so concurrent or failed fetches never share or leak files.

use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{EarthEngineError, Result};

pub struct BandArchive {
    dir: TempDir,
    prefix: String,
    files: Vec<PathBuf>,
}

impl BandArchive {
    /// Extract `zip_data` into a new temporary directory.
    ///
    /// `temp_root` selects the parent directory; `None` uses the system
    /// temporary directory.
    pub fn extract(zip_data: &[u8], prefix: &str, temp_root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("ee-download-");
        let dir = match temp_root {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };

        let mut archive = ZipArchive::new(Cursor::new(zip_data))?;
        let mut files = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            // Entries escaping the directory are skipped.
            let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
                continue;
            };
            let Some(file_name) = relative.file_name() else {
                continue;
            };

            let path = dir.path().join(file_name);
            let mut out = fs::File::create(&path)?;
            io::copy(&mut entry, &mut out)?;
            files.push(path);
        }

        debug!(
            dir = %dir.path().display(),
            files = files.len(),
            "Extracted download archive"
        );

        Ok(Self {
            dir,
            prefix: prefix.to_string(),
            files,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Path of the GeoTIFF for `band`.
    pub fn band_path(&self, band: &str) -> Result<PathBuf> {
        let expected = format!("{}.{}.tif", self.prefix, band);
        self.files
            .iter()
            .find(|path| path.file_name().is_some_and(|name| name == expected.as_str()))
            .cloned()
            .ok_or_else(|| EarthEngineError::MissingBand(band.to_string()))
    }
}

impl std::fmt::Debug for BandArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BandArchive")
            .field("dir", &self.dir.path())
            .field("files", &self.files)
            .finish()
    }
}
