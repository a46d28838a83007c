//! Listing sample files on disk.

use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use crate::error::{DatasetError, Result};

/// Names of the regular files directly inside `dir`, sorted.
///
/// Hidden files (leading `.`) and names that are not valid UTF-8 are
/// skipped; the latter with a warning.
pub fn list_sample_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| DatasetError::Listing {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            warn!(path = %entry.path().display(), "Skipping file with non UTF-8 name");
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        names.push(name);
    }

    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_files_only_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("000002.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("000001.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join(".DS_Store"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let names = list_sample_names(dir.path()).unwrap();
        assert_eq!(names, vec!["000001.jpg", "000002.jpg"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("000001.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join(OsStr::from_bytes(b"00\xff002.jpg")), b"x").unwrap();

        let names = list_sample_names(dir.path()).unwrap();
        assert_eq!(names, vec!["000001.jpg"]);
    }

    #[test]
    fn test_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = list_sample_names(&dir.path().join("absent"));
        assert!(matches!(result, Err(DatasetError::Listing { .. })));
    }
}
