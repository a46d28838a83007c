//! Tests for cultivation pixel balance.

use dataset::{pixel_balance, DatasetError};
use test_utils::{sample_names, write_gray_image};

// ============================================================================
// Uniform folders
// ============================================================================

#[test]
fn test_all_black() {
    let dir = tempfile::tempdir().unwrap();
    for name in sample_names(0, 3) {
        write_gray_image(&dir.path().join(name), 16, 16, 0);
    }

    let balance = pixel_balance(dir.path()).unwrap();
    assert_eq!(balance.images, 3);
    assert_eq!(balance.white_fraction(), 0.0);
    assert_eq!(balance.black_fraction(), 1.0);
}

#[test]
fn test_all_white() {
    let dir = tempfile::tempdir().unwrap();
    for name in sample_names(0, 3) {
        write_gray_image(&dir.path().join(name), 16, 16, 255);
    }

    let balance = pixel_balance(dir.path()).unwrap();
    assert_eq!(balance.white_fraction(), 1.0);
    assert_eq!(balance.black_fraction(), 0.0);
}

// ============================================================================
// Mixed folders
// ============================================================================

#[test]
fn test_half_and_half() {
    let dir = tempfile::tempdir().unwrap();
    let names = sample_names(0, 4);
    for (i, name) in names.iter().enumerate() {
        let value = if i % 2 == 0 { 0 } else { 255 };
        write_gray_image(&dir.path().join(name), 16, 16, value);
    }

    let balance = pixel_balance(dir.path()).unwrap();
    assert_eq!(balance.white_fraction(), 0.5);
    assert_eq!(balance.white_fraction() + balance.black_fraction(), 1.0);
}

#[test]
fn test_sizes_weighted_by_pixel_count() {
    let dir = tempfile::tempdir().unwrap();
    write_gray_image(&dir.path().join("000000.jpg"), 8, 8, 255);
    write_gray_image(&dir.path().join("000001.jpg"), 24, 8, 0);

    let balance = pixel_balance(dir.path()).unwrap();
    assert_eq!(balance.total, 256);
    assert_eq!(balance.white, 64);
    assert_eq!(balance.white_fraction(), 0.25);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_empty_folder() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        pixel_balance(dir.path()),
        Err(DatasetError::EmptyCorpus(_))
    ));
}

#[test]
fn test_unreadable_image() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("000000.jpg"), b"not a jpeg").unwrap();
    assert!(matches!(
        pixel_balance(dir.path()),
        Err(DatasetError::ImageRead { .. })
    ));
}
