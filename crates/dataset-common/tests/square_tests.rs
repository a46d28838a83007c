//! Tests for square footprint computation.

use dataset_common::{square, Coordinate, EARTH_CIRCUMFERENCE_KM};

const EPS: f64 = 1e-9;

fn expected_lat_span(size_km: f64) -> f64 {
    size_km * 360.0 / EARTH_CIRCUMFERENCE_KM
}

// ============================================================================
// Span tests
// ============================================================================

#[test]
fn test_lat_span_matches_size() {
    for &size in &[0.5, 1.0, 3.75, 10.0, 100.0] {
        let region = square(Coordinate::new(-100.0, 40.0), size);
        assert!((region.lat_span() - expected_lat_span(size)).abs() < EPS);
    }
}

#[test]
fn test_lon_span_scaled_by_latitude() {
    for &lat in &[-60.0, -30.0, 0.0, 36.0, 45.0, 70.0] {
        let region = square(Coordinate::new(10.0, lat), 3.75);
        let expected = expected_lat_span(3.75) / f64::to_radians(lat).cos();
        assert!(
            (region.lon_span() - expected).abs() < EPS,
            "lat {}: got {}, expected {}",
            lat,
            region.lon_span(),
            expected
        );
    }
}

#[test]
fn test_lon_span_wider_away_from_equator() {
    let equator = square(Coordinate::new(0.0, 0.0), 3.75);
    let north = square(Coordinate::new(0.0, 45.0), 3.75);
    assert!(north.lon_span() > equator.lon_span());
    assert!((north.lat_span() - equator.lat_span()).abs() < EPS);
}

// ============================================================================
// Symmetry tests
// ============================================================================

#[test]
fn test_corners_symmetric_around_center() {
    let center = Coordinate::new(-104.25, 41.5);
    let region = square(center, 3.75);

    assert!(((region.lon1 - center.lon) - (center.lon - region.lon2)).abs() < EPS);
    assert!(((region.lat1 - center.lat) - (center.lat - region.lat2)).abs() < EPS);

    let mid = region.center();
    assert!((mid.lon - center.lon).abs() < EPS);
    assert!((mid.lat - center.lat).abs() < EPS);
}

// ============================================================================
// Degenerate input
// ============================================================================

#[test]
fn test_zero_size_collapses_to_center() {
    let center = Coordinate::new(-95.0, 38.0);
    let region = square(center, 0.0);
    assert_eq!(region.lon1, center.lon);
    assert_eq!(region.lon2, center.lon);
    assert_eq!(region.lat1, center.lat);
    assert_eq!(region.lat2, center.lat);
}

#[test]
fn test_negative_size_inverts_corners() {
    let region = square(Coordinate::new(-95.0, 38.0), -1.0);
    assert!(region.lat1 < region.lat2);
    assert!(region.lon1 < region.lon2);
}
