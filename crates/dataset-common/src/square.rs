//! Square ground footprints around a center coordinate.

use serde::{Deserialize, Serialize};

/// Equatorial circumference used for the degree-per-kilometer conversion.
pub const EARTH_CIRCUMFERENCE_KM: f64 = 40075.0;

/// A longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Rectangle described by two opposite corners.
///
/// Corner 1 is the north-east corner (center plus half the span), corner 2
/// the south-west one. This is the `[lon1, lat1, lon2, lat2]` ordering the
/// remote rectangle constructor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SquareRegion {
    pub lon1: f64,
    pub lat1: f64,
    pub lon2: f64,
    pub lat2: f64,
}

impl SquareRegion {
    pub fn as_array(&self) -> [f64; 4] {
        [self.lon1, self.lat1, self.lon2, self.lat2]
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            lon: (self.lon1 + self.lon2) / 2.0,
            lat: (self.lat1 + self.lat2) / 2.0,
        }
    }

    /// Longitude extent in degrees.
    pub fn lon_span(&self) -> f64 {
        self.lon1 - self.lon2
    }

    /// Latitude extent in degrees.
    pub fn lat_span(&self) -> f64 {
        self.lat1 - self.lat2
    }
}

/// Compute the square of side `size_km` centered on `center`.
///
/// Latitude degrees are a fixed fraction of the circumference; longitude
/// degrees are stretched by `1 / cos(lat)` so the east-west extent is the
/// same distance at the center latitude. Input ranges are not validated.
pub fn square(center: Coordinate, size_km: f64) -> SquareRegion {
    let lat_change = size_km * (360.0 / EARTH_CIRCUMFERENCE_KM);
    let lon_change = size_km * (360.0 / (EARTH_CIRCUMFERENCE_KM * center.lat.to_radians().cos()));

    SquareRegion {
        lon1: center.lon + lon_change / 2.0,
        lat1: center.lat + lat_change / 2.0,
        lon2: center.lon - lon_change / 2.0,
        lat2: center.lat - lat_change / 2.0,
    }
}
