//! Geographic sampling area.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DatasetCommonError;
use crate::square::Coordinate;

/// Area in degrees that sample centers are drawn from.
///
/// A collapsed box (`min == max` on an axis) is valid and always yields that
/// value for the axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// A box covering exactly one point.
    pub fn point(coord: Coordinate) -> Self {
        Self::new(coord.lon, coord.lat, coord.lon, coord.lat)
    }

    /// Parse `"min_lon,min_lat,max_lon,max_lat"`.
    pub fn from_comma_string(s: &str) -> Result<Self, DatasetCommonError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(DatasetCommonError::InvalidBboxFormat(s.to_string()));
        }

        let mut values = [0.0f64; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse()
                .map_err(|_| DatasetCommonError::InvalidBboxNumber(part.to_string()))?;
        }

        let bbox = Self::new(values[0], values[1], values[2], values[3]);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Reject boxes whose minimum exceeds the maximum on either axis.
    pub fn validate(&self) -> Result<(), DatasetCommonError> {
        if self.min_lon > self.max_lon || self.min_lat > self.max_lat {
            return Err(DatasetCommonError::InvertedBbox {
                min_lon: self.min_lon,
                min_lat: self.min_lat,
                max_lon: self.max_lon,
                max_lat: self.max_lat,
            });
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn contains(&self, coord: &Coordinate) -> bool {
        coord.lon >= self.min_lon
            && coord.lon <= self.max_lon
            && coord.lat >= self.min_lat
            && coord.lat <= self.max_lat
    }

    /// Draw a coordinate uniformly from the box.
    ///
    /// Latitude is drawn before longitude.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Coordinate {
        let lat = self.min_lat + rng.gen::<f64>() * self.height();
        let lon = self.min_lon + rng.gen::<f64>() * self.width();
        Coordinate { lon, lat }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

impl FromStr for BoundingBox {
    type Err = DatasetCommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_comma_string(s)
    }
}
