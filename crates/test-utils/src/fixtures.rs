//! Common test fixtures for dataset tests.

/// Sampling areas as `(min_lon, min_lat, max_lon, max_lat)`.
pub mod bbox {
    /// Central US cropland area sampled by default
    pub const CORN_BELT: (f64, f64, f64, f64) = (-121.0, 36.0, -89.0, 45.0);

    /// Collapsed box around a single Kansas location
    pub const POINT: (f64, f64, f64, f64) = (-98.5, 38.5, -98.5, 38.5);
}

/// Reflectance values (after the 1/10000 scaling) and their 8-bit intensity.
pub mod reflectance {
    /// Values at or above the clamp ceiling saturate to 255
    pub const CEILING: f32 = 0.3;
    pub const HALF_CEILING: f32 = 0.15;
    pub const BRIGHT_CLOUD: f32 = 0.85;
}

/// Cropland Data Layer `cultivated` classes.
pub mod cultivation {
    pub const NOT_CULTIVATED: f32 = 1.0;
    pub const CULTIVATED: f32 = 2.0;
}

/// Edge of the square crop used by the dataset.
pub const CROP_SIZE: u32 = 224;
