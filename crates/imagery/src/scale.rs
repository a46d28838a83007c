//! Value to 8-bit intensity mappings.

/// Reflectance mapped to full white; brighter values saturate.
pub const REFLECTANCE_CEILING: f64 = 0.3;

/// Map a 0-1 surface reflectance to an 8-bit intensity.
///
/// `round(min(v, 0.3) * 255 / 0.3)`. Negative values clamp to 0 and masked
/// (NaN) pixels become black.
pub fn optical_intensity(reflectance: f64) -> u8 {
    if reflectance.is_nan() {
        return 0;
    }
    let clamped = reflectance.clamp(0.0, REFLECTANCE_CEILING);
    (clamped * (255.0 / REFLECTANCE_CEILING)).round() as u8
}

/// Map a `cultivated` class to an 8-bit intensity.
///
/// `round((v - 1) * 255)`: class 1 (not cultivated) is black, class 2
/// (cultivated) white. Values outside `[1, 2]` saturate.
pub fn cultivation_intensity(class: f64) -> u8 {
    if class.is_nan() {
        return 0;
    }
    ((class - 1.0) * 255.0).round().clamp(0.0, 255.0) as u8
}
