//! Synthetic band generators.
//!
//! All grids are `Vec<f32>` in row-major order (row 0 first).

/// Band with a constant value everywhere.
pub fn constant_band(width: u32, height: u32, value: f32) -> Vec<f32> {
    vec![value; (width * height) as usize]
}

/// Reflectance ramp from 0.0 at column 0 to `max` at the last column.
///
/// # Example
///
/// ```
/// use test_utils::reflectance_gradient;
///
/// let band = reflectance_gradient(5, 2, 0.4);
/// assert_eq!(band[0], 0.0);
/// assert_eq!(band[4], 0.4);
/// assert_eq!(band[5], 0.0);
/// ```
pub fn reflectance_gradient(width: u32, height: u32, max: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity((width * height) as usize);
    let denom = width.saturating_sub(1).max(1) as f32;
    for _row in 0..height {
        for col in 0..width {
            data.push(max * col as f32 / denom);
        }
    }
    data
}

/// Cultivation classes: left half 1 (not cultivated), right half 2.
pub fn cultivation_halves(width: u32, height: u32) -> Vec<f32> {
    let mut data = Vec::with_capacity((width * height) as usize);
    for _row in 0..height {
        for col in 0..width {
            data.push(if col < width / 2 { 1.0 } else { 2.0 });
        }
    }
    data
}

/// Grid where each value encodes its position: `row * 1000 + col`.
///
/// Makes crop offsets easy to verify.
pub fn position_band(width: u32, height: u32) -> Vec<f32> {
    let mut data = Vec::with_capacity((width * height) as usize);
    for row in 0..height {
        for col in 0..width {
            data.push((row * 1000 + col) as f32);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cultivation_halves() {
        let band = cultivation_halves(4, 2);
        assert_eq!(band, vec![1.0, 1.0, 2.0, 2.0, 1.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn test_position_band() {
        let band = position_band(3, 2);
        assert_eq!(band, vec![0.0, 1.0, 2.0, 1000.0, 1001.0, 1002.0]);
    }
}
