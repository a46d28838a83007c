//! Stacking decoded bands into output images.

use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

use crate::band::Band;
use crate::error::{ImageryError, Result};
use crate::scale::{cultivation_intensity, optical_intensity};

fn check_shape(expected: &Band, band: &Band) -> Result<()> {
    if expected.dimensions() != band.dimensions() {
        return Err(ImageryError::ShapeMismatch {
            expected_width: expected.width,
            expected_height: expected.height,
            width: band.width,
            height: band.height,
        });
    }
    Ok(())
}

/// True-color image from red, green and blue reflectance bands.
///
/// Each channel is scaled with [`optical_intensity`]; all bands must share
/// the red band's dimensions.
pub fn true_color_image(red: &Band, green: &Band, blue: &Band) -> Result<RgbImage> {
    check_shape(red, green)?;
    check_shape(red, blue)?;

    let mut raw = Vec::with_capacity(red.data.len() * 3);
    for ((&r, &g), &b) in red.data.iter().zip(&green.data).zip(&blue.data) {
        raw.push(optical_intensity(r));
        raw.push(optical_intensity(g));
        raw.push(optical_intensity(b));
    }

    let len = raw.len();
    ImageBuffer::<Rgb<u8>, _>::from_raw(red.width, red.height, raw).ok_or(
        ImageryError::LengthMismatch {
            expected: red.data.len() * 3,
            actual: len,
        },
    )
}

/// Grayscale cultivation mask from the `cultivated` band.
pub fn cultivation_image(band: &Band) -> Result<GrayImage> {
    let raw = band.map_to_u8(cultivation_intensity);
    let len = raw.len();
    ImageBuffer::<Luma<u8>, _>::from_raw(band.width, band.height, raw).ok_or(
        ImageryError::LengthMismatch {
            expected: band.data.len(),
            actual: len,
        },
    )
}
