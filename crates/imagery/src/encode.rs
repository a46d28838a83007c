//! JPEG output of samples.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, ImageBuffer, Pixel};

use crate::error::Result;

/// Encoder quality, 1-100.
pub const JPEG_QUALITY: u8 = 95;

/// Pixel types that can be written as JPEG samples.
pub trait JpegPixel: Pixel<Subpixel = u8> {
    const COLOR_TYPE: ColorType;
}

impl JpegPixel for image::Rgb<u8> {
    const COLOR_TYPE: ColorType = ColorType::Rgb8;
}

impl JpegPixel for image::Luma<u8> {
    const COLOR_TYPE: ColorType = ColorType::L8;
}

/// Encode `image` as JPEG bytes.
pub fn encode_jpeg<P: JpegPixel>(image: &ImageBuffer<P, Vec<u8>>) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY).encode(
        image.as_raw(),
        image.width(),
        image.height(),
        P::COLOR_TYPE,
    )?;
    Ok(cursor.into_inner())
}

/// Encode and write `image` to `path`.
pub fn write_jpeg<P: JpegPixel>(path: &Path, image: &ImageBuffer<P, Vec<u8>>) -> Result<()> {
    std::fs::write(path, encode_jpeg(image)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_encode_gray_is_jpeg() {
        let img = GrayImage::from_pixel(8, 8, Luma([200]));
        let bytes = encode_jpeg(&img).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_rgb_decodes_to_same_size() {
        let img = RgbImage::from_pixel(16, 9, Rgb([10, 200, 30]));
        let bytes = encode_jpeg(&img).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 9));
    }
}
