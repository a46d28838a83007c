//! Square crops of fetched samples.
//!
//! Exports are sized by ground resolution, so their pixel dimensions vary a
//! little with latitude and projection. Samples are cut to a fixed square
//! from the top-left corner; a fetched image smaller than the square is kept
//! as is and reported as undersized.

use image::{imageops, ImageBuffer, Pixel};

/// Outcome of [`crop_top_left`].
#[derive(Debug, Clone, PartialEq)]
pub enum Crop<T> {
    /// Image cut to exactly `size x size`
    Cropped(T),
    /// Image smaller than `size` on at least one side, returned unchanged
    Undersized(T),
}

impl<T> Crop<T> {
    pub fn into_inner(self) -> T {
        match self {
            Crop::Cropped(image) | Crop::Undersized(image) => image,
        }
    }

    pub fn is_undersized(&self) -> bool {
        matches!(self, Crop::Undersized(_))
    }
}

/// Cut the top-left `size x size` block of `image`.
pub fn crop_top_left<P>(
    image: ImageBuffer<P, Vec<P::Subpixel>>,
    size: u32,
) -> Crop<ImageBuffer<P, Vec<P::Subpixel>>>
where
    P: Pixel + 'static,
{
    let (width, height) = image.dimensions();
    if width < size || height < size {
        return Crop::Undersized(image);
    }
    if width == size && height == size {
        return Crop::Cropped(image);
    }
    Crop::Cropped(imageops::crop_imm(&image, 0, 0, size, size).to_image())
}
