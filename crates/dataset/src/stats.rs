//! Class balance of cultivation images.
//!
//! Every pixel is normalized to 0-1 and thresholded at 0.5; the balance is
//! the share of white (cultivated) pixels over all pixels read. Pixel counts
//! are measured per image, so images of different sizes weigh correctly.

use std::path::Path;

use image::GrayImage;
use tracing::{debug, info};

use crate::corpus::list_sample_names;
use crate::error::{DatasetError, Result};

/// Normalized intensity above which a pixel counts as white.
pub const WHITE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelBalance {
    pub white: u64,
    pub total: u64,
    pub images: usize,
}

impl PixelBalance {
    pub fn black(&self) -> u64 {
        self.total - self.white
    }

    pub fn white_fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.white as f64 / self.total as f64
    }

    /// Complement of [`white_fraction`](Self::white_fraction).
    pub fn black_fraction(&self) -> f64 {
        1.0 - self.white_fraction()
    }

    /// Accumulate one image.
    pub fn add_image(&mut self, image: &GrayImage) {
        self.white += count_white(image);
        self.total += image.width() as u64 * image.height() as u64;
        self.images += 1;
    }
}

/// Number of pixels above [`WHITE_THRESHOLD`].
pub fn count_white(image: &GrayImage) -> u64 {
    image
        .as_raw()
        .iter()
        .filter(|&&v| v as f64 / 255.0 > WHITE_THRESHOLD)
        .count() as u64
}

/// Measure the balance of every image in `folder`.
pub fn pixel_balance(folder: &Path) -> Result<PixelBalance> {
    let names = list_sample_names(folder)?;
    if names.is_empty() {
        return Err(DatasetError::EmptyCorpus(folder.to_path_buf()));
    }

    let mut balance = PixelBalance::default();
    for name in &names {
        let path = folder.join(name);
        let image = image::open(&path)
            .map_err(|source| DatasetError::ImageRead {
                path: path.clone(),
                source,
            })?
            .to_luma8();
        debug!(path = %path.display(), "Counting pixels");
        balance.add_image(&image);
    }

    info!(
        images = balance.images,
        white = balance.white,
        total = balance.total,
        "Measured pixel balance"
    );

    Ok(balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_threshold_boundary() {
        // 127/255 < 0.5 < 128/255
        let img = GrayImage::from_fn(4, 1, |x, _| Luma([[0, 127, 128, 255][x as usize]]));
        assert_eq!(count_white(&img), 2);
    }

    #[test]
    fn test_fractions_sum_to_one() {
        let balance = PixelBalance {
            white: 1,
            total: 4,
            images: 1,
        };
        assert_eq!(balance.white_fraction(), 0.25);
        assert_eq!(balance.black_fraction(), 0.75);
        assert_eq!(balance.white_fraction() + balance.black_fraction(), 1.0);
    }

    #[test]
    fn test_mixed_sizes_measured() {
        let mut balance = PixelBalance::default();
        balance.add_image(&GrayImage::from_pixel(10, 10, Luma([255])));
        balance.add_image(&GrayImage::from_pixel(30, 10, Luma([0])));
        assert_eq!(balance.total, 400);
        assert_eq!(balance.white, 100);
        assert_eq!(balance.white_fraction(), 0.25);
    }
}
