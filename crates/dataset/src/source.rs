//! Fetching the two images of a sample pair.

use async_trait::async_trait;
use dataset_common::{SampleKind, SquareRegion};
use earth_engine::{BandArchive, CollectionQuery, ExportRequest, ImageArchive};
use image::{GrayImage, ImageBuffer, Pixel, RgbImage};
use imagery::{crop_top_left, cultivation_image, read_band, true_color_image, Band, Crop};
use tracing::{instrument, warn};

use crate::error::{DatasetError, Result};

/// A fetched image and whether it came back smaller than the crop size.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<T> {
    pub image: T,
    pub undersized: bool,
}

/// Provider of the optical and cultivation images for a region.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// True-color image of `region` at `scale` meters per pixel.
    async fn fetch_optical(
        &self,
        region: &SquareRegion,
        scale: f64,
        crop: Option<u32>,
    ) -> Result<Sample<RgbImage>>;

    /// Cultivation mask of `region` at `scale` meters per pixel.
    async fn fetch_cultivation(
        &self,
        region: &SquareRegion,
        scale: f64,
        crop: Option<u32>,
    ) -> Result<Sample<GrayImage>>;
}

/// Apply the crop policy, warning when the image is too small.
pub fn apply_crop<P>(
    image: ImageBuffer<P, Vec<P::Subpixel>>,
    crop: Option<u32>,
    kind: SampleKind,
) -> Sample<ImageBuffer<P, Vec<P::Subpixel>>>
where
    P: Pixel + 'static,
{
    let Some(size) = crop else {
        return Sample {
            image,
            undersized: false,
        };
    };

    match crop_top_left(image, size) {
        Crop::Cropped(image) => Sample {
            image,
            undersized: false,
        },
        Crop::Undersized(image) => {
            warn!(
                kind = %kind,
                width = image.width(),
                height = image.height(),
                crop = size,
                "Retrieved image that was smaller than cropping dimensions"
            );
            Sample {
                image,
                undersized: true,
            }
        }
    }
}

/// [`ImageSource`] backed by Earth Engine median composites.
///
/// Each fetch downloads into its own temporary directory, which is removed
/// when the fetch returns, whether it succeeded or not.
pub struct EarthEngineSource<A> {
    archive: A,
    optical: CollectionQuery,
    cultivation: CollectionQuery,
}

impl<A: ImageArchive> EarthEngineSource<A> {
    /// Sentinel-2 true color paired with the CDL `cultivated` band.
    pub fn new(archive: A) -> Self {
        Self::with_queries(
            archive,
            CollectionQuery::sentinel2_true_color(),
            CollectionQuery::cdl_cultivated(),
        )
    }

    pub fn with_queries(archive: A, optical: CollectionQuery, cultivation: CollectionQuery) -> Self {
        Self {
            archive,
            optical,
            cultivation,
        }
    }

    pub fn archive(&self) -> &A {
        &self.archive
    }

    async fn download(
        &self,
        query: &CollectionQuery,
        region: &SquareRegion,
        scale: f64,
    ) -> Result<Vec<Band>> {
        let image = query.composite(region);
        let request = ExportRequest::new(query.bands.clone(), scale);
        let archive: BandArchive = self.archive.download_bands(&image, &request).await?;

        let mut bands = Vec::with_capacity(query.bands.len());
        for name in &query.bands {
            bands.push(read_band(&archive.band_path(name)?)?);
        }
        Ok(bands)
    }
}

#[async_trait]
impl<A: ImageArchive> ImageSource for EarthEngineSource<A> {
    #[instrument(skip(self))]
    async fn fetch_optical(
        &self,
        region: &SquareRegion,
        scale: f64,
        crop: Option<u32>,
    ) -> Result<Sample<RgbImage>> {
        let bands = self.download(&self.optical, region, scale).await?;
        let [red, green, blue] = bands.as_slice() else {
            return Err(DatasetError::BandCount {
                expected: 3,
                count: bands.len(),
            });
        };

        let image = true_color_image(red, green, blue)?;
        Ok(apply_crop(image, crop, SampleKind::Optical))
    }

    #[instrument(skip(self))]
    async fn fetch_cultivation(
        &self,
        region: &SquareRegion,
        scale: f64,
        crop: Option<u32>,
    ) -> Result<Sample<GrayImage>> {
        let bands = self.download(&self.cultivation, region, scale).await?;
        let [band] = bands.as_slice() else {
            return Err(DatasetError::BandCount {
                expected: 1,
                count: bands.len(),
            });
        };

        let image = cultivation_image(band)?;
        Ok(apply_crop(image, crop, SampleKind::Cultivation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_apply_crop_none_keeps_image() {
        let sample = apply_crop(GrayImage::new(10, 5), None, SampleKind::Cultivation);
        assert!(!sample.undersized);
        assert_eq!(sample.image.dimensions(), (10, 5));
    }

    #[test]
    fn test_apply_crop_undersized() {
        let img = GrayImage::from_pixel(10, 5, Luma([3]));
        let sample = apply_crop(img.clone(), Some(8), SampleKind::Cultivation);
        assert!(sample.undersized);
        assert_eq!(sample.image, img);
    }

    #[test]
    fn test_apply_crop_cuts() {
        let sample = apply_crop(GrayImage::new(10, 12), Some(8), SampleKind::Optical);
        assert!(!sample.undersized);
        assert_eq!(sample.image.dimensions(), (8, 8));
    }
}
