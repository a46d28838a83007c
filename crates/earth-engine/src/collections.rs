//! Collection queries used by the dataset.
//!
//! Both samples of a pair come from a median composite over a date window,
//! clipped to the sample square. Sentinel-2 scenes are additionally filtered
//! by cloud cover and masked per pixel before aggregation.

use chrono::NaiveDate;
use dataset_common::SquareRegion;
use serde::{Deserialize, Serialize};

use crate::expression::{Filter, Geometry, Image, ImageCollection};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sentinel-2 composite window.
pub const SENTINEL2_START: NaiveDate = ymd(2018, 1, 1);
pub const SENTINEL2_END: NaiveDate = ymd(2018, 6, 30);

/// Cropland Data Layer composite window.
pub const CDL_START: NaiveDate = ymd(2017, 1, 1);
pub const CDL_END: NaiveDate = ymd(2017, 12, 31);

/// Date constant; an invalid date fails compilation.
const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar date"),
    }
}

/// Per-pixel Sentinel-2 cloud mask built from the QA60 bitmask band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudMask {
    pub qa_band: String,
    pub cloud_bit: u8,
    pub cirrus_bit: u8,
    /// Reflectance values are divided by this after masking.
    pub scale: f64,
}

impl Default for CloudMask {
    fn default() -> Self {
        Self {
            qa_band: "QA60".to_string(),
            cloud_bit: 10,
            cirrus_bit: 11,
            scale: 10000.0,
        }
    }
}

impl CloudMask {
    /// True when neither the opaque cloud nor the cirrus bit is set.
    pub fn is_clear(&self, qa: u16) -> bool {
        let cloud = 1u16 << self.cloud_bit;
        let cirrus = 1u16 << self.cirrus_bit;
        qa & cloud == 0 && qa & cirrus == 0
    }

    /// Mask cloudy pixels of `image` and rescale reflectance to 0-1.
    pub fn apply(&self, image: Image) -> Image {
        let qa = image.select(&[self.qa_band.as_str()]);
        let cloud_clear = qa.bitwise_and(1 << self.cloud_bit).equals(0);
        let cirrus_clear = qa.bitwise_and(1 << self.cirrus_bit).equals(0);
        image
            .update_mask(&cloud_clear.and(&cirrus_clear))
            .divide(self.scale)
    }
}

/// Scene-level cloud filtering applied before compositing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudFilter {
    /// Scene metadata property holding the cloudy pixel percentage.
    pub property: String,
    /// Scenes at or above this percentage are dropped.
    pub max_percentage: f64,
    #[serde(default)]
    pub mask: CloudMask,
}

/// A median composite request over one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionQuery {
    pub collection_id: String,
    pub start: NaiveDate,
    /// Exclusive end of the date window.
    pub end: NaiveDate,
    /// Bands to export, in output order.
    pub bands: Vec<String>,
    #[serde(default)]
    pub cloud: Option<CloudFilter>,
}

impl CollectionQuery {
    /// Sentinel-2 true color (B4, B3, B2) for the first half of 2018.
    pub fn sentinel2_true_color() -> Self {
        Self {
            collection_id: "COPERNICUS/S2".to_string(),
            start: SENTINEL2_START,
            end: SENTINEL2_END,
            bands: vec!["B4".to_string(), "B3".to_string(), "B2".to_string()],
            cloud: Some(CloudFilter {
                property: "CLOUDY_PIXEL_PERCENTAGE".to_string(),
                max_percentage: 20.0,
                mask: CloudMask::default(),
            }),
        }
    }

    /// Cropland Data Layer `cultivated` band for 2017.
    pub fn cdl_cultivated() -> Self {
        Self {
            collection_id: "USDA/NASS/CDL".to_string(),
            start: CDL_START,
            end: CDL_END,
            bands: vec!["cultivated".to_string()],
            cloud: None,
        }
    }

    /// Build the composite image for `region`.
    pub fn composite(&self, region: &SquareRegion) -> Image {
        let geometry = Geometry::rectangle(region.as_array());
        let start = self.start.format(DATE_FORMAT).to_string();
        let end = self.end.format(DATE_FORMAT).to_string();

        let mut collection = ImageCollection::load(&self.collection_id)
            .filter_date(&start, &end)
            .filter_bounds(&geometry);

        if let Some(cloud) = &self.cloud {
            collection = collection
                .filter(Filter::lt(&cloud.property, cloud.max_percentage))
                .map(|image| cloud.mask.apply(image));
        }

        collection.median().clip(&geometry).select(self.bands.as_slice())
    }
}
