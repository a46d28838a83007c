//! Raster and archive writers for tests.
//!
//! Earth Engine per-band downloads are zips of `<prefix>.<band>.tif` plus a
//! `<prefix>.<band>.tfw` world file. [`band_zip`] produces the same shape
//! from synthetic data.

use std::io::{Cursor, Write};
use std::path::Path;

use image::{GrayImage, Luma, Rgb, RgbImage};
use tiff::encoder::{colortype, TiffEncoder};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Encode a single-band 32-bit float TIFF.
pub fn geotiff_f32(width: u32, height: u32, data: &[f32]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut buf).expect("create tiff encoder");
        encoder
            .write_image::<colortype::Gray32Float>(width, height, data)
            .expect("write tiff image");
    }
    buf.into_inner()
}

/// Encode a single-band 8-bit TIFF.
pub fn geotiff_u8(width: u32, height: u32, data: &[u8]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut buf).expect("create tiff encoder");
        encoder
            .write_image::<colortype::Gray8>(width, height, data)
            .expect("write tiff image");
    }
    buf.into_inner()
}

/// Write a float TIFF to `path`.
pub fn write_geotiff_f32(path: &Path, width: u32, height: u32, data: &[f32]) {
    std::fs::write(path, geotiff_f32(width, height, data)).expect("write tiff file");
}

/// A band to pack into a download archive.
pub struct BandFixture<'a> {
    pub name: &'a str,
    pub width: u32,
    pub height: u32,
    pub data: &'a [f32],
}

/// Build a per-band zip as returned by a `ZIPPED_GEO_TIFF_PER_BAND` export.
pub fn band_zip(prefix: &str, bands: &[BandFixture<'_>]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for band in bands {
        writer
            .start_file(format!("{}.{}.tif", prefix, band.name), options)
            .expect("start tif entry");
        writer
            .write_all(&geotiff_f32(band.width, band.height, band.data))
            .expect("write tif entry");

        // 20 m pixels, arbitrary origin
        writer
            .start_file(format!("{}.{}.tfw", prefix, band.name), options)
            .expect("start tfw entry");
        writer
            .write_all(b"20.0\n0.0\n0.0\n-20.0\n-10961000.0\n4650000.0\n")
            .expect("write tfw entry");
    }

    writer.finish().expect("finish zip").into_inner()
}

/// Write a uniform gray image (format from the extension).
pub fn write_gray_image(path: &Path, width: u32, height: u32, value: u8) {
    GrayImage::from_pixel(width, height, Luma([value]))
        .save(path)
        .expect("write gray image");
}

/// Write a uniform color image (format from the extension).
pub fn write_rgb_image(path: &Path, width: u32, height: u32, value: [u8; 3]) {
    RgbImage::from_pixel(width, height, Rgb(value))
        .save(path)
        .expect("write rgb image");
}

/// Populate `<root>/copernicus` and `<root>/usda_nass` with one pair per name.
///
/// Cultivation images alternate between black and white so partitions can
/// be told apart.
pub fn create_sample_pairs(root: &Path, names: &[String], size: u32) {
    let optical = root.join("copernicus");
    let cultivation = root.join("usda_nass");
    std::fs::create_dir_all(&optical).expect("create optical dir");
    std::fs::create_dir_all(&cultivation).expect("create cultivation dir");

    for (i, name) in names.iter().enumerate() {
        write_rgb_image(&optical.join(name), size, size, [40, 120, 60]);
        let value = if i % 2 == 0 { 0 } else { 255 };
        write_gray_image(&cultivation.join(name), size, size, value);
    }
}

/// `count` sequential sample file names starting at `start`.
pub fn sample_names(start: u64, count: u64) -> Vec<String> {
    (start..start + count).map(|i| format!("{:06}.jpg", i)).collect()
}
