//! Single-band raster decoding.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::ColorType;
use tracing::debug;

use crate::error::{ImageryError, Result};

/// One decoded band, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f64>,
}

impl Band {
    /// Wrap `data`, checking it holds `width * height` values.
    pub fn new(width: u32, height: u32, data: Vec<f64>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(ImageryError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Value at column `x`, row `y`; `None` outside the band.
    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Map every value through `f` into an 8-bit buffer.
    pub fn map_to_u8(&self, f: impl Fn(f64) -> u8) -> Vec<u8> {
        self.data.iter().map(|&v| f(v)).collect()
    }
}

/// Decode a single-band TIFF of any integer or float sample type.
pub fn read_band(path: &Path) -> Result<Band> {
    let tiff_err = |source| ImageryError::Tiff {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| ImageryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut decoder = Decoder::new(BufReader::new(file))
        .map_err(tiff_err)?
        .with_limits(Limits::unlimited());

    let (width, height) = decoder.dimensions().map_err(tiff_err)?;
    match decoder.colortype().map_err(tiff_err)? {
        ColorType::Gray(_) => {}
        other => {
            return Err(ImageryError::UnsupportedLayout {
                path: path.to_path_buf(),
                message: format!("expected one band, found {:?}", other),
            })
        }
    }

    let data: Vec<f64> = match decoder.read_image().map_err(tiff_err)? {
        DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::F64(v) => v,
    };

    debug!(path = %path.display(), width, height, "Decoded band");

    Band::new(width, height, data).map_err(|_| ImageryError::UnsupportedLayout {
        path: path.to_path_buf(),
        message: format!("sample count does not match {}x{}", width, height),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_shape_check() {
        assert!(Band::new(2, 2, vec![0.0; 4]).is_ok());
        assert!(matches!(
            Band::new(2, 2, vec![0.0; 3]),
            Err(ImageryError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_band_get_row_major() {
        let band = Band::new(3, 2, vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]).unwrap();
        assert_eq!(band.get(0, 1), Some(10.0));
        assert_eq!(band.get(2, 0), Some(2.0));
    }

    #[test]
    fn test_band_get_out_of_range() {
        let band = Band::new(3, 2, vec![0.0; 6]).unwrap();
        assert_eq!(band.get(3, 0), None);
        assert_eq!(band.get(0, 2), None);
        assert_eq!(band.get(u32::MAX, u32::MAX), None);
    }
}
