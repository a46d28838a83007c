//! Tests for top-left cropping of samples.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imagery::{crop_top_left, Crop};

fn position_image(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([(y * 16 + x) as u8]))
}

#[test]
fn test_crop_takes_top_left_block() {
    let img = position_image(12, 10);
    let crop = crop_top_left(img.clone(), 6);

    let Crop::Cropped(cropped) = crop else {
        panic!("expected a crop");
    };
    assert_eq!(cropped.dimensions(), (6, 6));
    for y in 0..6 {
        for x in 0..6 {
            assert_eq!(cropped.get_pixel(x, y), img.get_pixel(x, y));
        }
    }
}

#[test]
fn test_crop_keeps_channels() {
    let img = RgbImage::from_fn(300, 250, |x, y| Rgb([x as u8, y as u8, 7]));
    let cropped = crop_top_left(img, 224).into_inner();
    assert_eq!(cropped.dimensions(), (224, 224));
    assert_eq!(cropped.get_pixel(223, 100).0, [223, 100, 7]);
}

#[test]
fn test_undersized_returned_unchanged() {
    for (w, h) in [(223, 300), (300, 223), (100, 100)] {
        let img = position_image(w, h);
        let crop = crop_top_left(img.clone(), 224);
        assert_eq!(crop, Crop::Undersized(img));
    }
}

#[test]
fn test_zero_crop_of_empty_image() {
    let crop = crop_top_left(GrayImage::new(0, 0), 0);
    assert!(!crop.is_undersized());
}
