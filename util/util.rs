#![allow(dead_code)]

use image::RgbaImage;

/// Image sizes used across the benches, roughly thumbnail to album cover to photo.
pub const SIZES: [(u32, u32); 3] = [(64, 64), (300, 300), (1280, 720)];

/// A smooth gradient with some high frequency noise, so that medians and clusters
/// have something to do.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let noise = x.wrapping_mul(2_654_435_761) ^ y.wrapping_mul(40_503);
        image::Rgba([
            (x * 255 / width.max(1)) as u8 ^ (noise >> 28) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
            255,
        ])
    })
}

pub fn bench_images() -> Vec<(String, RgbaImage)> {
    SIZES
        .iter()
        .map(|&(width, height)| (format!("{width}x{height}"), gradient_image(width, height)))
        .collect()
}
