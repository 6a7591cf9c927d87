//! Image processing helpers on `image` buffers

use crate::bbox::BBox;
use crate::Result;
use anyhow::Context;
use image::{imageops, GrayImage, RgbImage};
use imageproc::contrast::otsu_level;
use imageproc::stats::histogram;
use std::path::Path;

/// Two-class luminance split found by Otsu's method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OtsuSplit {
    pub threshold: u8,
    pub dark_mean: f64,
    pub light_mean: f64,
}

impl OtsuSplit {
    pub fn contrast(&self) -> f64 {
        self.light_mean - self.dark_mean
    }
}

/// Image utility functions
pub struct ImageUtils;

impl ImageUtils {
    /// Load image as RGB
    pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
        let img = image::open(&path)
            .with_context(|| format!("Failed to open image: {:?}", path.as_ref()))?;
        Ok(img.to_rgb8())
    }

    /// Crop a region, clamped to the frame. `None` when nothing overlaps.
    pub fn crop(frame: &RgbImage, region: &BBox) -> Option<RgbImage> {
        let width = i32::try_from(frame.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(frame.height()).unwrap_or(i32::MAX);
        let x1 = region.x.clamp(0, width);
        let y1 = region.y.clamp(0, height);
        let x2 = region.right().clamp(0, width);
        let y2 = region.bottom().clamp(0, height);

        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        let view = imageops::crop_imm(frame, x1 as u32, y1 as u32, (x2 - x1) as u32, (y2 - y1) as u32);
        Some(view.to_image())
    }

    /// Mean colour per channel
    pub fn mean_rgb(img: &RgbImage) -> [f64; 3] {
        let count = (img.width() as usize) * (img.height() as usize);
        if count == 0 {
            return [0.0; 3];
        }

        let mut sums = [0u64; 3];
        for pixel in img.pixels() {
            for (sum, channel) in sums.iter_mut().zip(pixel.0) {
                *sum += channel as u64;
            }
        }
        sums.map(|sum| sum as f64 / count as f64)
    }

    /// Euclidean distance between two RGB colours
    pub fn color_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    pub fn to_luma(img: &RgbImage) -> GrayImage {
        imageops::grayscale(img)
    }

    /// Otsu threshold over the luminance histogram. `None` for a single-tone image.
    pub fn otsu_split(gray: &GrayImage) -> Option<OtsuSplit> {
        if gray.width() == 0 || gray.height() == 0 {
            return None;
        }

        let threshold = otsu_level(gray);
        let counts = &histogram(gray).channels[0];
        let (dark, light) = counts.split_at(threshold as usize + 1);

        Some(OtsuSplit {
            threshold,
            dark_mean: class_mean(dark, 0)?,
            light_mean: class_mean(light, threshold as usize + 1)?,
        })
    }
}

/// Mean level of a histogram slice starting at `offset`. `None` when empty.
fn class_mean(counts: &[u32], offset: usize) -> Option<f64> {
    let (pixels, weighted) = counts
        .iter()
        .enumerate()
        .fold((0u64, 0.0), |(pixels, weighted), (i, &count)| {
            (pixels + count as u64, weighted + (offset + i) as f64 * count as f64)
        });
    (pixels > 0).then(|| weighted / pixels as f64)
}
