//! Card-shaped blob heuristic
//!
//! Splits the zone's luminance with Otsu's method, takes the class that
//! differs from the zone border as foreground, labels 4-connected regions
//! with `imageproc`, and fires when the largest one covers enough of the
//! zone and fills most of its own bounding box.

use crate::detection::config::ContourParams;
use crate::detection::ZoneObservation;
use crate::traits::OccupancyDetector;
use crate::utils::ImageUtils;
use image::{GrayImage, ImageBuffer, Luma, RgbImage};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct ContourDetector {
    params: ContourParams,
}

/// Largest foreground component of a zone crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    pub area_fraction: f64,
    pub rectangularity: f64,
}

impl ContourDetector {
    pub fn new(params: ContourParams) -> Self {
        Self { params }
    }

    pub fn largest_blob(&self, crop: &RgbImage) -> Option<Blob> {
        let gray = ImageUtils::to_luma(crop);
        let split = ImageUtils::otsu_split(&gray)?;
        if split.contrast() < self.params.min_contrast {
            return None;
        }

        let border = border_mean(&gray);
        let light_foreground =
            (split.light_mean - border).abs() > (split.dark_mean - border).abs();

        let polarity = if light_foreground {
            ThresholdType::Binary
        } else {
            ThresholdType::BinaryInverted
        };
        let mask = threshold(&gray, split.threshold, polarity);
        let labels = connected_components(&mask, Connectivity::Four, Luma([0u8]));

        let component = largest_component(&labels)?;
        let zone_area = gray.width() as f64 * gray.height() as f64;
        Some(Blob {
            area_fraction: component.pixels as f64 / zone_area,
            rectangularity: component.pixels as f64 / component.box_area() as f64,
        })
    }
}

impl OccupancyDetector for ContourDetector {
    fn name(&self) -> &'static str {
        "contour"
    }

    fn is_occupied(&self, zone: &ZoneObservation) -> bool {
        let Some(crop) = &zone.crop else {
            return false;
        };
        self.largest_blob(crop).is_some_and(|blob| {
            blob.area_fraction >= self.params.min_area_fraction
                && blob.rectangularity >= self.params.min_rectangularity
        })
    }
}

fn border_mean(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    let mut sum = 0.0;
    let mut count = 0usize;
    for (x, y, pixel) in gray.enumerate_pixels() {
        if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
            sum += pixel.0[0] as f64;
            count += 1;
        }
    }
    if count == 0 { 0.0 } else { sum / count as f64 }
}

struct Component {
    pixels: u64,
    min: (u32, u32),
    max: (u32, u32),
}

impl Component {
    fn box_area(&self) -> u64 {
        (self.max.0 - self.min.0 + 1) as u64 * (self.max.1 - self.min.1 + 1) as u64
    }
}

/// Largest labelled region; label 0 is background.
fn largest_component(labels: &ImageBuffer<Luma<u32>, Vec<u32>>) -> Option<Component> {
    let mut components: BTreeMap<u32, Component> = BTreeMap::new();
    for (x, y, pixel) in labels.enumerate_pixels() {
        let label = pixel.0[0];
        if label == 0 {
            continue;
        }
        let component = components.entry(label).or_insert(Component {
            pixels: 0,
            min: (x, y),
            max: (x, y),
        });
        component.pixels += 1;
        component.min = (component.min.0.min(x), component.min.1.min(y));
        component.max = (component.max.0.max(x), component.max.1.max(y));
    }

    components.into_values().max_by_key(|c| c.pixels)
}
