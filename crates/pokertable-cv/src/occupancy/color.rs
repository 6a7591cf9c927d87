use crate::detection::config::ColorParams;
use crate::detection::ZoneObservation;
use crate::traits::OccupancyDetector;
use crate::utils::ImageUtils;

/// Fires when the zone's mean colour has drifted away from bare felt.
#[derive(Debug, Clone)]
pub struct ColorDistanceDetector {
    params: ColorParams,
}

impl ColorDistanceDetector {
    pub fn new(params: ColorParams) -> Self {
        Self { params }
    }
}

impl OccupancyDetector for ColorDistanceDetector {
    fn name(&self) -> &'static str {
        "color_distance"
    }

    fn is_occupied(&self, zone: &ZoneObservation) -> bool {
        let Some(crop) = &zone.crop else {
            return false;
        };
        let empty = self.params.empty_color.map(f64::from);
        ImageUtils::color_distance(ImageUtils::mean_rgb(crop), empty) > self.params.min_distance
    }
}
