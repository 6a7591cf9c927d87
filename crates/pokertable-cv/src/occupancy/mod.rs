//! Face-down card fallback detectors

pub mod classifier;
pub mod color;
pub mod contour;

pub use classifier::ClassifierDetector;
pub use color::ColorDistanceDetector;
pub use contour::{Blob, ContourDetector};

use crate::detection::config::{OccupancyConfig, OccupancyKind};
use crate::detection::ZoneObservation;
use crate::traits::OccupancyDetector;

/// Detectors consulted in configured order; the first positive wins.
pub struct OccupancyChain {
    detectors: Vec<Box<dyn OccupancyDetector>>,
}

impl OccupancyChain {
    pub fn new(detectors: Vec<Box<dyn OccupancyDetector>>) -> Self {
        Self { detectors }
    }

    pub fn from_config(config: &OccupancyConfig) -> Self {
        let detectors = config
            .order
            .iter()
            .map(|kind| -> Box<dyn OccupancyDetector> {
                match kind {
                    OccupancyKind::Classifier => {
                        Box::new(ClassifierDetector::new(config.classifier.clone()))
                    }
                    OccupancyKind::Contour => Box::new(ContourDetector::new(config.contour.clone())),
                    OccupancyKind::ColorDistance => {
                        Box::new(ColorDistanceDetector::new(config.color.clone()))
                    }
                }
            })
            .collect();
        Self::new(detectors)
    }

    /// Name of the first detector that reports a card.
    pub fn first_hit(&self, zone: &ZoneObservation) -> Option<&'static str> {
        self.detectors
            .iter()
            .find(|detector| detector.is_occupied(zone))
            .map(|detector| detector.name())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }
}

impl std::fmt::Debug for OccupancyChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OccupancyChain").field("detectors", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::DetectionCandidate;
    use crate::zones::ZoneId;
    use image::{Rgb, RgbImage};
    use pokertable_core::{CardIdentity, PlayerId};

    struct Always(&'static str, bool);

    impl OccupancyDetector for Always {
        fn name(&self) -> &'static str {
            self.0
        }

        fn is_occupied(&self, _zone: &ZoneObservation) -> bool {
            self.1
        }
    }

    #[test]
    fn test_first_positive_wins() {
        let chain = OccupancyChain::new(vec![
            Box::new(Always("a", false)),
            Box::new(Always("b", true)),
            Box::new(Always("c", true)),
        ]);
        let zone = ZoneObservation::new(ZoneId::Player(PlayerId(3)), vec![]);
        assert_eq!(chain.first_hit(&zone), Some("b"));
    }

    #[test]
    fn test_default_order() {
        let chain = OccupancyChain::from_config(&OccupancyConfig::default());
        assert_eq!(chain.names(), vec!["classifier", "contour", "color_distance"]);
        assert!(OccupancyChain::from_config(&OccupancyConfig::disabled()).names().is_empty());
    }

    #[test]
    fn test_classifier_outranks_heuristics() {
        let chain = OccupancyChain::from_config(&OccupancyConfig::default());
        let zone = ZoneObservation::new(
            ZoneId::Player(PlayerId(1)),
            vec![DetectionCandidate::new(CardIdentity::FaceDown, 0.9)],
        )
        .with_crop(RgbImage::from_pixel(20, 20, Rgb([200, 30, 30])));

        assert_eq!(chain.first_hit(&zone), Some("classifier"));
    }
}
