//! Detection configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub ttl_ms: u64,
    pub hole_cards: usize,
    pub min_card_confidence: f64,
    /// Extra weight per repeated sighting of one identity within a zone.
    pub repeat_boost: f64,
    pub occupancy: OccupancyConfig,
}

/// Face-down fallback configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OccupancyConfig {
    pub order: Vec<OccupancyKind>,
    /// Confidence stored with a face-down placeholder.
    pub placeholder_confidence: f64,
    pub classifier: ClassifierParams,
    pub contour: ContourParams,
    pub color: ColorParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyKind {
    Classifier,
    Contour,
    ColorDistance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    pub min_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourParams {
    pub min_area_fraction: f64,
    pub min_rectangularity: f64,
    pub min_contrast: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorParams {
    /// Mean colour of an empty seat (table felt).
    pub empty_color: [u8; 3],
    pub min_distance: f64,
}

impl DetectionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl OccupancyConfig {
    /// Only trust the card model's own face-down class.
    pub fn classifier_only() -> Self {
        Self {
            order: vec![OccupancyKind::Classifier],
            ..Self::default()
        }
    }

    /// Image heuristics only, for models without a face-down class.
    pub fn heuristics_only() -> Self {
        Self {
            order: vec![OccupancyKind::Contour, OccupancyKind::ColorDistance],
            ..Self::default()
        }
    }

    pub fn disabled() -> Self {
        Self {
            order: Vec::new(),
            ..Self::default()
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 4000,
            hole_cards: 2,
            min_card_confidence: 0.4,
            repeat_boost: 0.0,
            occupancy: OccupancyConfig::default(),
        }
    }
}

impl Default for OccupancyConfig {
    fn default() -> Self {
        Self {
            order: vec![
                OccupancyKind::Classifier,
                OccupancyKind::Contour,
                OccupancyKind::ColorDistance,
            ],
            placeholder_confidence: 0.5,
            classifier: ClassifierParams::default(),
            contour: ContourParams::default(),
            color: ColorParams::default(),
        }
    }
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self { min_confidence: 0.5 }
    }
}

impl Default for ContourParams {
    fn default() -> Self {
        Self {
            min_area_fraction: 0.30,
            min_rectangularity: 0.75,
            min_contrast: 40.0,
        }
    }
}

impl Default for ColorParams {
    fn default() -> Self {
        Self {
            empty_color: [53, 101, 77],
            min_distance: 60.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: DetectionConfig =
            serde_json::from_str(r#"{"ttl_ms": 2500, "occupancy": {"order": ["contour"]}}"#).unwrap();

        assert_eq!(config.ttl(), Duration::from_millis(2500));
        assert_eq!(config.hole_cards, 2);
        assert_eq!(config.min_card_confidence, 0.4);
        assert_eq!(config.occupancy.order, vec![OccupancyKind::Contour]);
        assert_eq!(config.occupancy.contour.min_area_fraction, 0.30);
    }
}
