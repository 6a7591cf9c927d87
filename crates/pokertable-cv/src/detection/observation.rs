//! Per-frame input to the aggregator

use crate::bbox::BBox;
use crate::zones::ZoneId;
use image::RgbImage;
use pokertable_core::{CardIdentity, Timestamp};
use tracing::trace;

/// One model output inside a zone.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionCandidate {
    pub identity: CardIdentity,
    pub confidence: f64,
}

impl DetectionCandidate {
    pub fn new(identity: CardIdentity, confidence: f64) -> Self {
        Self { identity, confidence }
    }

    /// Reads the model label off a detection box; unknown labels yield `None`.
    pub fn from_bbox(bbox: &BBox) -> Option<Self> {
        match bbox.class_id.parse::<CardIdentity>() {
            Ok(identity) => Some(Self::new(identity, bbox.confidence)),
            Err(err) => {
                trace!(label = %bbox.class_id, %err, "ignoring unknown label");
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ZoneObservation {
    pub zone: ZoneId,
    pub candidates: Vec<DetectionCandidate>,
    /// Zone pixels, when the frame image was available.
    pub crop: Option<RgbImage>,
}

impl ZoneObservation {
    pub fn new(zone: ZoneId, candidates: Vec<DetectionCandidate>) -> Self {
        Self {
            zone,
            candidates,
            crop: None,
        }
    }

    pub fn with_crop(mut self, crop: RgbImage) -> Self {
        self.crop = Some(crop);
        self
    }
}

#[derive(Debug, Clone)]
pub struct FrameObservation {
    pub captured_at: Timestamp,
    pub zones: Vec<ZoneObservation>,
}

impl FrameObservation {
    pub fn new(captured_at: Timestamp, zones: Vec<ZoneObservation>) -> Self {
        Self { captured_at, zones }
    }

    /// A frame that saw nothing; only ages the table.
    pub fn empty(captured_at: Timestamp) -> Self {
        Self::new(captured_at, Vec::new())
    }
}
