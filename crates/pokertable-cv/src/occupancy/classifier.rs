use crate::detection::config::ClassifierParams;
use crate::detection::ZoneObservation;
use crate::traits::OccupancyDetector;

/// Trusts a face-down class emitted by the card model.
#[derive(Debug, Clone)]
pub struct ClassifierDetector {
    params: ClassifierParams,
}

impl ClassifierDetector {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }
}

impl OccupancyDetector for ClassifierDetector {
    fn name(&self) -> &'static str {
        "classifier"
    }

    fn is_occupied(&self, zone: &ZoneObservation) -> bool {
        zone.candidates
            .iter()
            .any(|c| c.identity.is_face_down() && c.confidence >= self.params.min_confidence)
    }
}
