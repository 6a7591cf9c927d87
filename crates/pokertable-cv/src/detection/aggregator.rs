//! Folds per-frame zone observations into stable slot beliefs
//!
//! Recognised faces always take their slot, whatever it held before. A player
//! zone with no face but a positive occupancy detector keeps the seat marked
//! with a face-down placeholder. Slots nobody refreshes age out after the TTL.

use super::config::DetectionConfig;
use super::observation::{FrameObservation, ZoneObservation};
use crate::occupancy::OccupancyChain;
use crate::zones::ZoneId;
use pokertable_core::{
    snapshot::ACTIVE_MARKER_INDEX, CardIdentity, PlayerId, SlotBelief, SlotId, TableSnapshot,
    Timestamp,
};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, trace};

/// What one zone contributes to the table this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneDecision {
    /// Faces by descending confidence; at most one per slot of the zone.
    Faces(Vec<(CardIdentity, f64)>),
    FaceDown { detector: &'static str },
    Nothing,
}

/// Decisions for every observed zone of one frame, ready to merge.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameDecisions {
    pub captured_at: Timestamp,
    pub decisions: Vec<(ZoneId, ZoneDecision)>,
}

/// Outcome of merging one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateReport {
    pub accepted: usize,
    pub face_down: Vec<PlayerId>,
    pub evicted: usize,
}

#[derive(Debug)]
pub struct Aggregator {
    config: DetectionConfig,
    chain: OccupancyChain,
}

impl Aggregator {
    pub fn new(config: DetectionConfig) -> Self {
        let chain = OccupancyChain::from_config(&config.occupancy);
        Self { config, chain }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl()
    }

    /// Distinct faces in a zone above the confidence floor, strongest first.
    /// Repeated sightings of one identity add `repeat_boost` each; results
    /// are capped at 1.0.
    pub fn rank_faces(&self, zone: &ZoneObservation) -> Vec<(CardIdentity, f64)> {
        let mut faces: Vec<(CardIdentity, f64, usize)> = Vec::new();

        for candidate in &zone.candidates {
            if candidate.identity.is_face_down()
                || candidate.confidence < self.config.min_card_confidence
            {
                continue;
            }
            match faces.iter_mut().find(|(identity, _, _)| *identity == candidate.identity) {
                Some((_, best, seen)) => {
                    *best = best.max(candidate.confidence);
                    *seen += 1;
                }
                None => faces.push((candidate.identity, candidate.confidence, 1)),
            }
        }

        let mut ranked: Vec<(CardIdentity, f64)> = faces
            .into_iter()
            .map(|(identity, best, seen)| {
                let boosted = best * (1.0 + (seen - 1) as f64 * self.config.repeat_boost);
                (identity, boosted.min(1.0))
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    pub fn decide(&self, zone: &ZoneObservation) -> ZoneDecision {
        let mut faces = self.rank_faces(zone);

        match zone.zone {
            ZoneId::Board(_) => {
                faces.truncate(1);
            }
            ZoneId::Player(_) => {
                faces.truncate(self.config.hole_cards);
                if faces.is_empty() {
                    return match self.chain.first_hit(zone) {
                        Some(detector) => ZoneDecision::FaceDown { detector },
                        None => ZoneDecision::Nothing,
                    };
                }
            }
        }

        if faces.is_empty() {
            ZoneDecision::Nothing
        } else {
            ZoneDecision::Faces(faces)
        }
    }

    /// Per-zone decisions for a frame; reads nothing but the frame.
    pub fn decide_frame(&self, frame: &FrameObservation) -> FrameDecisions {
        #[cfg(feature = "parallel")]
        let decisions = {
            use rayon::prelude::*;
            frame
                .zones
                .par_iter()
                .map(|zone| (zone.zone, self.decide(zone)))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let decisions = frame
            .zones
            .iter()
            .map(|zone| (zone.zone, self.decide(zone)))
            .collect();

        FrameDecisions {
            captured_at: frame.captured_at,
            decisions,
        }
    }

    /// Apply decided zones to `table`, then evict beliefs older than the
    /// TTL as of the frame's capture time.
    pub fn merge(&self, frame: FrameDecisions, table: &mut TableSnapshot) -> AggregateReport {
        let now = frame.captured_at;
        let mut report = AggregateReport::default();

        for (zone, decision) in frame.decisions {
            match decision {
                ZoneDecision::Faces(faces) => {
                    for (index, (identity, confidence)) in faces.into_iter().enumerate() {
                        let slot = match zone {
                            ZoneId::Board(board_index) => SlotId::board(board_index),
                            ZoneId::Player(player) => SlotId::hole(player, index as u8),
                        };
                        trace!(%slot, %identity, confidence, "slot refreshed");
                        table.set_belief(slot, SlotBelief::new(identity, confidence, now));
                        report.accepted += 1;
                    }
                }
                ZoneDecision::FaceDown { detector } => {
                    if let ZoneId::Player(player) = zone {
                        let slot = SlotId::hole(player, ACTIVE_MARKER_INDEX);
                        debug!(%player, detector, "face-down card held");
                        table.set_belief(
                            slot,
                            SlotBelief::new(
                                CardIdentity::FaceDown,
                                self.config.occupancy.placeholder_confidence,
                                now,
                            ),
                        );
                        report.face_down.push(player);
                    }
                }
                ZoneDecision::Nothing => {}
            }
        }

        report.evicted = table.evict_expired(now, self.ttl()).len();
        report
    }

    /// `decide_frame` followed by `merge`.
    pub fn aggregate(&self, frame: &FrameObservation, table: &mut TableSnapshot) -> AggregateReport {
        self.merge(self.decide_frame(frame), table)
    }
}
