//! Poker Table Vision Library
//!
//! Turns per-frame card detections into zone observations and folds them
//! into the shared table state, with image heuristics standing in for the
//! card model when a seat's cards are face down.

pub mod bbox;
pub mod detection;
pub mod error;
pub mod occupancy;
pub mod source;
pub mod utils;
pub mod zones;

// Re-export commonly used types
pub use bbox::{BBox, BBoxCollection, Point};
pub use detection::{
    AggregateReport, Aggregator, CycleReport, DetectionCandidate, DetectionConfig,
    FrameObservation, TableEngine, ZoneObservation,
};
pub use error::ZoneError;
pub use occupancy::OccupancyChain;
pub use source::{DetectionFile, FileFrameSource, RawDetection};
pub use zones::{ZoneId, ZoneLayout};

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Core traits for the CV system
pub mod traits {
    use crate::detection::{FrameObservation, ZoneObservation};
    use pokertable_core::Timestamp;

    /// Decides whether a zone holds a card the model could not read.
    pub trait OccupancyDetector: Send + Sync {
        fn name(&self) -> &'static str;
        fn is_occupied(&self, zone: &ZoneObservation) -> bool;
    }

    /// Supplies one frame of observations per cycle.
    pub trait FrameSource {
        fn next_frame(&mut self, now: Timestamp) -> FrameObservation;
    }
}
