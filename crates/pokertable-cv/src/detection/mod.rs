//! Frame aggregation and the per-cycle table engine

pub mod aggregator;
pub mod config;
pub mod engine;
pub mod observation;

pub use aggregator::{AggregateReport, Aggregator, FrameDecisions, ZoneDecision};
pub use config::{DetectionConfig, OccupancyConfig, OccupancyKind};
pub use engine::{CycleReport, TableEngine};
pub use observation::{DetectionCandidate, FrameObservation, ZoneObservation};
