use super::slot::Timestamp;
use crate::cards::CardIdentity;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The aggregator's current claim about one slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotBelief {
    #[serde(rename = "name")]
    pub identity: CardIdentity,
    #[serde(rename = "conf")]
    pub confidence: f64,
    #[serde(rename = "ts")]
    pub last_seen: Timestamp,
}

impl SlotBelief {
    pub fn new(identity: CardIdentity, confidence: f64, last_seen: Timestamp) -> Self {
        Self {
            identity,
            confidence,
            last_seen,
        }
    }

    /// Strictly older than `ttl` at `now`.
    pub fn is_expired(&self, now: Timestamp, ttl: Duration) -> bool {
        now.seconds_since(self.last_seen) > ttl.as_secs_f64()
    }
}
