//! One detection/turn cycle over the shared table store

use super::aggregator::{AggregateReport, Aggregator};
use super::observation::FrameObservation;
use pokertable_core::{
    ActionEdge, ActivePlayers, ChangeDetector, EventSource, TableSnapshot, TableStore,
    Timestamp, TurnOutput, TurnTracker,
};
use std::sync::Arc;
use tracing::info;

/// Everything one cycle produced
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub action: Option<ActionEdge>,
    pub aggregate: AggregateReport,
    pub active: ActivePlayers,
    pub board_count: usize,
    pub output: TurnOutput,
    pub snapshot: Arc<TableSnapshot>,
}

/// Wires the aggregator, change detector and turn tracker around one store.
///
/// Each tick polls the action source first, then refreshes the table, and
/// steps the tracker on the snapshot the refresh produced.
pub struct TableEngine<S: EventSource> {
    aggregator: Aggregator,
    store: Arc<TableStore>,
    detector: ChangeDetector,
    events: S,
    tracker: TurnTracker,
}

impl<S: EventSource> TableEngine<S> {
    pub fn new(aggregator: Aggregator, events: S) -> Self {
        Self::with_store(aggregator, events, Arc::new(TableStore::new()))
    }

    pub fn with_store(aggregator: Aggregator, events: S, store: Arc<TableStore>) -> Self {
        Self {
            aggregator,
            store,
            detector: ChangeDetector::new(),
            events,
            tracker: TurnTracker::new(),
        }
    }

    /// Handle for readers that want snapshots between ticks.
    pub fn store(&self) -> Arc<TableStore> {
        Arc::clone(&self.store)
    }

    pub fn tracker(&self) -> &TurnTracker {
        &self.tracker
    }

    /// Merge a captured frame, then advance the turn state.
    ///
    /// Zone decisions are made before the store's write lock is taken; only
    /// the merge and eviction run under it.
    pub fn tick(&mut self, frame: &FrameObservation) -> CycleReport {
        let action = self.detector.poll(&mut self.events);
        let decided = self.aggregator.decide_frame(frame);
        let aggregator = &self.aggregator;
        let aggregate = self.store.update(|table| aggregator.merge(decided, table));
        self.finish(action, aggregate)
    }

    /// Adopt a snapshot produced elsewhere, drop its beliefs older than the
    /// TTL at `now`, then advance the turn state.
    pub fn tick_snapshot(&mut self, mut snapshot: TableSnapshot, now: Timestamp) -> CycleReport {
        let action = self.detector.poll(&mut self.events);
        let evicted = snapshot.evict_expired(now, self.aggregator.ttl()).len();
        self.store.replace(snapshot);
        let aggregate = AggregateReport {
            evicted,
            ..AggregateReport::default()
        };
        self.finish(action, aggregate)
    }

    fn finish(&mut self, action: Option<ActionEdge>, aggregate: AggregateReport) -> CycleReport {
        let snapshot = self.store.snapshot();
        let active = snapshot.active_players();
        let board_count = snapshot.board_count();

        let previous = self.tracker.state().clone();
        let output = self.tracker.step(&active, board_count, action);
        if *self.tracker.state() != previous {
            info!(mode = %output.mode, "{}", output.message());
        }

        CycleReport {
            action,
            aggregate,
            active,
            board_count,
            output,
            snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{DetectionCandidate, DetectionConfig, ZoneObservation};
    use crate::zones::ZoneId;
    use pokertable_core::events::MemoryEventSource;
    use pokertable_core::files::ActionEvent;
    use pokertable_core::{CardIdentity, PlayerId, SourceRead, TurnMode, TurnTarget};

    fn check(stamp: &str) -> SourceRead {
        SourceRead::event(&ActionEvent {
            timestamp: stamp.to_string(),
            kind: "check_event".to_string(),
            data: "CHECK".to_string(),
        })
    }

    fn seated(at: f64, players: &[u32]) -> FrameObservation {
        let zones = players
            .iter()
            .map(|&id| {
                ZoneObservation::new(
                    ZoneId::Player(PlayerId(id)),
                    vec![DetectionCandidate::new(CardIdentity::FaceDown, 0.9)],
                )
            })
            .collect();
        FrameObservation::new(Timestamp(at), zones)
    }

    #[test]
    fn test_first_action_record_only_primes() {
        let mut events = MemoryEventSource::new();
        events.push(check("t0"));
        let mut engine = TableEngine::new(Aggregator::new(DetectionConfig::default()), events);

        let report = engine.tick(&seated(1.0, &[1, 2]));
        assert!(report.action.is_none());
        assert_eq!(report.output.mode, TurnMode::Action);
        assert_eq!(report.output.target, TurnTarget::Player(PlayerId(1)));
    }

    #[test]
    fn test_new_record_advances_turn() {
        let mut events = MemoryEventSource::new();
        events.push(check("t0"));
        events.push(check("t1"));
        let mut engine = TableEngine::new(Aggregator::new(DetectionConfig::default()), events);

        engine.tick(&seated(1.0, &[1, 2]));
        let report = engine.tick(&seated(1.5, &[1, 2]));
        assert!(report.action.is_some());
        assert_eq!(report.output.target, TurnTarget::Player(PlayerId(2)));

        // the source repeats t1, so no further edge
        let report = engine.tick(&seated(2.0, &[1, 2]));
        assert!(report.action.is_none());
        assert_eq!(report.output.target, TurnTarget::Player(PlayerId(2)));
    }

    #[test]
    fn test_store_shares_snapshots() {
        let mut engine =
            TableEngine::new(Aggregator::new(DetectionConfig::default()), MemoryEventSource::new());
        let store = engine.store();

        let report = engine.tick(&seated(1.0, &[3]));
        assert_eq!(store.snapshot().active_players(), report.active);
        assert_eq!(report.board_count, 0);

        engine.tick_snapshot(TableSnapshot::new(), Timestamp(2.0));
        assert!(store.snapshot().is_empty());
        assert_eq!(engine.tracker().state().turn_index, 0);
    }

    #[test]
    fn test_adopted_snapshot_is_aged_before_use() {
        let mut engine =
            TableEngine::new(Aggregator::new(DetectionConfig::default()), MemoryEventSource::new());

        let mut table = TableSnapshot::new();
        Aggregator::new(DetectionConfig::default()).aggregate(&seated(1.0, &[1, 2]), &mut table);

        let fresh = engine.tick_snapshot(table.clone(), Timestamp(4.5));
        assert_eq!(fresh.active.len(), 2);
        assert_eq!(fresh.output.mode, TurnMode::Action);

        let stale = engine.tick_snapshot(table, Timestamp(60.0));
        assert_eq!(stale.aggregate.evicted, 2);
        assert!(stale.snapshot.is_empty());
        assert_eq!(stale.output.mode, TurnMode::Idle);
    }
}
