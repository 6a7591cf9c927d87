use super::table::TableSnapshot;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared, cycle-atomic holder of the current [`TableSnapshot`].
///
/// Writers build the next snapshot on a private copy and swap it in whole,
/// so a reader's `Arc` always points at a fully merged table.
#[derive(Debug, Default)]
pub struct TableStore {
    current: RwLock<Arc<TableSnapshot>>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<TableSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Apply one cycle's mutation and publish the result.
    pub fn update<R>(&self, apply: impl FnOnce(&mut TableSnapshot) -> R) -> R {
        let mut guard = self.current.write();
        let mut next = TableSnapshot::clone(&guard);
        let result = apply(&mut next);
        *guard = Arc::new(next);
        result
    }

    pub fn replace(&self, snapshot: TableSnapshot) {
        *self.current.write() = Arc::new(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardIdentity;
    use crate::snapshot::{PlayerId, SlotBelief, SlotId, Timestamp};

    #[test]
    fn readers_keep_their_snapshot_across_updates() {
        let store = TableStore::new();
        let before = store.snapshot();

        store.update(|table| {
            table.set_belief(
                SlotId::hole(PlayerId(1), 0),
                SlotBelief::new(CardIdentity::FaceDown, 0.5, Timestamp(1.0)),
            );
            table.set_belief(
                SlotId::hole(PlayerId(2), 0),
                SlotBelief::new(CardIdentity::FaceDown, 0.5, Timestamp(1.0)),
            );
        });

        assert!(before.is_empty());
        assert_eq!(store.snapshot().active_players().len(), 2);
    }

    #[test]
    fn concurrent_readers_never_see_half_a_cycle() {
        let store = Arc::new(TableStore::new());
        let reader = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..1_000 {
                    let players = store.snapshot().players.len();
                    assert!(players == 0 || players == 3, "saw {players} players");
                }
            })
        };

        for round in 0..200 {
            store.update(|table| {
                if round % 2 == 0 {
                    for id in 1..=3 {
                        table.set_belief(
                            SlotId::hole(PlayerId(id), 0),
                            SlotBelief::new(CardIdentity::FaceDown, 0.5, Timestamp(round as f64)),
                        );
                    }
                } else {
                    *table = TableSnapshot::new();
                }
            });
        }

        reader.join().unwrap();
    }
}
