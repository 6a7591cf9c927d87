use super::belief::SlotBelief;
use super::slot::{PlayerId, SlotId, Timestamp};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Hole-card index whose face-down marker keeps a player in the hand.
pub const ACTIVE_MARKER_INDEX: u8 = 0;

/// Per-slot beliefs for the whole table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSnapshot {
    pub players: BTreeMap<PlayerId, BTreeMap<u8, SlotBelief>>,
    pub board: BTreeMap<u8, SlotBelief>,
}

impl TableSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn belief(&self, slot: SlotId) -> Option<&SlotBelief> {
        match slot {
            SlotId::Hole { player, index } => self.players.get(&player)?.get(&index),
            SlotId::Board { index } => self.board.get(&index),
        }
    }

    pub fn set_belief(&mut self, slot: SlotId, belief: SlotBelief) {
        match slot {
            SlotId::Hole { player, index } => {
                self.players.entry(player).or_default().insert(index, belief);
            }
            SlotId::Board { index } => {
                self.board.insert(index, belief);
            }
        }
    }

    pub fn remove(&mut self, slot: SlotId) -> Option<SlotBelief> {
        match slot {
            SlotId::Hole { player, index } => {
                let hand = self.players.get_mut(&player)?;
                let removed = hand.remove(&index);
                if hand.is_empty() {
                    self.players.remove(&player);
                }
                removed
            }
            SlotId::Board { index } => self.board.remove(&index),
        }
    }

    /// Every present slot, hole cards first.
    pub fn slots(&self) -> impl Iterator<Item = (SlotId, &SlotBelief)> {
        let holes = self.players.iter().flat_map(|(player, hand)| {
            hand.iter()
                .map(move |(index, belief)| (SlotId::hole(*player, *index), belief))
        });
        let board = self
            .board
            .iter()
            .map(|(index, belief)| (SlotId::board(*index), belief));
        holes.chain(board)
    }

    /// Drops every belief last seen more than `ttl` before `now`.
    pub fn evict_expired(&mut self, now: Timestamp, ttl: Duration) -> Vec<SlotId> {
        let expired: Vec<SlotId> = self
            .slots()
            .filter(|(_, belief)| belief.is_expired(now, ttl))
            .map(|(slot, _)| slot)
            .collect();

        for slot in &expired {
            self.remove(*slot);
            debug!(%slot, "belief expired");
        }

        expired
    }

    /// Street token: number of occupied board slots.
    pub fn board_count(&self) -> usize {
        self.board.len()
    }

    pub fn active_players(&self) -> ActivePlayers {
        let ids = self
            .players
            .iter()
            .filter(|(_, hand)| {
                hand.get(&ACTIVE_MARKER_INDEX)
                    .is_some_and(|belief| belief.identity.is_face_down())
            })
            .map(|(player, _)| *player)
            .collect();
        ActivePlayers::from_sorted(ids)
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.board.is_empty()
    }
}

/// Players still holding face-down cards, in turn order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivePlayers(Vec<PlayerId>);

impl ActivePlayers {
    pub fn new(mut ids: Vec<PlayerId>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }

    fn from_sorted(ids: Vec<PlayerId>) -> Self {
        Self(ids)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<PlayerId> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[PlayerId] {
        &self.0
    }
}

impl<const N: usize> From<[u32; N]> for ActivePlayers {
    fn from(ids: [u32; N]) -> Self {
        ActivePlayers::new(ids.into_iter().map(PlayerId).collect())
    }
}
