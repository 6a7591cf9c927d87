use core::fmt;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seat label; ascending order of ids is the turn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An addressable card position on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum SlotId {
    Hole { player: PlayerId, index: u8 },
    Board { index: u8 },
}

impl SlotId {
    pub const fn hole(player: PlayerId, index: u8) -> Self {
        SlotId::Hole { player, index }
    }

    pub const fn board(index: u8) -> Self {
        SlotId::Board { index }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotId::Hole { player, index } => write!(f, "player {player} card {index}"),
            SlotId::Board { index } => write!(f, "board {index}"),
        }
    }
}

/// Wall-clock seconds since the UNIX epoch, as written to the `ts` fields.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub f64);

impl Timestamp {
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        Timestamp(since_epoch.as_secs_f64())
    }

    pub fn seconds_since(self, earlier: Timestamp) -> f64 {
        self.0 - earlier.0
    }

    pub fn after(self, delta: Duration) -> Timestamp {
        Timestamp(self.0 + delta.as_secs_f64())
    }
}
