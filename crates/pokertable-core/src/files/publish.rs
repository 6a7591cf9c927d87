use super::read::{read_state, StateRead};
use super::wire::{BoardCardsFile, CardEntry, HandEntries, PlayerCardsFile};
use crate::cards::CardIdentity;
use crate::error::{Result, TableError};
use crate::snapshot::{PlayerId, SlotBelief, SlotId, TableSnapshot};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Serialise `value` next to `path` and rename it into place, so readers in
/// other processes never observe a half-written file.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value).map_err(|source| TableError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, json)
        .and_then(|()| fs::rename(&staging, path))
        .map_err(|source| TableError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// The pair of card files through which the table snapshot is published.
#[derive(Debug, Clone)]
pub struct SnapshotFiles {
    pub player_cards: PathBuf,
    pub board_cards: PathBuf,
}

impl SnapshotFiles {
    pub fn new(player_cards: impl Into<PathBuf>, board_cards: impl Into<PathBuf>) -> Self {
        Self {
            player_cards: player_cards.into(),
            board_cards: board_cards.into(),
        }
    }

    /// Write the player file, then the board file. A reader racing the two
    /// renames may see new player cards beside the previous board, never
    /// board cards ahead of the players they were dealt with.
    pub fn publish(&self, snapshot: &TableSnapshot) -> Result<()> {
        let (players, board) = to_wire(snapshot);
        write_json_atomic(&self.player_cards, &players)?;
        write_json_atomic(&self.board_cards, &board)
    }

    /// Rebuild a snapshot from disk; anything unreadable counts as empty.
    pub fn load(&self) -> TableSnapshot {
        let players: StateRead<PlayerCardsFile> = read_state(&self.player_cards);
        let board: StateRead<BoardCardsFile> = read_state(&self.board_cards);
        log_read(&self.player_cards, &players);
        log_read(&self.board_cards, &board);

        from_wire(&players.unwrap_or_default(), &board.unwrap_or_default())
    }
}

fn log_read<T>(path: &Path, read: &StateRead<T>) {
    match read {
        StateRead::Loaded(_) => {}
        StateRead::Malformed(reason) => {
            debug!(path = %path.display(), %reason, "state file malformed, treating as empty")
        }
        other => debug!(path = %path.display(), state = other.describe(), "no state yet"),
    }
}

pub fn to_wire(snapshot: &TableSnapshot) -> (PlayerCardsFile, BoardCardsFile) {
    let players = snapshot
        .players
        .iter()
        .map(|(player, hand)| {
            let entries: HandEntries = hand
                .iter()
                .map(|(index, belief)| (index.to_string(), entry(belief)))
                .collect();
            (player.to_string(), entries)
        })
        .collect();

    let board = snapshot
        .board
        .iter()
        .map(|(index, belief)| (index.to_string(), entry(belief)))
        .collect();

    (players, board)
}

pub fn from_wire(players: &PlayerCardsFile, board: &BoardCardsFile) -> TableSnapshot {
    let mut snapshot = TableSnapshot::new();

    for (player_key, hand) in players {
        let Ok(player) = player_key.trim().parse::<u32>() else {
            warn!(key = %player_key, "skipping non-numeric player id");
            continue;
        };
        for (index_key, card) in hand {
            if let Some((index, belief)) = parse_entry(index_key, card) {
                snapshot.set_belief(SlotId::hole(PlayerId(player), index), belief);
            }
        }
    }

    for (index_key, card) in board {
        if let Some((index, belief)) = parse_entry(index_key, card) {
            snapshot.set_belief(SlotId::board(index), belief);
        }
    }

    snapshot
}

fn entry(belief: &SlotBelief) -> CardEntry {
    CardEntry {
        name: belief.identity.to_string(),
        conf: belief.confidence,
        ts: belief.last_seen,
    }
}

fn parse_entry(index_key: &str, card: &CardEntry) -> Option<(u8, SlotBelief)> {
    let index = match index_key.trim().parse::<u8>() {
        Ok(index) => index,
        Err(_) => {
            warn!(key = %index_key, "skipping non-numeric slot index");
            return None;
        }
    };
    match card.name.parse::<CardIdentity>() {
        Ok(identity) => Some((index, SlotBelief::new(identity, card.conf, card.ts))),
        Err(err) => {
            warn!(%err, "skipping slot entry");
            None
        }
    }
}
