//! Engine configuration: where the state files live and how often to poll

use crate::files::SnapshotFiles;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    pub files: StateFileNames,
    pub poll_interval_ms: u64,
}

/// File names inside `data_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateFileNames {
    pub player_cards: String,
    pub board_cards: String,
    pub action_event: String,
    pub winner: String,
    pub turn: String,
    pub detections: String,
    pub player_zones: String,
    pub board_zones: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".into(),
            files: StateFileNames::default(),
            poll_interval_ms: 500,
        }
    }
}

impl Default for StateFileNames {
    fn default() -> Self {
        Self {
            player_cards: "player_cards.json".into(),
            board_cards: "flop_cards.json".into(),
            action_event: "last_check.json".into(),
            winner: "winner.json".into(),
            turn: "turn.json".into(),
            detections: "detections.json".into(),
            player_zones: "p_slots.json".into(),
            board_zones: "f_slots.json".into(),
        }
    }
}

impl EngineConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    pub fn snapshot_files(&self) -> SnapshotFiles {
        SnapshotFiles::new(
            self.path(&self.files.player_cards),
            self.path(&self.files.board_cards),
        )
    }

    pub fn action_event_path(&self) -> PathBuf {
        self.path(&self.files.action_event)
    }

    pub fn winner_path(&self) -> PathBuf {
        self.path(&self.files.winner)
    }

    pub fn turn_path(&self) -> PathBuf {
        self.path(&self.files.turn)
    }

    pub fn detections_path(&self) -> PathBuf {
        self.path(&self.files.detections)
    }

    pub fn zone_paths(&self) -> (PathBuf, PathBuf) {
        (
            self.path(&self.files.player_zones),
            self.path(&self.files.board_zones),
        )
    }
}
