//! Poker Table State Core
//!
//! Stable per-slot beliefs, the shared table store, action-edge detection and
//! the turn order state machine for a camera-tracked physical poker table.

pub mod cards;
pub mod config;
pub mod error;
pub mod events;
pub mod files;
pub mod snapshot;
pub mod turn;

// Re-export commonly used types
pub use cards::{Card, CardIdentity, Rank, Suit};
pub use config::EngineConfig;
pub use error::{Result, TableError};
pub use events::{ActionEdge, ChangeDetector, EventSource, FileEventSource, Fingerprint, SourceRead};
pub use snapshot::{ActivePlayers, PlayerId, SlotBelief, SlotId, TableSnapshot, TableStore, Timestamp};
pub use turn::{HandState, Instruction, TurnMode, TurnOutput, TurnTarget, TurnTracker};
