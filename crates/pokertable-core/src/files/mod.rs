//! State files exchanged with the other table processes

pub mod publish;
pub mod read;
pub mod wire;

pub use publish::{from_wire, to_wire, write_json_atomic, SnapshotFiles};
pub use read::{parse_bytes, read_bytes, read_state, StateRead};
pub use wire::{
    ActionEvent, BoardCardsFile, CardEntry, PlayerCardsFile, PlayerResult, TurnReport,
    WinnerId, WinnerReport,
};
