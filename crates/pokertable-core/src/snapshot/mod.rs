//! Slot beliefs, the table snapshot and its shared store

pub mod belief;
pub mod slot;
pub mod store;
pub mod table;

pub use belief::SlotBelief;
pub use slot::{PlayerId, SlotId, Timestamp};
pub use store::TableStore;
pub use table::{ActivePlayers, TableSnapshot, ACTIVE_MARKER_INDEX};
