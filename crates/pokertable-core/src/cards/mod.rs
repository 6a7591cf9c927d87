//! Card faces and slot occupants

pub mod identity;
pub mod rank;
pub mod suit;

pub use identity::{Card, CardIdentity, FACE_DOWN_LABEL};
pub use rank::Rank;
pub use suit::Suit;
