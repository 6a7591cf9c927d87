use super::{Rank, Suit};
use crate::error::TableError;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Label the detection model and the state files use for a face-down card.
pub const FACE_DOWN_LABEL: &str = "DN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Every card face the model can classify.
    pub fn all() -> impl Iterator<Item = Card> {
        Suit::ALL
            .into_iter()
            .flat_map(|suit| Rank::ORDERED.into_iter().map(move |rank| Card::new(rank, suit)))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || TableError::InvalidCard(s.to_string());

        let suit_letter = s.chars().last().ok_or_else(invalid)?;
        let suit = Suit::from_letter(suit_letter).ok_or_else(invalid)?;
        let rank = Rank::from_label(&s[..s.len() - suit_letter.len_utf8()]).ok_or_else(invalid)?;

        Ok(Card::new(rank, suit))
    }
}

/// What occupies a slot: a recognised card face or an unrevealed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CardIdentity {
    Face(Card),
    FaceDown,
}

impl CardIdentity {
    pub fn is_face_down(&self) -> bool {
        matches!(self, CardIdentity::FaceDown)
    }

    pub fn card(&self) -> Option<Card> {
        match self {
            CardIdentity::Face(card) => Some(*card),
            CardIdentity::FaceDown => None,
        }
    }
}

impl fmt::Display for CardIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardIdentity::Face(card) => card.fmt(f),
            CardIdentity::FaceDown => f.write_str(FACE_DOWN_LABEL),
        }
    }
}

impl FromStr for CardIdentity {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(FACE_DOWN_LABEL) {
            return Ok(CardIdentity::FaceDown);
        }
        s.parse().map(CardIdentity::Face)
    }
}

impl From<Card> for CardIdentity {
    fn from(card: Card) -> Self {
        CardIdentity::Face(card)
    }
}

impl TryFrom<String> for CardIdentity {
    type Error = TableError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CardIdentity> for String {
    fn from(identity: CardIdentity) -> Self {
        identity.to_string()
    }
}
