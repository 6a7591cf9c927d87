//! JSON shapes shared with the capture, sensor, evaluator and display processes

use crate::snapshot::{PlayerId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One slot entry as written to `player_cards.json` / `flop_cards.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardEntry {
    pub name: String,
    pub conf: f64,
    pub ts: Timestamp,
}

/// `{"<card_index>": CardEntry}`
pub type HandEntries = BTreeMap<String, CardEntry>;

/// `{"<player_id>": {"<card_index>": CardEntry}}`
pub type PlayerCardsFile = BTreeMap<String, HandEntries>;

/// `{"<board_index>": CardEntry}`
pub type BoardCardsFile = BTreeMap<String, CardEntry>;

/// Record rewritten by the check sensor on every physical action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: String,
}

/// Winner file produced by the hand evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnerReport {
    pub winner_id: Option<WinnerId>,
    #[serde(default)]
    pub results: BTreeMap<String, PlayerResult>,
}

impl WinnerReport {
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner_id.as_ref().and_then(WinnerId::player_id)
    }
}

/// The evaluator writes ids as JSON object keys, so they may arrive as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WinnerId {
    Number(u32),
    Text(String),
}

impl WinnerId {
    pub fn player_id(&self) -> Option<PlayerId> {
        match self {
            WinnerId::Number(id) => Some(PlayerId(*id)),
            WinnerId::Text(text) => text.trim().parse().ok().map(PlayerId),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub score: Option<i64>,
    pub hand_type: String,
    pub is_winner: bool,
}

/// Turn output published for the display layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: String,
    pub instruction: String,
    pub mode: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_evaluator_output() {
        let json = r#"{
            "winner_id": "3",
            "results": {
                "1": {"score": 5000, "hand_type": "Pair", "is_winner": false},
                "3": {"score": 166, "hand_type": "Straight Flush", "is_winner": true},
                "4": {"score": null, "hand_type": "Incomplete Hand", "is_winner": false}
            }
        }"#;
        let report: WinnerReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.winner(), Some(PlayerId(3)));
        assert_eq!(report.results["4"].score, None);
    }

    #[test]
    fn null_winner() {
        let report: WinnerReport = serde_json::from_str(r#"{"winner_id": null, "results": {}}"#).unwrap();
        assert_eq!(report.winner(), None);
    }

    #[test]
    fn parses_check_record() {
        let json = r#"{"timestamp": "2025-03-01T19:04:11.532101", "type": "check_event", "data": "2"}"#;
        let event: ActionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, "check_event");
        assert_eq!(event.data, "2");
    }
}
