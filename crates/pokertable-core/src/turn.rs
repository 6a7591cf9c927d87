//! Turn order state machine
//!
//! Driven once per cycle with the active players derived from the current
//! snapshot, the board card count, and at most one action edge.

use crate::events::{ActionEdge, Fingerprint};
use crate::files::TurnReport;
use crate::snapshot::{ActivePlayers, PlayerId};
use core::fmt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Board count at which a finished betting round leads to showdown.
pub const RIVER_BOARD_COUNT: usize = 5;

/// Persistent per-hand state carried between cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandState {
    pub turn_index: usize,
    /// Board card count seen when this street started; a change token only.
    pub street_signature: Option<usize>,
    pub waiting_for_dealer: bool,
    pub showdown_mode: bool,
    pub showdown_index: usize,
    /// Fingerprint of the last action applied to this hand.
    pub last_event: Option<Fingerprint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnMode {
    Idle,
    Action,
    DealerWait,
    Showdown,
    Complete,
}

impl fmt::Display for TurnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnMode::Idle => "Idle",
            TurnMode::Action => "Action",
            TurnMode::DealerWait => "DealerWait",
            TurnMode::Showdown => "Showdown",
            TurnMode::Complete => "Complete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnTarget {
    Nobody,
    Dealer,
    Player(PlayerId),
}

impl fmt::Display for TurnTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnTarget::Nobody => f.write_str("None"),
            TurnTarget::Dealer => f.write_str("Dealer"),
            TurnTarget::Player(player) => write!(f, "Player {player}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    NoActivePlayers,
    AwaitAction,
    DealNextStreet,
    RevealCards,
    DetermineWinner,
}

/// What the table should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutput {
    pub mode: TurnMode,
    pub target: TurnTarget,
    pub instruction: Instruction,
}

impl TurnOutput {
    fn idle() -> Self {
        Self {
            mode: TurnMode::Idle,
            target: TurnTarget::Nobody,
            instruction: Instruction::NoActivePlayers,
        }
    }

    pub fn message(&self) -> String {
        match (self.instruction, self.target) {
            (Instruction::NoActivePlayers, _) => "WAITING FOR NEW HAND (No active players)".to_string(),
            (Instruction::AwaitAction, target) => format!("Awaiting Action from {target}"),
            (Instruction::DealNextStreet, _) => "!!! DEAL NEXT CARDS !!!".to_string(),
            (Instruction::RevealCards, target) => format!("SHOWDOWN: {target}, REVEAL CARDS"),
            (Instruction::DetermineWinner, _) => "HAND COMPLETE: Determine Winner".to_string(),
        }
    }

    pub fn report(&self) -> TurnReport {
        TurnReport {
            turn: self.target.to_string(),
            instruction: self.message(),
            mode: self.mode.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TurnTracker {
    state: HandState,
}

impl TurnTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: HandState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &HandState {
        &self.state
    }

    pub fn step(
        &mut self,
        active: &ActivePlayers,
        board_count: usize,
        action: Option<ActionEdge>,
    ) -> TurnOutput {
        if active.is_empty() {
            if self.state != HandState::default() {
                info!("no active players, hand state cleared");
                self.state = HandState::default();
            }
            return TurnOutput::idle();
        }

        if self.state.street_signature != Some(board_count) {
            info!(board_count, "street update");
            self.state = HandState {
                street_signature: Some(board_count),
                ..HandState::default()
            };
        }

        if let Some(edge) = action {
            self.advance(active.len(), board_count);
            self.state.last_event = Some(edge.fingerprint);
        }

        self.output(active)
    }

    fn advance(&mut self, active_count: usize, board_count: usize) {
        let state = &mut self.state;

        if state.showdown_mode {
            state.showdown_index += 1;
            debug!(showdown_index = state.showdown_index, "showdown advanced");
        } else if !state.waiting_for_dealer {
            state.turn_index += 1;
            debug!(turn_index = state.turn_index, "turn advanced");

            if state.turn_index >= active_count {
                if board_count >= RIVER_BOARD_COUNT {
                    info!("river action complete, entering showdown");
                    state.showdown_mode = true;
                } else {
                    info!(board_count, "street action complete, waiting for dealer");
                    state.waiting_for_dealer = true;
                }
            }
        } else {
            debug!("action while waiting for dealer ignored");
        }
    }

    fn output(&self, active: &ActivePlayers) -> TurnOutput {
        let state = &self.state;

        if state.showdown_mode {
            return match active.get(state.showdown_index) {
                Some(player) => TurnOutput {
                    mode: TurnMode::Showdown,
                    target: TurnTarget::Player(player),
                    instruction: Instruction::RevealCards,
                },
                None => TurnOutput {
                    mode: TurnMode::Complete,
                    target: TurnTarget::Nobody,
                    instruction: Instruction::DetermineWinner,
                },
            };
        }

        if state.waiting_for_dealer {
            return TurnOutput {
                mode: TurnMode::DealerWait,
                target: TurnTarget::Dealer,
                instruction: Instruction::DealNextStreet,
            };
        }

        // The set may have shrunk since the bound check in `advance`.
        let seat = state.turn_index % active.len();
        let target = active
            .get(seat)
            .map_or(TurnTarget::Nobody, TurnTarget::Player);
        TurnOutput {
            mode: TurnMode::Action,
            target,
            instruction: Instruction::AwaitAction,
        }
    }
}
