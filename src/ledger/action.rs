//! Betting actions as recorded in a hand's history.

use crate::cards::Street;
use crate::snapshot::Player;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of betting action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
}

impl ActionKind {
    /// BET or RAISE.
    pub fn is_aggressive(&self) -> bool {
        matches!(self, ActionKind::Bet | ActionKind::Raise)
    }

    /// Whether the action puts chips in the pot.
    pub fn adds_chips(&self) -> bool {
        matches!(self, ActionKind::Bet | ActionKind::Raise | ActionKind::Call)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionKind::Fold => "FOLD",
            ActionKind::Check => "CHECK",
            ActionKind::Call => "CALL",
            ActionKind::Bet => "BET",
            ActionKind::Raise => "RAISE",
        };
        f.write_str(s)
    }
}

/// One entry of the action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub street: Street,
    pub player: Player,
    pub kind: ActionKind,
    pub amount: Option<f64>,
    /// Only ever set for hero's own decisions.
    pub reasoning: Option<String>,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.amount {
            Some(amount) if amount > 0.0 => write!(f, "{} {} {:.2}", self.player, self.kind, amount),
            _ => write!(f, "{} {}", self.player, self.kind),
        }
    }
}
