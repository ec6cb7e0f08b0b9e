//! Pot types and running pot replay.

use super::record::HandRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Preflop escalation level as classified by the perception layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PotType {
    #[serde(rename = "2_bet_pot")]
    TwoBet,
    #[serde(rename = "3_bet_pot")]
    ThreeBet,
    #[serde(rename = "4_bet_pot")]
    FourBet,
    /// Also absorbs any label the perception layer invents.
    #[default]
    #[serde(rename = "unknown", other)]
    Unknown,
}

impl PotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PotType::Unknown => "unknown",
            PotType::TwoBet => "2_bet_pot",
            PotType::ThreeBet => "3_bet_pot",
            PotType::FourBet => "4_bet_pot",
        }
    }

    /// Pot assumed at the start of the flop for this pot type.
    pub fn base_pot(&self) -> f64 {
        match self {
            PotType::Unknown => 3.0,
            PotType::TwoBet => 5.0,
            PotType::ThreeBet => 20.0,
            PotType::FourBet => 50.0,
        }
    }
}

impl fmt::Display for PotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pot size right after one replayed action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PotStep {
    /// Index into `HandRecord::actions`.
    pub action_index: usize,
    pub pot: f64,
}

/// Replay the pot through every recorded action, in order.
///
/// Starts from the base pot of the preflop pot type; BET, RAISE and CALL add
/// their amount. One step per action.
pub fn running_pot(hand: &HandRecord) -> Vec<PotStep> {
    let mut pot = hand.preflop_pot_type().base_pot();
    hand.actions()
        .iter()
        .enumerate()
        .map(|(action_index, action)| {
            if action.kind.adds_chips() {
                pot += action.amount.unwrap_or(0.0);
            }
            PotStep { action_index, pot }
        })
        .collect()
}
