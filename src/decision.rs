//! Decisions handed to the action executor.

use crate::ledger::ActionKind;
use crate::snapshot::ScreenPos;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Action the executor should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DecisionKind {
    Fold,
    Call,
    Check,
    Raise,
    Bet,
    /// Nothing to do this cycle.
    Wait,
}

impl DecisionKind {
    /// The ledger action this decision becomes once taken; `None` for WAIT.
    pub fn as_action(&self) -> Option<ActionKind> {
        match self {
            DecisionKind::Fold => Some(ActionKind::Fold),
            DecisionKind::Call => Some(ActionKind::Call),
            DecisionKind::Check => Some(ActionKind::Check),
            DecisionKind::Raise => Some(ActionKind::Raise),
            DecisionKind::Bet => Some(ActionKind::Bet),
            DecisionKind::Wait => None,
        }
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecisionKind::Fold => "FOLD",
            DecisionKind::Call => "CALL",
            DecisionKind::Check => "CHECK",
            DecisionKind::Raise => "RAISE",
            DecisionKind::Bet => "BET",
            DecisionKind::Wait => "WAIT",
        };
        f.write_str(s)
    }
}

/// Output contract to the action executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: DecisionKind,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub position: Option<ScreenPos>,
    #[serde(default)]
    pub reasoning: String,
}

impl Decision {
    pub fn new(action: DecisionKind, reasoning: impl Into<String>) -> Self {
        Self { action, amount: None, position: None, reasoning: reasoning.into() }
    }

    pub fn wait(reasoning: impl Into<String>) -> Self {
        Self::new(DecisionKind::Wait, reasoning)
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_position(mut self, position: Option<ScreenPos>) -> Self {
        self.position = position;
        self
    }

    pub fn is_wait(&self) -> bool {
        self.action == DecisionKind::Wait
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_json_shape() {
        let decision = Decision::new(DecisionKind::Raise, "in range")
            .with_amount(2.5)
            .with_position(Some(ScreenPos(10, 20)));
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["action"], "RAISE");
        assert_eq!(json["amount"], 2.5);
        assert_eq!(json["position"], serde_json::json!([10, 20]));

        let wait = serde_json::to_value(Decision::wait("not our turn")).unwrap();
        assert_eq!(wait["action"], "WAIT");
        assert!(wait["amount"].is_null());
        assert!(wait["position"].is_null());
    }

    #[test]
    fn test_parse_external_decision() {
        let decision: Decision =
            serde_json::from_str(r#"{"action": "BET", "amount": 3.3, "reasoning": "value"}"#).unwrap();
        assert_eq!(decision.action, DecisionKind::Bet);
        assert_eq!(decision.action.as_action(), Some(ActionKind::Bet));
        assert_eq!(decision.position, None);
    }
}
