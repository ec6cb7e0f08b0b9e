//! Append-only, validated action log for one hand.

use super::action::{Action, ActionKind};
use super::pot::PotType;
use crate::cards::{Board, Card, Street};
use crate::snapshot::Player;
use serde::Serialize;
use thiserror::Error;

/// Amounts closer than this are considered equal.
const AMOUNT_EPSILON: f64 = 1e-9;

/// Why an action was refused by the ledger.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("{player} {kind} on {street} is already recorded")]
    Duplicate { player: Player, kind: ActionKind, street: Street },
    #[error("{player} cannot CHECK after their own {previous} on {street}")]
    CheckAfterAggression { player: Player, previous: ActionKind, street: Street },
    #[error("{player} cannot BET twice on {street}; a second bet is a RAISE")]
    BetAfterBet { player: Player, street: Street },
    #[error("{player} {kind} on {street} has no opposing BET/RAISE to answer")]
    NoOpposingBet { player: Player, kind: ActionKind, street: Street },
}

/// Everything the advisor knows about the current hand.
#[derive(Debug, Clone, Serialize)]
pub struct HandRecord {
    hand_id: u64,
    hero_cards: Vec<Card>,
    #[serde(serialize_with = "serialize_board")]
    board: Board,
    actions: Vec<Action>,
    preflop_pot_type: PotType,
    pot_type_description: String,
    /// Last accepted action per street and player (hero, villain).
    #[serde(skip)]
    last_actions: [[Option<ActionKind>; 2]; 4],
}

fn serialize_board<S: serde::Serializer>(board: &Board, s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(board.cards())
}

impl HandRecord {
    /// Start a new hand.
    pub fn new(hand_id: u64, hero_cards: Vec<Card>) -> Self {
        Self {
            hand_id,
            hero_cards,
            board: Board::new(),
            actions: Vec::new(),
            preflop_pot_type: PotType::Unknown,
            pot_type_description: String::new(),
            last_actions: [[None; 2]; 4],
        }
    }

    pub fn hand_id(&self) -> u64 {
        self.hand_id
    }

    pub fn hero_cards(&self) -> &[Card] {
        &self.hero_cards
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn preflop_pot_type(&self) -> PotType {
        self.preflop_pot_type
    }

    pub fn pot_type_description(&self) -> &str {
        &self.pot_type_description
    }

    /// Street implied by the community cards seen so far.
    pub fn current_street(&self) -> Street {
        self.board.street().unwrap_or(Street::Preflop)
    }

    /// Record the preflop pot type once the perception layer knows it.
    pub fn set_pot_type(&mut self, pot_type: PotType, description: impl Into<String>) {
        self.preflop_pot_type = pot_type;
        self.pot_type_description = description.into();
    }

    /// Grow the board to a later observation. Boards never shrink or change
    /// within a hand; a non-extending board is ignored.
    pub fn extend_board(&mut self, observed: &[Card]) -> bool {
        let extended = self.board.extend_to(observed);
        if !extended {
            log::warn!(
                "hand #{}: board {:?} does not extend {}, ignoring",
                self.hand_id,
                observed,
                self.board
            );
        }
        extended
    }

    /// Actions recorded on one street, in order.
    pub fn actions_on(&self, street: Street) -> impl Iterator<Item = &Action> + '_ {
        self.actions.iter().filter(move |a| a.street == street)
    }

    /// Most recent action recorded on a street.
    pub fn last_action_on(&self, street: Street) -> Option<&Action> {
        self.actions.iter().rev().find(|a| a.street == street)
    }

    /// Last action a player took on a street.
    pub fn last_action_of(&self, street: Street, player: Player) -> Option<ActionKind> {
        self.last_actions[street.index()][player.index()]
    }

    /// Whether a player has acted at all on a street.
    pub fn has_acted(&self, street: Street, player: Player) -> bool {
        self.last_action_of(street, player).is_some()
    }

    /// Validate and append an action.
    ///
    /// `street` defaults to the current street. Rejected actions leave the
    /// log untouched and are reported both as the returned `Rejection` and
    /// through `log::warn!`.
    pub fn record(
        &mut self,
        player: Player,
        kind: ActionKind,
        amount: Option<f64>,
        street: Option<Street>,
        reasoning: Option<String>,
    ) -> Result<(), Rejection> {
        let street = street.unwrap_or_else(|| self.current_street());

        if let Err(rejection) = self.check_legal(player, kind, amount, street, reasoning.is_some()) {
            log::warn!("hand #{}: rejected action: {}", self.hand_id, rejection);
            return Err(rejection);
        }

        self.actions.push(Action { street, player, kind, amount, reasoning });
        self.last_actions[street.index()][player.index()] = Some(kind);
        Ok(())
    }

    fn check_legal(
        &self,
        player: Player,
        kind: ActionKind,
        amount: Option<f64>,
        street: Street,
        has_reasoning: bool,
    ) -> Result<(), Rejection> {
        let duplicate = self
            .actions_on(street)
            .any(|a| a.player == player && a.kind == kind && same_amount(a.amount, amount));
        if duplicate {
            return Err(Rejection::Duplicate { player, kind, street });
        }

        let own_last = self.last_action_of(street, player);
        match (kind, own_last) {
            (ActionKind::Check, Some(previous)) if previous.is_aggressive() => {
                return Err(Rejection::CheckAfterAggression { player, previous, street });
            }
            (ActionKind::Bet, Some(ActionKind::Bet)) => {
                return Err(Rejection::BetAfterBet { player, street });
            }
            _ => {}
        }

        let answers_bet = matches!(kind, ActionKind::Fold | ActionKind::Call | ActionKind::Raise);
        // Inferred calls carry no reasoning and skip the opposing-bet check.
        // TODO: decide whether calls entered with reasoning should be the only
        // ones allowed through, once the reconciler no longer depends on this.
        let inferred_call = kind == ActionKind::Call && !has_reasoning;
        if answers_bet && !inferred_call {
            let facing = self
                .last_action_of(street, player.opponent())
                .is_some_and(|k| k.is_aggressive());
            if !facing {
                return Err(Rejection::NoOpposingBet { player, kind, street });
            }
        }

        Ok(())
    }
}

fn same_amount(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => (x - y).abs() < AMOUNT_EPSILON,
        (None, None) => true,
        _ => false,
    }
}
