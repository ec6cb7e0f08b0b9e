//! Preflop decisions from static ranges.
//!
//! A snapshot is classified into a `PreflopNode` by an ordered rule table;
//! each node names the ranges to consult (aggression first, then call), and
//! the chosen abstract action is mapped onto a button the table offers.

use super::label::HandLabel;
use super::table::{Range, RangeName, RangeTable};
use crate::cards::{HoleCards, Street};
use crate::decision::{Decision, DecisionKind};
use crate::snapshot::{HUPosition, Player, TableSnapshot};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Tolerance for comparing chip amounts read off the screen.
const AMOUNT_EPSILON: f64 = 1e-6;

/// Preflop betting situation from hero's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreflopNode {
    SbOpen,
    BbDefense,
    SbVs3Bet,
    BbVs4Bet,
    SbVs5Bet,
    Unknown,
    NotPreflop,
}

impl PreflopNode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreflopNode::SbOpen => "sb_open",
            PreflopNode::BbDefense => "bb_defense",
            PreflopNode::SbVs3Bet => "sb_vs_3bet",
            PreflopNode::BbVs4Bet => "bb_vs_4bet",
            PreflopNode::SbVs5Bet => "sb_vs_5bet",
            PreflopNode::Unknown => "unknown",
            PreflopNode::NotPreflop => "not_preflop",
        }
    }

    /// Ranges consulted at this node: `(aggression, call)`.
    pub fn ranges(&self) -> (Option<RangeName>, Option<RangeName>) {
        match self {
            PreflopNode::SbOpen => (Some(RangeName::SbOpen), None),
            PreflopNode::BbDefense => (Some(RangeName::Bb3Bet), Some(RangeName::BbCall)),
            PreflopNode::SbVs3Bet => (Some(RangeName::Sb4Bet), Some(RangeName::SbCallVs3Bet)),
            PreflopNode::BbVs4Bet => (Some(RangeName::Bb5Bet), Some(RangeName::BbCallVs4Bet)),
            PreflopNode::SbVs5Bet => (None, Some(RangeName::SbCallVs5Bet)),
            PreflopNode::Unknown | PreflopNode::NotPreflop => (None, None),
        }
    }
}

impl fmt::Display for PreflopNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detector for one node: receives the snapshot and the big blind size.
type Detector = fn(&TableSnapshot, f64) -> bool;

/// Classification rules, tried in order; the first match wins.
///
/// `BbVs4Bet` and `SbVs5Bet` have ranges but no detector yet. Recognising
/// them needs the raise ladder (who raised how many times), which a single
/// snapshot does not carry; adding them is a new row here.
const NODE_RULES: &[(PreflopNode, Detector)] = &[
    (PreflopNode::SbOpen, is_sb_open),
    (PreflopNode::BbDefense, is_bb_defense),
    (PreflopNode::SbVs3Bet, is_sb_vs_3bet),
];

fn same_amount(a: f64, b: f64) -> bool {
    (a - b).abs() < AMOUNT_EPSILON
}

fn hero_seat(snapshot: &TableSnapshot) -> HUPosition {
    snapshot.position_of(Player::Hero)
}

/// Hero in the SB, villain still shows just the big blind.
fn is_sb_open(snapshot: &TableSnapshot, big_blind: f64) -> bool {
    hero_seat(snapshot) == HUPosition::SB && same_amount(snapshot.bets.villain, big_blind)
}

/// Hero in the BB with only the blind in, facing a bet.
fn is_bb_defense(snapshot: &TableSnapshot, big_blind: f64) -> bool {
    hero_seat(snapshot) == HUPosition::BB
        && snapshot.bets.villain > 0.0
        && same_amount(snapshot.bets.hero, big_blind)
}

/// Hero in the SB has already raised and faces a re-raise.
fn is_sb_vs_3bet(snapshot: &TableSnapshot, big_blind: f64) -> bool {
    hero_seat(snapshot) == HUPosition::SB
        && snapshot.bets.villain > snapshot.bets.hero
        && snapshot.bets.hero > 0.5 * big_blind
}

/// Whether `label` is in `range`, and with which weight.
///
/// The exact label is tried first, then the bare rank pair (`"AKs"` falls
/// back to `"AK"`).
pub fn membership(label: &HandLabel, range: &Range) -> (bool, f64) {
    if let Some(weight) = range.weight(label) {
        return (true, weight);
    }
    match label.bare().and_then(|bare| range.weight(&bare)) {
        Some(weight) => (true, weight),
        None => (false, 0.0),
    }
}

/// Whether to play `label` from `range`.
///
/// Weight 1 always plays and weight 0 never does; anything in between costs
/// exactly one Bernoulli draw from `rng`.
pub fn decide<R: Rng + ?Sized>(label: &HandLabel, range: &Range, rng: &mut R) -> bool {
    match membership(label, range) {
        (false, _) => false,
        (true, weight) if weight >= 1.0 => true,
        (true, weight) if weight <= 0.0 => false,
        (true, weight) => rng.gen::<f64>() < weight,
    }
}

/// Range-driven preflop decision maker.
#[derive(Debug, Clone)]
pub struct PreflopEngine {
    ranges: Arc<RangeTable>,
    big_blind: f64,
}

impl PreflopEngine {
    pub fn new(ranges: Arc<RangeTable>, big_blind: f64) -> Self {
        Self { ranges, big_blind }
    }

    pub fn ranges(&self) -> &RangeTable {
        &self.ranges
    }

    /// Classify the preflop betting node of a snapshot.
    pub fn classify_situation(&self, snapshot: &TableSnapshot) -> PreflopNode {
        if snapshot.street != Street::Preflop {
            return PreflopNode::NotPreflop;
        }
        NODE_RULES
            .iter()
            .find(|(_, detect)| detect(snapshot, self.big_blind))
            .map(|(node, _)| *node)
            .unwrap_or(PreflopNode::Unknown)
    }

    /// Choose hero's preflop action.
    pub fn decide_action<R: Rng + ?Sized>(&self, snapshot: &TableSnapshot, rng: &mut R) -> Decision {
        if !snapshot.is_hero_turn {
            return Decision::wait("Not our turn");
        }
        let Some(hole_cards) = HoleCards::from_slice(&snapshot.hero_cards) else {
            log::warn!(
                "hero hand has {} readable cards, skipping decision",
                snapshot.hero_cards.len()
            );
            return Decision::wait("Hero hand not readable");
        };

        let node = self.classify_situation(snapshot);
        if node == PreflopNode::NotPreflop {
            return Decision::wait("Postflop spots are left to the reasoner");
        }

        let label = HandLabel::of(&hole_cards);
        let actions = &snapshot.available_actions;
        let (aggression, call) = node.ranges();

        if let Some(name) = aggression {
            if decide(&label, self.ranges.get(name), rng) {
                let reasoning = format!("{} in {} range ({})", label, name, node);
                if let Some(option) = actions.min_raise() {
                    return Decision::new(DecisionKind::Raise, reasoning)
                        .with_amount(option.value)
                        .with_position(Some(option.position));
                }
                if let Some(option) = actions.min_bet() {
                    return Decision::new(DecisionKind::Bet, reasoning)
                        .with_amount(option.value)
                        .with_position(Some(option.position));
                }
                log::debug!("{} wants to raise at {} but no size is offered", label, node);
            }
        }

        if let Some(name) = call {
            let (member, _) = membership(&label, self.ranges.get(name));
            if member {
                let reasoning = format!("{} in {} range ({})", label, name, node);
                if actions.call.available {
                    return Decision::new(DecisionKind::Call, reasoning).with_position(actions.call.position);
                }
                if actions.check.available {
                    return Decision::new(DecisionKind::Check, reasoning).with_position(actions.check.position);
                }
            }
        }

        let reasoning = format!("{} not in any range for {}", label, node);
        if actions.fold.available {
            Decision::new(DecisionKind::Fold, reasoning).with_position(actions.fold.position)
        } else if actions.check.available {
            Decision::new(DecisionKind::Check, reasoning).with_position(actions.check.position)
        } else {
            log::warn!("no legal action offered at {}", node);
            Decision::wait("No legal action offered")
        }
    }
}

/// Snap an externally chosen decision onto the buttons the table offers.
///
/// FOLD, CALL and CHECK pass through when their button is available; RAISE
/// and BET move to the offered size closest to the requested amount. Anything
/// that cannot be honoured degrades to FOLD, then CHECK, then WAIT.
pub fn match_decision(mut decision: Decision, snapshot: &TableSnapshot) -> Decision {
    let actions = &snapshot.available_actions;
    let button = match decision.action {
        DecisionKind::Fold => Some(actions.fold),
        DecisionKind::Call => Some(actions.call),
        DecisionKind::Check => Some(actions.check),
        DecisionKind::Raise | DecisionKind::Bet | DecisionKind::Wait => None,
    };
    if let Some(button) = button {
        if button.available {
            decision.position = button.position;
            return decision;
        }
    }

    let sized = match decision.action {
        DecisionKind::Raise => actions.closest_raise(decision.amount.unwrap_or(0.0)),
        DecisionKind::Bet => actions.closest_bet(decision.amount.unwrap_or(0.0)),
        _ => None,
    };
    if let Some(option) = sized {
        decision.amount = Some(option.value);
        decision.position = Some(option.position);
        return decision;
    }

    if decision.is_wait() {
        return decision;
    }

    log::warn!("{} is not available, degrading", decision.action);
    let original = decision.action;
    if actions.fold.available {
        Decision::new(
            DecisionKind::Fold,
            format!("Original action ({}) not available, defaulting to fold", original),
        )
        .with_position(actions.fold.position)
    } else if actions.check.available {
        Decision::new(
            DecisionKind::Check,
            format!("Original action ({}) not available, defaulting to check", original),
        )
        .with_position(actions.check.position)
    } else {
        Decision::wait("No valid action available")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::tests::snapshot;
    use crate::snapshot::{ButtonState, Positions, ScreenPos, SizedOption};
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn label(s: &str) -> HandLabel {
        s.parse().unwrap()
    }

    fn engine(entries: &[(RangeName, &str)]) -> PreflopEngine {
        let table = RangeTable::from_ranges(
            entries
                .iter()
                .map(|(name, text)| (*name, Range::parse(text).unwrap())),
        );
        PreflopEngine::new(Arc::new(table), 1.0)
    }

    fn sb_open_spot(hero: &str) -> TableSnapshot {
        let mut snap = snapshot(hero, "", Positions::hero_sb());
        snap.bets.hero = 0.5;
        snap.bets.villain = 1.0;
        snap.available_actions.fold = ButtonState::at(100, 900);
        snap.available_actions.call = ButtonState::at(300, 900);
        snap.available_actions.raises = vec![
            SizedOption { value: 3.0, position: ScreenPos(600, 900) },
            SizedOption { value: 2.0, position: ScreenPos(500, 900) },
        ];
        snap
    }

    #[test]
    fn test_membership_exact_then_bare() {
        let range = Range::parse("AKs:0.5,AQ,KK").unwrap();
        assert_eq!(membership(&label("AKs"), &range), (true, 0.5));
        assert_eq!(membership(&label("AQo"), &range), (true, 1.0));
        assert_eq!(membership(&label("AQs"), &range), (true, 1.0));
        assert_eq!(membership(&label("KK"), &range), (true, 1.0));
        assert_eq!(membership(&label("AKo"), &range), (false, 0.0));
    }

    #[test]
    fn test_decide_extreme_weights_are_deterministic() {
        let range = Range::parse("AA,72o:0").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            assert!(decide(&label("AA"), &range, &mut rng));
            assert!(!decide(&label("72o"), &range, &mut rng));
            assert!(!decide(&label("KK"), &range, &mut rng));
        }
    }

    #[test]
    fn test_decide_uses_injected_rng() {
        let range = Range::parse("A5s:0.5").unwrap();
        assert!(decide(&label("A5s"), &range, &mut StepRng::new(0, 0)));
        assert!(!decide(&label("A5s"), &range, &mut StepRng::new(u64::MAX, 0)));
    }

    #[test]
    fn test_classify_situation() {
        let engine = engine(&[]);
        assert_eq!(engine.classify_situation(&sb_open_spot("AhKd")), PreflopNode::SbOpen);

        let mut defense = snapshot("AhKd", "", Positions::hero_bb());
        defense.bets.hero = 1.0;
        defense.bets.villain = 2.5;
        assert_eq!(engine.classify_situation(&defense), PreflopNode::BbDefense);

        let mut vs_3bet = snapshot("AhKd", "", Positions::hero_sb());
        vs_3bet.bets.hero = 2.5;
        vs_3bet.bets.villain = 8.0;
        assert_eq!(engine.classify_situation(&vs_3bet), PreflopNode::SbVs3Bet);

        let mut limped = snapshot("AhKd", "", Positions::hero_bb());
        limped.bets.hero = 2.5;
        limped.bets.villain = 8.0;
        assert_eq!(engine.classify_situation(&limped), PreflopNode::Unknown);
    }

    #[test]
    fn test_not_preflop_ignores_other_fields() {
        let engine = engine(&[]);
        let mut flop = sb_open_spot("AhKd");
        flop.community_cards = crate::cards::parse_cards("2c3c4c").unwrap();
        flop.street = Street::Flop;
        assert_eq!(engine.classify_situation(&flop), PreflopNode::NotPreflop);
        assert!(engine.decide_action(&flop, &mut StepRng::new(0, 0)).is_wait());
    }

    #[test]
    fn test_sb_open_raises_minimum() {
        let engine = engine(&[(RangeName::SbOpen, "AK,QQ")]);
        let decision = engine.decide_action(&sb_open_spot("AhKd"), &mut StepRng::new(0, 0));
        assert_eq!(decision.action, DecisionKind::Raise);
        assert_eq!(decision.amount, Some(2.0));
        assert_eq!(decision.position, Some(ScreenPos(500, 900)));
    }

    #[test]
    fn test_out_of_range_folds() {
        let engine = engine(&[(RangeName::SbOpen, "AK,QQ")]);
        let decision = engine.decide_action(&sb_open_spot("7h2d"), &mut StepRng::new(0, 0));
        assert_eq!(decision.action, DecisionKind::Fold);
        assert_eq!(decision.position, Some(ScreenPos(100, 900)));

        let mut no_fold = sb_open_spot("7h2d");
        no_fold.available_actions.fold = ButtonState::default();
        no_fold.available_actions.check = ButtonState::at(200, 900);
        assert_eq!(engine.decide_action(&no_fold, &mut StepRng::new(0, 0)).action, DecisionKind::Check);

        no_fold.available_actions.check = ButtonState::default();
        assert!(engine.decide_action(&no_fold, &mut StepRng::new(0, 0)).is_wait());
    }

    #[test]
    fn test_bb_defense_precedence() {
        let engine = engine(&[(RangeName::Bb3Bet, "AA,A5s:0.5"), (RangeName::BbCall, "A5s,KQ")]);
        let mut spot = snapshot("Ah5h", "", Positions::hero_bb());
        spot.bets.hero = 1.0;
        spot.bets.villain = 2.5;
        spot.available_actions.fold = ButtonState::at(1, 1);
        spot.available_actions.call = ButtonState::at(2, 2);
        spot.available_actions.raises = vec![SizedOption { value: 8.0, position: ScreenPos(3, 3) }];

        // Draw succeeds: 3-bet
        assert_eq!(engine.decide_action(&spot, &mut StepRng::new(0, 0)).action, DecisionKind::Raise);
        // Draw fails: falls through to the call range
        let call = engine.decide_action(&spot, &mut StepRng::new(u64::MAX, 0));
        assert_eq!(call.action, DecisionKind::Call);
        assert_eq!(call.position, Some(ScreenPos(2, 2)));
    }

    #[test]
    fn test_waits_off_turn_and_on_bad_hand() {
        let engine = engine(&[(RangeName::SbOpen, "AK")]);
        let mut spot = sb_open_spot("AhKd");
        spot.is_hero_turn = false;
        assert!(engine.decide_action(&spot, &mut StepRng::new(0, 0)).is_wait());

        let mut one_card = sb_open_spot("Ah");
        one_card.is_hero_turn = true;
        assert!(engine.decide_action(&one_card, &mut StepRng::new(0, 0)).is_wait());
    }

    #[test]
    fn test_match_decision_snaps_sizes() {
        let spot = sb_open_spot("AhKd");
        let raise = match_decision(Decision::new(DecisionKind::Raise, "x").with_amount(2.8), &spot);
        assert_eq!(raise.amount, Some(3.0));
        assert_eq!(raise.position, Some(ScreenPos(600, 900)));

        let call = match_decision(Decision::new(DecisionKind::Call, "x"), &spot);
        assert_eq!(call.position, Some(ScreenPos(300, 900)));

        // No bet buttons offered: degrade to fold
        let bet = match_decision(Decision::new(DecisionKind::Bet, "x").with_amount(4.0), &spot);
        assert_eq!(bet.action, DecisionKind::Fold);
        assert!(bet.reasoning.contains("BET"));
    }
}
