//! Per-table session controller.
//!
//! Feeds consecutive snapshots into the current `HandRecord`, starts a new
//! record when hero's cards change, and assembles what the two decision
//! paths need: a range-driven preflop decision, or a postflop context for the
//! external reasoner.

use crate::cards::{HandAnalysis, HoleCards, Street};
use crate::config::AdvisorConfig;
use crate::decision::Decision;
use crate::equity::{EquityEngine, EquityError, EquityReport};
use crate::ledger::{format_transcript, Action, ActionKind, HandRecord, PotType};
use crate::ranges::{match_decision, PreflopEngine, RangeTable};
use crate::snapshot::{HUPosition, Player, TableSnapshot};
use rand::Rng;
use std::sync::Arc;

/// What a snapshot did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// Same table state as the previous snapshot; nothing was done.
    Unchanged,
    Updated {
        /// A new hand was started by this snapshot.
        new_hand: bool,
        /// Actions appended to the ledger while processing it.
        recorded: Vec<Action>,
    },
}

/// A hero decision waiting to be confirmed by the next snapshot.
#[derive(Debug, Clone)]
struct PendingDecision {
    decision: Decision,
    street: Street,
}

/// Everything the postflop reasoner is given.
#[derive(Debug, Clone)]
pub struct PostflopContext {
    pub hero_position: HUPosition,
    pub transcript: String,
    pub analysis: Option<HandAnalysis>,
    pub equity: Result<EquityReport, EquityError>,
    /// Share of the final pot hero must win to call, when facing a bet.
    pub pot_odds: Option<f64>,
}

impl PostflopContext {
    /// Render the context as one text block.
    pub fn render(&self) -> String {
        let mut sections = vec![format!("Hero position: {}", self.hero_position)];
        if let Some(analysis) = &self.analysis {
            sections.push(analysis.describe());
        }
        if let Some(odds) = self.pot_odds {
            sections.push(format!(
                "Pot odds: {:.2} (need {:.1}% equity to call)",
                odds,
                odds * 100.0
            ));
        }
        match &self.equity {
            Ok(report) => sections.push(report.summary()),
            Err(e) => sections.push(format!("Equity unavailable: {}", e)),
        }
        sections.push(format!("## Current Hand Action History:\n{}", self.transcript));
        sections.join("\n\n")
    }
}

/// Session over one table.
#[derive(Debug)]
pub struct Session {
    preflop: PreflopEngine,
    equity: EquityEngine,
    equity_iterations: usize,
    hand: Option<HandRecord>,
    previous: Option<TableSnapshot>,
    pending: Option<PendingDecision>,
    hands_started: u64,
}

impl Session {
    pub fn new(ranges: Arc<RangeTable>, config: &AdvisorConfig) -> Self {
        Self {
            preflop: PreflopEngine::new(Arc::clone(&ranges), config.big_blind),
            equity: EquityEngine::new(ranges).with_chunk_size(config.simulation_chunk),
            equity_iterations: config.equity_iterations,
            hand: None,
            previous: None,
            pending: None,
            hands_started: 0,
        }
    }

    /// The hand currently being tracked.
    pub fn hand(&self) -> Option<&HandRecord> {
        self.hand.as_ref()
    }

    /// The most recent snapshot.
    pub fn current(&self) -> Option<&TableSnapshot> {
        self.previous.as_ref()
    }

    /// Process the next snapshot from the table.
    pub fn observe(&mut self, snapshot: TableSnapshot) -> Observation {
        let new_hand = match &self.previous {
            None => true,
            Some(previous) => hero_mask(previous) != hero_mask(&snapshot),
        };
        if new_hand {
            self.start_hand(&snapshot);
        } else if self.previous.as_ref().is_some_and(|p| same_table(p, &snapshot)) {
            return Observation::Unchanged;
        }

        let previous = self.previous.take();
        let recorded = match self.hand.as_mut() {
            Some(hand) => {
                let start = hand.actions().len();
                update_hand(hand, self.pending.take(), previous.as_ref(), &snapshot);
                hand.actions()[start..].to_vec()
            }
            None => Vec::new(),
        };
        self.previous = Some(snapshot);

        Observation::Updated { new_hand, recorded }
    }

    fn start_hand(&mut self, snapshot: &TableSnapshot) {
        self.hands_started += 1;
        log::info!(
            "{:<32}#{} {:?}",
            "new hand",
            self.hands_started,
            snapshot.hero_cards
        );
        self.hand = Some(HandRecord::new(self.hands_started, snapshot.hero_cards.clone()));
        self.previous = None;
        self.pending = None;
    }

    /// Range-driven decision for the current preflop snapshot.
    ///
    /// The decision is remembered and recorded against the ledger when the
    /// next snapshot arrives.
    pub fn preflop_decision<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Decision {
        let Some(snapshot) = self.previous.as_ref() else {
            return Decision::wait("No snapshot observed yet");
        };
        let street = snapshot.street;
        let decision = self.preflop.decide_action(snapshot, rng);
        self.remember(decision.clone(), street);
        decision
    }

    /// Snap an externally chosen decision onto the current buttons and
    /// remember it for the ledger.
    pub fn submit_decision(&mut self, decision: Decision) -> Decision {
        let Some(snapshot) = self.previous.as_ref() else {
            return Decision::wait("No snapshot observed yet");
        };
        let street = snapshot.street;
        let matched = match_decision(decision, snapshot);
        self.remember(matched.clone(), street);
        matched
    }

    fn remember(&mut self, decision: Decision, street: Street) {
        self.pending = (!decision.is_wait()).then_some(PendingDecision { decision, street });
    }

    /// Facts for the postflop reasoner; `None` preflop or before any snapshot.
    pub fn postflop_context<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<PostflopContext> {
        let snapshot = self.previous.as_ref()?;
        let hand = self.hand.as_ref()?;
        if !snapshot.street.is_postflop() {
            return None;
        }

        let hero_position = snapshot.position_of(Player::Hero);
        let analysis = HoleCards::from_slice(&snapshot.hero_cards)
            .and_then(|hero| HandAnalysis::analyze(&hero, &snapshot.community_cards));
        let equity = self.equity.calculate_equity(
            &snapshot.hero_cards,
            &snapshot.community_cards,
            hand.preflop_pot_type(),
            hero_position,
            self.equity_iterations,
            rng,
        );

        let to_call = snapshot.bets.villain - snapshot.bets.hero;
        let pot_odds = (to_call > 0.0).then(|| to_call / (snapshot.pot_size + to_call));

        Some(PostflopContext {
            hero_position,
            transcript: format_transcript(hand),
            analysis,
            equity,
            pot_odds,
        })
    }
}

fn hero_mask(snapshot: &TableSnapshot) -> u64 {
    snapshot.hero_cards.iter().fold(0, |m, c| m | c.mask())
}

/// Whether two snapshots show the same table, ignoring stacks and turn flag.
fn same_table(a: &TableSnapshot, b: &TableSnapshot) -> bool {
    a.hero_cards == b.hero_cards
        && a.community_cards == b.community_cards
        && a.bets == b.bets
        && a.pot_size == b.pot_size
        && a.street == b.street
        && a.available_actions == b.available_actions
        && a.positions == b.positions
}

/// Apply one snapshot transition to the hand's ledger.
fn update_hand(
    hand: &mut HandRecord,
    pending: Option<PendingDecision>,
    previous: Option<&TableSnapshot>,
    current: &TableSnapshot,
) {
    if hand.preflop_pot_type() == PotType::Unknown {
        if let Some(pot_type) = current.preflop_pot_type.filter(|p| *p != PotType::Unknown) {
            let description = current.pot_type_description.clone().unwrap_or_default();
            log::info!("{:<32}{} - {}", "pot type", pot_type, description);
            hand.set_pot_type(pot_type, description);
        }
    }

    // Preflop is summarised by the pot type, so only postflop decisions are logged
    if let Some(PendingDecision { decision, street }) = pending {
        if let Some(kind) = decision.action.as_action().filter(|_| street.is_postflop()) {
            let _ = hand.record(Player::Hero, kind, decision.amount, Some(street), Some(decision.reasoning));
        }
    }

    hand.reconcile(previous, current);

    if let Some(previous) = previous.filter(|_| current.street.is_postflop()) {
        // Bets reset when the street changes
        let before = if previous.street == current.street { previous.bets.villain } else { 0.0 };
        let now = current.bets.villain;
        if now > before {
            let hero_aggressed = hand
                .last_action_of(current.street, Player::Hero)
                .is_some_and(|k| k.is_aggressive());
            let kind = if before > 0.0 || hero_aggressed { ActionKind::Raise } else { ActionKind::Bet };
            let _ = hand.record(Player::Villain, kind, Some(now), Some(current.street), None);
        }
    }

    hand.extend_board(&current.community_cards);
}
