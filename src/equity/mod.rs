//! Equity against an inferred opponent range.
//!
//! The preflop pot type and villain's seat select a named range; the range is
//! thinned into a concrete set of hand labels by one weighted draw per label,
//! expanded into combos, and handed to the Monte Carlo simulation.

pub mod simulation;

pub use simulation::{simulate, DEFAULT_CHUNK};

use crate::cards::{Card, CardParseError, HoleCards};
use crate::ledger::PotType;
use crate::ranges::{HandLabel, Range, RangeName, RangeTable};
use crate::snapshot::HUPosition;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Why an equity estimate could not be produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EquityError {
    #[error("card could not be converted: {0}")]
    CardConversion(#[from] CardParseError),
    #[error("hero hand needs exactly 2 cards, got {0}")]
    InvalidHeroHand(usize),
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
    #[error("{0} board cards is not a legal board")]
    BoardLength(usize),
    #[error("no villain combo survives the known cards, even after falling back to AA")]
    EmptyRange,
    #[error("iteration count must be positive")]
    NoIterations,
}

/// Equity summary handed to the postflop reasoner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityReport {
    /// Hero's share of the pot at showdown, in [0, 1].
    pub equity: f64,
    pub equity_percentage: f64,
    pub range_description: String,
    /// Labels that survived thinning, comma separated.
    pub villain_range: String,
    pub iterations: usize,
}

impl EquityReport {
    pub fn equity_percentage(&self) -> f64 {
        self.equity_percentage
    }

    /// Short text block for the reasoner.
    pub fn summary(&self) -> String {
        format!(
            "Equity vs. range: {:.2}%\nVillain range: {}\nBased on {} Monte Carlo simulations",
            self.equity_percentage, self.range_description, self.iterations
        )
    }
}

/// Pick villain's range from the pot type and villain's seat.
pub fn select_range(pot_type: PotType, villain_position: HUPosition) -> (RangeName, String) {
    let villain_bb = villain_position == HUPosition::BB;
    let name = match pot_type {
        PotType::TwoBet if villain_bb => RangeName::BbCall,
        PotType::TwoBet => RangeName::SbOpen,
        PotType::ThreeBet if villain_bb => RangeName::Bb3Bet,
        PotType::ThreeBet => RangeName::SbCallVs3Bet,
        PotType::FourBet if villain_bb => RangeName::BbCallVs4Bet,
        PotType::FourBet => RangeName::Sb4Bet,
        // Widest opening range for the seat
        PotType::Unknown if villain_bb => RangeName::BbCall,
        PotType::Unknown => RangeName::SbOpen,
    };
    let readable = name.as_str().replace('_', " ");
    let description = match pot_type {
        PotType::Unknown => format!("Default range for villain's seat ({})", readable),
        _ => format!("Based on preflop action ({})", readable),
    };
    (name, description)
}

/// Draw a concrete label set: each label is kept with probability equal to
/// its weight. An empty draw falls back to `{AA, KK, QQ}`.
pub fn thin<R: Rng + ?Sized>(range: &Range, rng: &mut R) -> Vec<HandLabel> {
    let kept: Vec<HandLabel> = range
        .iter()
        .filter(|(_, weight)| rng.gen::<f64>() < *weight)
        .map(|(label, _)| label)
        .collect();
    if kept.is_empty() {
        log::debug!("thinned range came out empty, using AA,KK,QQ");
        return Range::equity_fallback().iter().map(|(label, _)| label).collect();
    }
    kept
}

/// Combos of `labels` that avoid the dead cards.
fn expand(labels: &[HandLabel], dead: u64) -> Vec<HoleCards> {
    labels.iter().flat_map(|label| label.combos(dead)).collect()
}

/// Equity calculator backed by the shared range table.
#[derive(Debug, Clone)]
pub struct EquityEngine {
    ranges: Arc<RangeTable>,
    chunk_size: usize,
}

impl EquityEngine {
    pub fn new(ranges: Arc<RangeTable>) -> Self {
        Self { ranges, chunk_size: DEFAULT_CHUNK }
    }

    /// Builder method: set the iterations per parallel chunk.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Estimate hero's equity against villain's inferred range.
    pub fn calculate_equity<R: Rng + ?Sized>(
        &self,
        hero_cards: &[Card],
        board: &[Card],
        pot_type: PotType,
        hero_position: HUPosition,
        iterations: usize,
        rng: &mut R,
    ) -> Result<EquityReport, EquityError> {
        let report = self.try_calculate(hero_cards, board, pot_type, hero_position, iterations, rng);
        match &report {
            Ok(r) => log::info!(
                "{:<32}{:<12.2}{}",
                "equity",
                r.equity_percentage,
                r.range_description
            ),
            Err(e) => log::warn!("equity calculation failed: {}", e),
        }
        report
    }

    /// Same as `calculate_equity`, starting from card text as reported by the
    /// perception layer.
    pub fn calculate_equity_from_text<R: Rng + ?Sized>(
        &self,
        hero_cards: &[&str],
        board: &[&str],
        pot_type: PotType,
        hero_position: HUPosition,
        iterations: usize,
        rng: &mut R,
    ) -> Result<EquityReport, EquityError> {
        let convert = |cards: &[&str]| -> Result<Vec<Card>, EquityError> {
            cards.iter().map(|s| s.parse::<Card>().map_err(EquityError::from)).collect()
        };
        let converted = convert(hero_cards).and_then(|hero| Ok((hero, convert(board)?)));
        match converted {
            Ok((hero, board)) => self.calculate_equity(&hero, &board, pot_type, hero_position, iterations, rng),
            Err(e) => {
                log::warn!("equity calculation failed: {}", e);
                Err(e)
            }
        }
    }

    fn try_calculate<R: Rng + ?Sized>(
        &self,
        hero_cards: &[Card],
        board: &[Card],
        pot_type: PotType,
        hero_position: HUPosition,
        iterations: usize,
        rng: &mut R,
    ) -> Result<EquityReport, EquityError> {
        let hero = match hero_cards {
            [a, b] if a != b => HoleCards::new(*a, *b),
            [a, _] => return Err(EquityError::DuplicateCard(*a)),
            _ => return Err(EquityError::InvalidHeroHand(hero_cards.len())),
        };
        if !matches!(board.len(), 0 | 3 | 4 | 5) {
            return Err(EquityError::BoardLength(board.len()));
        }
        let mut dead = hero.mask();
        for card in board {
            if dead & card.mask() != 0 {
                return Err(EquityError::DuplicateCard(*card));
            }
            dead |= card.mask();
        }
        if iterations == 0 {
            return Err(EquityError::NoIterations);
        }

        let (name, range_description) = select_range(pot_type, hero_position.opponent());
        let equity_fallback;
        let range = match self.ranges.get(name) {
            loaded if loaded.is_fallback() => {
                log::warn!("range '{}' was not loaded, assuming AA,KK,QQ", name);
                equity_fallback = Range::equity_fallback();
                &equity_fallback
            }
            loaded => loaded,
        };

        let mut labels = thin(range, rng);
        let mut combos = expand(&labels, dead);
        if combos.is_empty() {
            log::warn!("no combos left for {:?}, falling back to AA", labels);
            labels = vec![HandLabel::pair(crate::cards::card::RANK_A)];
            combos = expand(&labels, dead);
        }

        let equity = simulate(&hero, board, &combos, iterations, self.chunk_size, rng)
            .ok_or(EquityError::EmptyRange)?;

        Ok(EquityReport {
            equity,
            equity_percentage: equity * 100.0,
            range_description,
            villain_range: labels.iter().map(|l| l.to_string()).collect::<Vec<_>>().join(","),
            iterations,
        })
    }
}
