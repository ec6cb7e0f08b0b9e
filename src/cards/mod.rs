//! Cards, hand evaluation and made-hand analysis.
//!
//! ## Modules
//!
//! - `card`: Card, hole cards, board, deck and street
//! - `evaluator`: 5-7 card hand ranking
//! - `analysis`: Pair strength and draw detection for the postflop reasoner

pub mod card;
pub mod evaluator;
pub mod analysis;

pub use card::{parse_cards, Board, Card, CardParseError, Deck, HoleCards, Street};
pub use evaluator::{HandCategory, HandEvaluator, HandRank};
pub use analysis::HandAnalysis;
