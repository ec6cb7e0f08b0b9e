//! Made-hand and draw analysis for the postflop reasoner.
//!
//! The reasoner is told what hero actually holds (pair strength, flush and
//! straight draws) so it does not have to work it out from raw cards.

use super::card::{Card, HoleCards, RANK_CHARS};
use super::evaluator::{find_straight, HandCategory, HandEvaluator};
use serde::Serialize;
use std::fmt;

/// Where hero's pair sits relative to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PairStrength {
    Overpair,
    Underpair,
    /// Pocket pair with the same rank as the highest board card.
    PocketPairWithTopCard,
    TopPair,
    SecondPair,
    ThirdPair,
    BottomPair,
}

impl fmt::Display for PairStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PairStrength::Overpair => "Overpair",
            PairStrength::Underpair => "Underpair",
            PairStrength::PocketPairWithTopCard => "Pocket pair with top card",
            PairStrength::TopPair => "Top pair",
            PairStrength::SecondPair => "Second pair",
            PairStrength::ThirdPair => "Third pair",
            PairStrength::BottomPair => "Bottom pair",
        };
        f.write_str(s)
    }
}

/// Flush draw state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlushDraw {
    None,
    /// Three to a flush on the flop, using at least one hole card.
    Backdoor,
    /// Four to a flush, using at least one hole card.
    Draw,
}

/// Straight draw state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StraightDraw {
    None,
    Backdoor,
    /// Ranks (as characters) that complete the straight.
    Gutshot { needs: char },
    OpenEnded { needs: Vec<char> },
}

/// Summary of hero's hand on the current board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandAnalysis {
    pub category: Option<HandCategory>,
    pub pair: Option<PairStrength>,
    pub flush_draw: FlushDraw,
    pub straight_draw: StraightDraw,
}

impl HandAnalysis {
    /// Analyse hero's hole cards against 3 to 5 board cards.
    ///
    /// Returns `None` preflop: there is nothing to analyse without a board.
    pub fn analyze(hero: &HoleCards, board: &[Card]) -> Option<Self> {
        if board.len() < 3 {
            return None;
        }

        let category = HandEvaluator::new()
            .evaluate_hand(hero, board)
            .map(|rank| rank.category());
        let pair = match category {
            Some(HandCategory::OnePair) => pair_strength(hero, board),
            _ => None,
        };

        // Completed hands have no draws worth reporting
        if category.is_some_and(|c| c >= HandCategory::Straight) {
            return Some(Self {
                category,
                pair,
                flush_draw: FlushDraw::None,
                straight_draw: StraightDraw::None,
            });
        }

        Some(Self {
            category,
            pair,
            flush_draw: flush_draw(hero, board),
            straight_draw: straight_draw(hero, board),
        })
    }

    /// Render as the text block handed to the reasoner.
    pub fn describe(&self) -> String {
        let mut lines = vec!["## Hand Analysis:".to_string()];
        if let Some(category) = self.category {
            lines.push(format!("- Current hand: {}", category));
        }
        if let Some(pair) = self.pair {
            lines.push(format!("- Pair strength: {}", pair));
        }
        lines.push(match self.flush_draw {
            FlushDraw::Draw => "- Flush draw: Yes".to_string(),
            FlushDraw::Backdoor => "- Backdoor flush draw: Yes".to_string(),
            FlushDraw::None => "- Flush draw: No".to_string(),
        });
        lines.push(match &self.straight_draw {
            StraightDraw::OpenEnded { needs } => {
                let needs: Vec<String> = needs.iter().map(|c| c.to_string()).collect();
                format!("- Straight draw: Yes - open-ended (needs: {})", needs.join(", "))
            }
            StraightDraw::Gutshot { needs } => format!("- Straight draw: Yes - gutshot (needs: {})", needs),
            StraightDraw::Backdoor => "- Backdoor straight draw: Yes".to_string(),
            StraightDraw::None => "- Straight draw: No".to_string(),
        });
        lines.join("\n")
    }
}

fn pair_strength(hero: &HoleCards, board: &[Card]) -> Option<PairStrength> {
    let mut board_ranks: Vec<u8> = board.iter().map(|c| c.rank()).collect();
    board_ranks.sort_unstable_by(|a, b| b.cmp(a));
    board_ranks.dedup();
    let top = *board_ranks.first()?;

    if hero.is_pair() {
        let rank = hero.card1.rank();
        return Some(match rank.cmp(&top) {
            std::cmp::Ordering::Greater => PairStrength::Overpair,
            std::cmp::Ordering::Less => PairStrength::Underpair,
            std::cmp::Ordering::Equal => PairStrength::PocketPairWithTopCard,
        });
    }

    // card1 is the higher hole card, so the best pairing is found first
    hero.cards().iter().find_map(|c| {
        board_ranks.iter().position(|&r| r == c.rank()).map(|i| match i {
            0 => PairStrength::TopPair,
            1 => PairStrength::SecondPair,
            2 => PairStrength::ThirdPair,
            _ => PairStrength::BottomPair,
        })
    })
}

fn flush_draw(hero: &HoleCards, board: &[Card]) -> FlushDraw {
    let mut counts = [0u8; 4];
    for card in hero.cards().iter().chain(board) {
        counts[card.suit() as usize] += 1;
    }

    let hero_suits = [hero.card1.suit(), hero.card2.suit()];
    let uses_hero = |suit: usize| hero_suits.contains(&(suit as u8));

    if (0..4).any(|s| counts[s] >= 4 && uses_hero(s)) {
        FlushDraw::Draw
    } else if board.len() == 3 && (0..4).any(|s| counts[s] == 3 && uses_hero(s)) {
        FlushDraw::Backdoor
    } else {
        FlushDraw::None
    }
}

fn straight_draw(hero: &HoleCards, board: &[Card]) -> StraightDraw {
    let bits = hero
        .cards()
        .iter()
        .chain(board)
        .fold(0u16, |b, c| b | (1 << c.rank()));

    // Ranks that would complete a straight if they came next
    let outs: Vec<u8> = (0..13u8)
        .rev()
        .filter(|&r| bits & (1 << r) == 0 && find_straight(bits | (1 << r)).is_some())
        .collect();

    match outs.as_slice() {
        [] => {}
        [single] => return StraightDraw::Gutshot { needs: RANK_CHARS[*single as usize] },
        many => {
            return StraightDraw::OpenEnded {
                needs: many.iter().map(|&r| RANK_CHARS[r as usize]).collect(),
            }
        }
    }

    // Backdoor: on the flop, three ranks inside a five-rank window
    if board.len() == 3 {
        // Shift up one so the ace can also sit below the deuce
        let ace_low = (bits << 1) | ((bits >> 12) & 1);
        for low in 0..10u32 {
            if ((ace_low >> low) & 0b11111).count_ones() >= 3 {
                return StraightDraw::Backdoor;
            }
        }
    }

    StraightDraw::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::card::parse_cards;

    fn analyze(hero: &str, board: &str) -> HandAnalysis {
        let hero = HoleCards::from_slice(&parse_cards(hero).unwrap()).unwrap();
        HandAnalysis::analyze(&hero, &parse_cards(board).unwrap()).unwrap()
    }

    #[test]
    fn test_pair_strength() {
        assert_eq!(analyze("Ah Tc", "Ad Ks 2h").pair, Some(PairStrength::TopPair));
        assert_eq!(analyze("Kh 8c", "As Kd 4c").pair, Some(PairStrength::SecondPair));
        assert_eq!(analyze("Qh Qc", "Js 9d 2h").pair, Some(PairStrength::Overpair));
        assert_eq!(analyze("5h 5c", "Js 9d 2h").pair, Some(PairStrength::Underpair));
        assert_eq!(analyze("9h 9c", "Ad 9d 2h").category, Some(HandCategory::ThreeOfAKind));
        assert_eq!(analyze("Ah 9c", "Ad 9d 2h").pair, None);
    }

    #[test]
    fn test_flush_draws() {
        assert_eq!(analyze("Ah 9h", "Kh 2h 5s").flush_draw, FlushDraw::Draw);
        assert_eq!(analyze("As 3s", "Ks 7d 9c").flush_draw, FlushDraw::Backdoor);
        assert_eq!(analyze("As 3d", "Ks 7d 9c").flush_draw, FlushDraw::None);
        // Completed flush reports no draw
        let flush = analyze("Ah Jh", "2h 5h 9h");
        assert_eq!(flush.category, Some(HandCategory::Flush));
        assert_eq!(flush.flush_draw, FlushDraw::None);
    }

    #[test]
    fn test_straight_draws() {
        assert_eq!(
            analyze("8h 9c", "7s Td 2h").straight_draw,
            StraightDraw::OpenEnded { needs: vec!['J', '6'] }
        );
        assert_eq!(analyze("8h Tc", "7s Jd 2h").straight_draw, StraightDraw::Gutshot { needs: '9' });
        assert_eq!(analyze("Ah 2c", "3d 4s 8c").straight_draw, StraightDraw::Gutshot { needs: '5' });
        assert_eq!(analyze("Ad 9s", "Jh 6c 5s").straight_draw, StraightDraw::Backdoor);
        assert_eq!(analyze("9h Tc", "7s 8d Jh").category, Some(HandCategory::Straight));
    }

    #[test]
    fn test_preflop_has_no_analysis() {
        let hero = HoleCards::from_slice(&parse_cards("AhKh").unwrap()).unwrap();
        assert!(HandAnalysis::analyze(&hero, &[]).is_none());
    }

    #[test]
    fn test_describe_lists_draws() {
        let text = analyze("Ah 9h", "Kh 2h 5s").describe();
        assert!(text.contains("- Current hand: High Card"));
        assert!(text.contains("- Flush draw: Yes"));
        assert!(text.contains("- Backdoor straight draw: Yes"));
    }
}
