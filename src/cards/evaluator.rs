//! Poker hand evaluation.
//!
//! Ranks 5, 6 or 7 cards directly from rank counts, suit counts and rank
//! bitmasks, without enumerating 5-card subsets.

use super::card::{Card, HoleCards};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Hand rank categories, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl HandCategory {
    /// Get the category name.
    pub fn name(&self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
        }
    }

    fn from_bits(bits: u32) -> Self {
        match bits {
            1 => HandCategory::OnePair,
            2 => HandCategory::TwoPair,
            3 => HandCategory::ThreeOfAKind,
            4 => HandCategory::Straight,
            5 => HandCategory::Flush,
            6 => HandCategory::FullHouse,
            7 => HandCategory::FourOfAKind,
            8 => HandCategory::StraightFlush,
            _ => HandCategory::HighCard,
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A hand rank that can be compared.
/// Higher values are better hands.
/// Format: category (4 bits) | kicker1 (4 bits) | kicker2 (4 bits) | ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandRank(u32);

impl HandRank {
    fn new(category: HandCategory, kickers: &[u8]) -> Self {
        let mut value = (category as u32) << 20;
        for (i, &k) in kickers.iter().take(5).enumerate() {
            value |= (k as u32) << (16 - i * 4);
        }
        Self(value)
    }

    /// Get the hand category.
    pub fn category(&self) -> HandCategory {
        HandCategory::from_bits(self.0 >> 20)
    }
}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

/// Hand evaluator for poker hands.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandEvaluator;

impl HandEvaluator {
    /// Create a new hand evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Evaluate the best 5-card hand contained in 5 to 7 cards.
    ///
    /// Returns `None` for fewer than 5 or more than 7 cards.
    pub fn evaluate(&self, cards: &[Card]) -> Option<HandRank> {
        if !(5..=7).contains(&cards.len()) {
            return None;
        }

        let mut rank_counts = [0u8; 13];
        let mut suit_bits = [0u16; 4];
        let mut rank_bits = 0u16;

        for card in cards {
            rank_counts[card.rank() as usize] += 1;
            suit_bits[card.suit() as usize] |= 1 << card.rank();
            rank_bits |= 1 << card.rank();
        }

        let paired = self.paired_rank(&rank_counts);

        // Flush (at most one suit can hold five of seven cards)
        if let Some(&flush_bits) = suit_bits.iter().find(|b| b.count_ones() >= 5) {
            if let Some(high) = find_straight(flush_bits) {
                return Some(HandRank::new(HandCategory::StraightFlush, &[high]));
            }
            let top: Vec<u8> = ranks_desc(flush_bits).take(5).collect();
            return Some(HandRank::new(HandCategory::Flush, &top));
        }

        // Quads and full houses outrank any straight
        if let Some(rank) = paired.filter(|r| r.category() > HandCategory::Straight) {
            return Some(rank);
        }

        if let Some(high) = find_straight(rank_bits) {
            return Some(HandRank::new(HandCategory::Straight, &[high]));
        }

        Some(paired.unwrap_or_else(|| {
            let top: Vec<u8> = ranks_desc(rank_bits).take(5).collect();
            HandRank::new(HandCategory::HighCard, &top)
        }))
    }

    /// Rank made from rank multiplicities: quads, full house, trips, two pair
    /// or one pair. `None` when every rank is a single.
    fn paired_rank(&self, rank_counts: &[u8; 13]) -> Option<HandRank> {
        let mut quads = Vec::new();
        let mut trips = Vec::new();
        let mut pairs = Vec::new();
        let mut singles = Vec::new();

        for rank in (0..13u8).rev() {
            match rank_counts[rank as usize] {
                4 => quads.push(rank),
                3 => trips.push(rank),
                2 => pairs.push(rank),
                1 => singles.push(rank),
                _ => {}
            }
        }

        if let Some(&quad) = quads.first() {
            let kicker = (0..13u8)
                .rev()
                .find(|&r| r != quad && rank_counts[r as usize] > 0)
                .unwrap_or(0);
            return Some(HandRank::new(HandCategory::FourOfAKind, &[quad, kicker]));
        }

        if let Some(&trip) = trips.first() {
            // Second trips play as the pair of a full house
            let pair = trips.get(1).copied().into_iter().chain(pairs.first().copied()).max();
            if let Some(pair) = pair {
                return Some(HandRank::new(HandCategory::FullHouse, &[trip, pair]));
            }
            let kickers: Vec<u8> = singles.iter().take(2).copied().collect();
            return Some(HandRank::new(
                HandCategory::ThreeOfAKind,
                &[trip, kickers.first().copied().unwrap_or(0), kickers.get(1).copied().unwrap_or(0)],
            ));
        }

        if pairs.len() >= 2 {
            // A third pair can still play as the kicker
            let kicker = pairs
                .get(2)
                .copied()
                .into_iter()
                .chain(singles.first().copied())
                .max()
                .unwrap_or(0);
            return Some(HandRank::new(HandCategory::TwoPair, &[pairs[0], pairs[1], kicker]));
        }

        if let Some(&pair) = pairs.first() {
            let mut kickers = vec![pair];
            kickers.extend(singles.iter().take(3));
            return Some(HandRank::new(HandCategory::OnePair, &kickers));
        }

        None
    }

    /// Evaluate hole cards against a complete (or at least 3-card) board.
    pub fn evaluate_hand(&self, hole_cards: &HoleCards, board: &[Card]) -> Option<HandRank> {
        let mut cards = Vec::with_capacity(7);
        cards.extend_from_slice(&hole_cards.cards());
        cards.extend_from_slice(board);
        self.evaluate(&cards)
    }
}

/// Iterate the set ranks of a bitmask from ace down.
fn ranks_desc(bits: u16) -> impl Iterator<Item = u8> {
    (0..13u8).rev().filter(move |r| bits & (1 << r) != 0)
}

/// Find the highest straight from a rank bitmask.
/// Returns the high card of the straight, or None if no straight.
pub(crate) fn find_straight(rank_bits: u16) -> Option<u8> {
    for high in (4..13u8).rev() {
        let mask = 0b11111u16 << (high - 4);
        if rank_bits & mask == mask {
            return Some(high);
        }
    }

    // Wheel: A-2-3-4-5 = bits 12,0,1,2,3; high card is the five
    let wheel = 0b1_0000_0000_1111u16;
    if rank_bits & wheel == wheel {
        return Some(3);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::card::parse_cards;

    fn rank_of(s: &str) -> HandRank {
        HandEvaluator::new().evaluate(&parse_cards(s).unwrap()).unwrap()
    }

    #[test]
    fn test_categories() {
        assert_eq!(rank_of("As Kd Qh Jc 9s").category(), HandCategory::HighCard);
        assert_eq!(rank_of("As Ad Kh Qc Js").category(), HandCategory::OnePair);
        assert_eq!(rank_of("As Ad Kh Kc Js").category(), HandCategory::TwoPair);
        assert_eq!(rank_of("As Ad Ah Kc Js").category(), HandCategory::ThreeOfAKind);
        assert_eq!(rank_of("Ts 9d 8h 7c 6s").category(), HandCategory::Straight);
        assert_eq!(rank_of("As Ks 9s 7s 2s").category(), HandCategory::Flush);
        assert_eq!(rank_of("As Ad Ah Kc Kd").category(), HandCategory::FullHouse);
        assert_eq!(rank_of("As Ad Ah Ac Ks").category(), HandCategory::FourOfAKind);
        assert_eq!(rank_of("9s 8s 7s 6s 5s").category(), HandCategory::StraightFlush);
    }

    #[test]
    fn test_wheel_is_lowest_straight() {
        let wheel = rank_of("5s 4d 3h 2c As");
        let six_high = rank_of("6s 5d 4h 3c 2s");
        assert_eq!(wheel.category(), HandCategory::Straight);
        assert!(six_high > wheel);
    }

    #[test]
    fn test_seven_card_best_hand() {
        // Quads next to a four-flush
        assert_eq!(rank_of("Ah As Ad Ac Kh Qh Jh").category(), HandCategory::FourOfAKind);
        // Two trips make a full house
        assert_eq!(rank_of("9h 9c 9d Kd Kh Ks 2c").category(), HandCategory::FullHouse);
        // Flush beats a straight
        assert_eq!(rank_of("9h 8h 7c 6h 5d 2h Ah").category(), HandCategory::Flush);
        // Straight flush inside seven cards
        assert_eq!(rank_of("9h 8h 7h 6h 5h Ah Ad").category(), HandCategory::StraightFlush);
    }

    #[test]
    fn test_kickers_decide() {
        assert!(rank_of("As Ad Kh 7c 2s") > rank_of("Ac Ah Qh 7d 2d"));
        // Third pair is a kicker candidate in seven cards
        assert!(rank_of("Ks Kd Qh Qc 9s 9d 2c") > rank_of("Kh Kc Qs Qd 8s 8d 2d"));
    }

    #[test]
    fn test_hand_comparison() {
        let eval = HandEvaluator::new();
        let aa = HoleCards::from_slice(&parse_cards("AhAd").unwrap()).unwrap();
        let kk = HoleCards::from_slice(&parse_cards("KhKd").unwrap()).unwrap();
        let board = parse_cards("Qs Jc 7d 3s 2h").unwrap();

        assert!(eval.evaluate_hand(&aa, &board) > eval.evaluate_hand(&kk, &board));

        // Both play the board
        let royal = parse_cards("As Ks Qs Js Ts").unwrap();
        assert_eq!(eval.evaluate_hand(&aa, &royal), eval.evaluate_hand(&kk, &royal));
    }

    #[test]
    fn test_invalid_sizes() {
        let eval = HandEvaluator::new();
        assert!(eval.evaluate(&parse_cards("As Kd Qh Jc").unwrap()).is_none());
        assert!(eval.evaluate(&parse_cards("As Kd Qh Jc 9s 8s 7s 6s").unwrap()).is_none());
    }
}
