//! Canonical hand labels.
//!
//! A label identifies a two-card hand class independent of suits and card
//! order: `"QQ"` for pairs, `"AKs"` / `"AKo"` for suited / offsuit non-pairs,
//! and the bare `"AK"` for the combined suited + offsuit pool that range files
//! may use.

use crate::cards::card::{parse_rank, Card, HoleCards, RANK_CHARS};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Suit relationship encoded in a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suitedness {
    Pair,
    Suited,
    Offsuit,
    /// Bare non-pair label covering both suited and offsuit combos.
    Any,
}

/// Error type for label parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("invalid hand label '{0}'")]
    Format(String),
    #[error("invalid rank character '{0}'")]
    Rank(char),
    #[error("invalid suffix '{0}' (expected 's' or 'o')")]
    Suffix(char),
}

/// A canonical, suit-blind hand class label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandLabel {
    /// Higher rank (0-12).
    pub high: u8,
    /// Lower rank (0-12), equal to `high` for pairs.
    pub low: u8,
    pub suitedness: Suitedness,
}

impl HandLabel {
    /// Pair label such as `"AA"`.
    pub fn pair(rank: u8) -> Self {
        Self { high: rank, low: rank, suitedness: Suitedness::Pair }
    }

    /// Canonical label of two concrete cards.
    ///
    /// Cards are ordered by rank descending; the result does not depend on the
    /// order the cards are passed in.
    pub fn canonicalize(card1: Card, card2: Card) -> Self {
        let hole = HoleCards::new(card1, card2);
        let suitedness = if hole.is_pair() {
            Suitedness::Pair
        } else if hole.is_suited() {
            Suitedness::Suited
        } else {
            Suitedness::Offsuit
        };
        Self { high: hole.card1.rank(), low: hole.card2.rank(), suitedness }
    }

    /// Label of a pair of hole cards.
    pub fn of(hole_cards: &HoleCards) -> Self {
        Self::canonicalize(hole_cards.card1, hole_cards.card2)
    }

    /// The same rank pair with its `s`/`o` suffix stripped.
    ///
    /// Pairs and bare labels have no suffix and return `None`.
    pub fn bare(&self) -> Option<Self> {
        match self.suitedness {
            Suitedness::Suited | Suitedness::Offsuit => Some(Self { suitedness: Suitedness::Any, ..*self }),
            Suitedness::Pair | Suitedness::Any => None,
        }
    }

    /// Whether this label matches a concrete two-card holding.
    pub fn matches(&self, a: Card, b: Card) -> bool {
        let concrete = Self::canonicalize(a, b);
        concrete == *self || concrete.bare() == Some(*self)
    }

    /// Enumerate every concrete holding of this hand class that avoids the
    /// `dead` card mask.
    pub fn combos(&self, dead: u64) -> Vec<HoleCards> {
        let mut combos = Vec::with_capacity(16);
        for s1 in 0..4u8 {
            for s2 in 0..4u8 {
                let a = Card::new(self.high, s1);
                let b = Card::new(self.low, s2);
                // Each unordered pair once
                if a.id() >= b.id() && self.high == self.low {
                    continue;
                }
                if (a.mask() | b.mask()) & dead != 0 || !self.matches(a, b) {
                    continue;
                }
                combos.push(HoleCards::new(a, b));
            }
        }
        combos
    }
}

impl FromStr for HandLabel {
    type Err = LabelError;

    /// Parse `"AA"`, `"AKs"`, `"AKo"` or `"AK"`; ranks may be given in either
    /// order and are stored high first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() < 2 || chars.len() > 3 {
            return Err(LabelError::Format(s.to_string()));
        }

        let r1 = parse_rank(chars[0]).ok_or(LabelError::Rank(chars[0]))?;
        let r2 = parse_rank(chars[1]).ok_or(LabelError::Rank(chars[1]))?;
        let (high, low) = if r1 >= r2 { (r1, r2) } else { (r2, r1) };

        if high == low {
            return match chars.len() {
                2 => Ok(Self::pair(high)),
                _ => Err(LabelError::Format(s.to_string())),
            };
        }

        let suitedness = match chars.get(2) {
            None => Suitedness::Any,
            Some('s') | Some('S') => Suitedness::Suited,
            Some('o') | Some('O') => Suitedness::Offsuit,
            Some(&c) => return Err(LabelError::Suffix(c)),
        };
        Ok(Self { high, low, suitedness })
    }
}

impl fmt::Display for HandLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let high = RANK_CHARS[self.high as usize];
        let low = RANK_CHARS[self.low as usize];
        match self.suitedness {
            Suitedness::Pair | Suitedness::Any => write!(f, "{}{}", high, low),
            Suitedness::Suited => write!(f, "{}{}s", high, low),
            Suitedness::Offsuit => write!(f, "{}{}o", high, low),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn test_canonicalize_labels() {
        assert_eq!(HandLabel::canonicalize(card("Kd"), card("Ah")).to_string(), "AKo");
        assert_eq!(HandLabel::canonicalize(card("Kh"), card("Ah")).to_string(), "AKs");
        assert_eq!(HandLabel::canonicalize(card("Qc"), card("Qs")).to_string(), "QQ");
        assert_eq!(HandLabel::canonicalize(card("2c"), card("7c")).to_string(), "72s");
    }

    #[test]
    fn test_canonicalize_is_order_invariant() {
        for a in 0..52u8 {
            for b in 0..52u8 {
                if a == b {
                    continue;
                }
                let (x, y) = (Card::from_id(a), Card::from_id(b));
                assert_eq!(HandLabel::canonicalize(x, y), HandLabel::canonicalize(y, x));
            }
        }
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("KA".parse::<HandLabel>().unwrap().to_string(), "AK");
        assert_eq!("t9s".parse::<HandLabel>().unwrap().to_string(), "T9s");
        assert_eq!("22".parse::<HandLabel>().unwrap(), HandLabel::pair(0));
        assert_eq!("AKx".parse::<HandLabel>(), Err(LabelError::Suffix('x')));
        assert_eq!("A1".parse::<HandLabel>(), Err(LabelError::Rank('1')));
        assert!(matches!("AAs".parse::<HandLabel>(), Err(LabelError::Format(_))));
        assert!(matches!("A".parse::<HandLabel>(), Err(LabelError::Format(_))));
    }

    #[test]
    fn test_combo_counts() {
        let count = |s: &str| s.parse::<HandLabel>().unwrap().combos(0).len();
        assert_eq!(count("AA"), 6);
        assert_eq!(count("AKs"), 4);
        assert_eq!(count("AKo"), 12);
        assert_eq!(count("AK"), 16);
    }

    #[test]
    fn test_combos_skip_dead_cards() {
        let aa: HandLabel = "AA".parse().unwrap();
        assert_eq!(aa.combos(card("Ah").mask()).len(), 3);
        assert_eq!(aa.combos(card("Ah").mask() | card("As").mask()).len(), 1);
    }
}
