//! Table snapshots.
//!
//! The perception layer reports what is on screen as loosely typed JSON
//! (`RawSnapshot`). It is validated once at the boundary into a
//! `TableSnapshot`; everything downstream works only with validated records.

use crate::cards::{Card, CardParseError, Street};
use crate::ledger::PotType;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One of the two players at a heads-up table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Hero,
    Villain,
}

impl Player {
    /// The other player.
    pub fn opponent(&self) -> Self {
        match self {
            Player::Hero => Player::Villain,
            Player::Villain => Player::Hero,
        }
    }

    /// Index for per-player arrays (hero = 0, villain = 1).
    pub fn index(&self) -> usize {
        match self {
            Player::Hero => 0,
            Player::Villain => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Hero => write!(f, "hero"),
            Player::Villain => write!(f, "villain"),
        }
    }
}

/// Heads-up seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HUPosition {
    /// Small blind (acts first preflop)
    SB,
    /// Big blind (acts first postflop)
    BB,
}

impl HUPosition {
    /// Get the other position.
    pub fn opponent(&self) -> Self {
        match self {
            HUPosition::SB => HUPosition::BB,
            HUPosition::BB => HUPosition::SB,
        }
    }
}

impl fmt::Display for HUPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HUPosition::SB => write!(f, "SB"),
            HUPosition::BB => write!(f, "BB"),
        }
    }
}

/// Opaque UI coordinate of a button, passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenPos(pub i32, pub i32);

/// A per-player amount (bets or stacks).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Seats {
    pub hero: f64,
    pub villain: f64,
}

impl Seats {
    pub fn get(&self, player: Player) -> f64 {
        match player {
            Player::Hero => self.hero,
            Player::Villain => self.villain,
        }
    }
}

/// Which player sits in which blind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Positions {
    #[serde(rename = "SB")]
    pub sb: Player,
    #[serde(rename = "BB")]
    pub bb: Player,
}

impl Positions {
    /// Hero in the small blind.
    pub fn hero_sb() -> Self {
        Self { sb: Player::Hero, bb: Player::Villain }
    }

    /// Hero in the big blind.
    pub fn hero_bb() -> Self {
        Self { sb: Player::Villain, bb: Player::Hero }
    }

    pub fn player_at(&self, position: HUPosition) -> Player {
        match position {
            HUPosition::SB => self.sb,
            HUPosition::BB => self.bb,
        }
    }

    pub fn position_of(&self, player: Player) -> HUPosition {
        if self.sb == player {
            HUPosition::SB
        } else {
            HUPosition::BB
        }
    }
}

/// State of a fixed-action button (FOLD, CALL, CHECK).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ButtonState {
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub position: Option<ScreenPos>,
}

impl ButtonState {
    pub fn at(x: i32, y: i32) -> Self {
        Self { available: true, position: Some(ScreenPos(x, y)) }
    }
}

/// A sized raise or bet button.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizedOption {
    pub value: f64,
    pub position: ScreenPos,
}

/// The buttons currently offered to hero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AvailableActions {
    #[serde(rename = "FOLD", default)]
    pub fold: ButtonState,
    #[serde(rename = "CALL", default)]
    pub call: ButtonState,
    #[serde(rename = "CHECK", default)]
    pub check: ButtonState,
    #[serde(rename = "R", default)]
    pub raises: Vec<SizedOption>,
    #[serde(rename = "B", default)]
    pub bets: Vec<SizedOption>,
}

impl AvailableActions {
    /// Smallest offered raise.
    pub fn min_raise(&self) -> Option<&SizedOption> {
        smallest(&self.raises)
    }

    /// Smallest offered bet.
    pub fn min_bet(&self) -> Option<&SizedOption> {
        smallest(&self.bets)
    }

    /// Raise option whose size is closest to `target`.
    pub fn closest_raise(&self, target: f64) -> Option<&SizedOption> {
        closest(&self.raises, target)
    }

    /// Bet option whose size is closest to `target`.
    pub fn closest_bet(&self, target: f64) -> Option<&SizedOption> {
        closest(&self.bets, target)
    }
}

fn smallest(options: &[SizedOption]) -> Option<&SizedOption> {
    options.iter().min_by(|a, b| a.value.total_cmp(&b.value))
}

fn closest(options: &[SizedOption], target: f64) -> Option<&SizedOption> {
    options
        .iter()
        .min_by(|a, b| (a.value - target).abs().total_cmp(&(b.value - target).abs()))
}

/// Snapshot exactly as the perception layer serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSnapshot {
    /// Optional; derived from the board when absent.
    #[serde(default)]
    pub street: Option<Street>,
    pub bets: Seats,
    pub stacks: Seats,
    pub pot_size: f64,
    pub positions: Positions,
    #[serde(default)]
    pub available_actions: AvailableActions,
    pub hero_cards: Vec<String>,
    #[serde(default)]
    pub community_cards: Vec<String>,
    #[serde(default)]
    pub is_hero_turn: bool,
    #[serde(default)]
    pub preflop_pot_type: Option<PotType>,
    #[serde(default)]
    pub pot_type_description: Option<String>,
}

/// Reasons a snapshot is rejected at the boundary.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Card(#[from] CardParseError),
    #[error("{0} community cards do not correspond to a street")]
    BoardLength(usize),
    #[error("reported street {reported} does not match {board_len} community cards")]
    StreetMismatch { reported: Street, board_len: usize },
    #[error("hero cannot hold {0} cards")]
    HeroCardCount(usize),
    #[error("card {0} is reported twice")]
    DuplicateCard(Card),
    #[error("{field} must be a finite non-negative amount (got {value})")]
    Amount { field: &'static str, value: f64 },
    #[error("{0} is reported in both blinds")]
    Positions(Player),
}

/// A validated observation of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    pub street: Street,
    pub bets: Seats,
    pub stacks: Seats,
    pub pot_size: f64,
    pub positions: Positions,
    pub available_actions: AvailableActions,
    /// At most two cards; fewer when recognition missed one.
    pub hero_cards: Vec<Card>,
    pub community_cards: Vec<Card>,
    pub is_hero_turn: bool,
    pub preflop_pot_type: Option<PotType>,
    pub pot_type_description: Option<String>,
}

impl TableSnapshot {
    /// Parse and validate one JSON snapshot.
    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Parse and validate a JSON array of snapshots.
    pub fn many_from_json_str(json: &str) -> Result<Vec<Self>, SnapshotError> {
        let raws: Vec<RawSnapshot> = serde_json::from_str(json)?;
        raws.into_iter().map(Self::try_from).collect()
    }

    /// Seat of a player.
    pub fn position_of(&self, player: Player) -> HUPosition {
        self.positions.position_of(player)
    }

    /// Player sitting in the big blind.
    pub fn big_blind(&self) -> Player {
        self.positions.bb
    }
}

impl TryFrom<RawSnapshot> for TableSnapshot {
    type Error = SnapshotError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        let hero_cards = raw
            .hero_cards
            .iter()
            .map(|s| s.parse::<Card>())
            .collect::<Result<Vec<_>, _>>()?;
        let community_cards = raw
            .community_cards
            .iter()
            .map(|s| s.parse::<Card>())
            .collect::<Result<Vec<_>, _>>()?;

        if hero_cards.len() > 2 {
            return Err(SnapshotError::HeroCardCount(hero_cards.len()));
        }
        let street = Street::from_board_len(community_cards.len())
            .ok_or(SnapshotError::BoardLength(community_cards.len()))?;
        if let Some(reported) = raw.street {
            if reported != street {
                return Err(SnapshotError::StreetMismatch {
                    reported,
                    board_len: community_cards.len(),
                });
            }
        }

        let mut seen = 0u64;
        for card in hero_cards.iter().chain(&community_cards) {
            if seen & card.mask() != 0 {
                return Err(SnapshotError::DuplicateCard(*card));
            }
            seen |= card.mask();
        }

        let amounts = [
            ("bets.hero", raw.bets.hero),
            ("bets.villain", raw.bets.villain),
            ("stacks.hero", raw.stacks.hero),
            ("stacks.villain", raw.stacks.villain),
            ("pot_size", raw.pot_size),
        ];
        let sizes = raw
            .available_actions
            .raises
            .iter()
            .chain(&raw.available_actions.bets)
            .map(|o| ("available_actions sizes", o.value));
        for (field, value) in amounts.into_iter().chain(sizes) {
            if !value.is_finite() || value < 0.0 {
                return Err(SnapshotError::Amount { field, value });
            }
        }

        if raw.positions.sb == raw.positions.bb {
            return Err(SnapshotError::Positions(raw.positions.sb));
        }

        Ok(Self {
            street,
            bets: raw.bets,
            stacks: raw.stacks,
            pot_size: raw.pot_size,
            positions: raw.positions,
            available_actions: raw.available_actions,
            hero_cards,
            community_cards,
            is_hero_turn: raw.is_hero_turn,
            preflop_pot_type: raw.preflop_pot_type,
            pot_type_description: raw.pot_type_description,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cards::parse_cards;

    /// Snapshot builder shared by the tests of other modules.
    pub(crate) fn snapshot(hero: &str, board: &str, positions: Positions) -> TableSnapshot {
        let community_cards = parse_cards(board).unwrap();
        TableSnapshot {
            street: Street::from_board_len(community_cards.len()).unwrap(),
            bets: Seats::default(),
            stacks: Seats { hero: 100.0, villain: 100.0 },
            pot_size: 0.0,
            positions,
            available_actions: AvailableActions::default(),
            hero_cards: parse_cards(hero).unwrap(),
            community_cards,
            is_hero_turn: true,
            preflop_pot_type: None,
            pot_type_description: None,
        }
    }

    const FLOP_JSON: &str = r#"{
        "street": "Flop",
        "bets": {"hero": 0.0, "villain": 2.5},
        "stacks": {"hero": 97.5, "villain": 95.0},
        "pot_size": 5.0,
        "positions": {"SB": "hero", "BB": "villain"},
        "available_actions": {
            "FOLD": {"available": true, "position": [100, 900]},
            "CALL": {"available": true, "position": [300, 900]},
            "CHECK": {"available": false, "position": null},
            "R": [{"value": 7.5, "position": [500, 900]}, {"value": 5.0, "position": [450, 900]}],
            "B": []
        },
        "hero_cards": ["Ah", "Kd"],
        "community_cards": ["7c", "8d", "2s"],
        "is_hero_turn": true,
        "preflop_pot_type": "2_bet_pot",
        "pot_type_description": "SB raise, BB call"
    }"#;

    #[test]
    fn test_parse_valid_snapshot() {
        let snap = TableSnapshot::from_json_str(FLOP_JSON).unwrap();
        assert_eq!(snap.street, Street::Flop);
        assert_eq!(snap.bets.get(Player::Villain), 2.5);
        assert_eq!(snap.position_of(Player::Hero), HUPosition::SB);
        assert_eq!(snap.big_blind(), Player::Villain);
        assert_eq!(snap.preflop_pot_type, Some(PotType::TwoBet));
        assert_eq!(snap.hero_cards.len(), 2);
        assert_eq!(snap.available_actions.min_raise().unwrap().value, 5.0);
        assert_eq!(snap.available_actions.closest_raise(7.0).unwrap().position, ScreenPos(500, 900));
        assert!(snap.available_actions.min_bet().is_none());
        assert!(!snap.available_actions.check.available);
    }

    #[test]
    fn test_street_derived_when_missing() {
        let json = FLOP_JSON.replace("\"street\": \"Flop\",", "");
        let snap = TableSnapshot::from_json_str(&json).unwrap();
        assert_eq!(snap.street, Street::Flop);
    }

    #[test]
    fn test_rejects_bad_board_length() {
        let json = FLOP_JSON
            .replace("\"street\": \"Flop\",", "")
            .replace("[\"7c\", \"8d\", \"2s\"]", "[\"7c\", \"8d\"]");
        assert!(matches!(TableSnapshot::from_json_str(&json), Err(SnapshotError::BoardLength(2))));
    }

    #[test]
    fn test_rejects_inconsistent_snapshots() {
        let turn = FLOP_JSON.replace("\"Flop\"", "\"Turn\"");
        assert!(matches!(
            TableSnapshot::from_json_str(&turn),
            Err(SnapshotError::StreetMismatch { .. })
        ));

        let dup = FLOP_JSON.replace("\"7c\"", "\"Ah\"");
        assert!(matches!(TableSnapshot::from_json_str(&dup), Err(SnapshotError::DuplicateCard(_))));

        let negative = FLOP_JSON.replace("\"pot_size\": 5.0", "\"pot_size\": -1.0");
        assert!(matches!(
            TableSnapshot::from_json_str(&negative),
            Err(SnapshotError::Amount { field: "pot_size", .. })
        ));

        let seats = FLOP_JSON.replace("\"BB\": \"villain\"", "\"BB\": \"hero\"");
        assert!(matches!(TableSnapshot::from_json_str(&seats), Err(SnapshotError::Positions(_))));

        let card = FLOP_JSON.replace("\"Kd\"", "\"Kx\"");
        assert!(matches!(TableSnapshot::from_json_str(&card), Err(SnapshotError::Card(_))));
    }

    #[test]
    fn test_unknown_pot_type_is_tolerated() {
        let json = FLOP_JSON.replace("\"2_bet_pot\"", "\"limped_pot\"");
        let snap = TableSnapshot::from_json_str(&json).unwrap();
        assert_eq!(snap.preflop_pot_type, Some(PotType::Unknown));
    }
}
