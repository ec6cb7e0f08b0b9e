//! Inferring unseen actions between two snapshots.
//!
//! Snapshots only show bets and the pot, so checks and calls that happen
//! between two observations have to be reconstructed. Every inference is
//! guarded by a condition its own result falsifies, which makes reconciling
//! the same pair of snapshots twice a no-op.

use super::action::{Action, ActionKind};
use super::record::HandRecord;
use crate::snapshot::{HUPosition, Player, TableSnapshot};

impl HandRecord {
    /// Bring the log up to date with the transition `previous -> current`.
    ///
    /// Returns the actions that were inferred and accepted.
    pub fn reconcile(&mut self, previous: Option<&TableSnapshot>, current: &TableSnapshot) -> Vec<Action> {
        let start = self.actions().len();

        match previous {
            Some(previous) if previous.street != current.street => {
                self.close_street(previous, current);
                self.seed_street(current);
            }
            Some(_) => {}
            None => self.seed_street(current),
        }

        let inferred = self.actions()[start..].to_vec();
        for action in &inferred {
            log::debug!("hand #{}: inferred {} on {}", self.hand_id(), action, action.street);
        }
        inferred
    }

    /// First look at a postflop street: the BB acts first, so a villain BB
    /// with nothing in front of them has checked.
    fn seed_street(&mut self, current: &TableSnapshot) {
        let street = current.street;
        if !street.is_postflop() || self.actions_on(street).next().is_some() {
            return;
        }
        if current.big_blind() == Player::Villain && current.bets.villain == 0.0 {
            let _ = self.record(Player::Villain, ActionKind::Check, None, Some(street), None);
        }
    }

    /// The street advanced: settle whatever closed the previous street.
    fn close_street(&mut self, previous: &TableSnapshot, current: &TableSnapshot) {
        let street = previous.street;

        let unanswered = self
            .last_action_on(street)
            .filter(|a| a.kind.is_aggressive())
            .map(|a| (a.player, a.amount));

        if let Some((aggressor, amount)) = unanswered {
            let caller = aggressor.opponent();
            if current.bets.get(caller) == 0.0 && current.pot_size > previous.pot_size {
                let _ = self.record(caller, ActionKind::Call, amount, Some(street), None);
            }
            return;
        }

        // Bets reset with the new street, so "still shows a zero bet" is read
        // from the last snapshot of the street being closed.
        for position in [HUPosition::BB, HUPosition::SB] {
            let player = previous.positions.player_at(position);
            if !self.has_acted(street, player) && previous.bets.get(player) == 0.0 {
                let _ = self.record(player, ActionKind::Check, None, Some(street), None);
            }
        }
    }
}
