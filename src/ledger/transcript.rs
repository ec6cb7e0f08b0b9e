//! Text rendering of a hand for the postflop reasoner.

use super::pot::{running_pot, PotType};
use super::record::HandRecord;
use crate::cards::Street;
use rustc_hash::FxHashMap;

/// Render the postflop history of a hand.
///
/// Preflop is summarised only by the pot type header; each postflop street
/// gets its own section, money-moving actions show the pot after them, and
/// hero's reasoning is printed beneath hero's actions.
pub fn format_transcript(hand: &HandRecord) -> String {
    let mut lines = Vec::new();

    if hand.preflop_pot_type() != PotType::Unknown {
        lines.push(format!(
            "Pot type: {} - Preflop action: {}",
            hand.preflop_pot_type(),
            hand.pot_type_description()
        ));
    }

    let pots: FxHashMap<usize, f64> = running_pot(hand)
        .into_iter()
        .map(|step| (step.action_index, step.pot))
        .collect();

    for street in [Street::Flop, Street::Turn, Street::River] {
        let mut section = hand
            .actions()
            .iter()
            .enumerate()
            .filter(|(_, action)| action.street == street)
            .peekable();
        if section.peek().is_none() {
            continue;
        }

        lines.push(format!("\n## {}:", street));
        for (index, action) in section {
            match pots.get(&index) {
                Some(pot) if action.kind.adds_chips() => {
                    lines.push(format!("- {} (pot: {:.2})", action, pot));
                }
                _ => lines.push(format!("- {}", action)),
            }
            if let Some(reasoning) = &action.reasoning {
                lines.push(format!("  Reasoning: {}", reasoning));
            }
        }
    }

    lines.join("\n")
}
