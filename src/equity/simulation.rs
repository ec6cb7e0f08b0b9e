//! Monte Carlo equity simulation.
//!
//! Iterations are cut into fixed-size chunks. Each chunk gets its own seed,
//! drawn up front from the caller's rng, and runs on the rayon pool. Chunks
//! return integer half-points (win = 2, tie = 1), so the total does not depend
//! on the order in which threads finish and a fixed seed reproduces the same
//! equity exactly.

use crate::cards::{Card, Deck, HandEvaluator, HoleCards};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::cmp::Ordering;

/// Iterations per parallel chunk unless configured otherwise.
pub const DEFAULT_CHUNK: usize = 1_000;

/// Estimate hero's equity against villain holdings drawn uniformly from
/// `villain_combos`.
///
/// Combos that collide with hero's cards or the board are discarded first.
/// Returns `None` when no combo survives or `iterations` is zero.
pub fn simulate<R: Rng + ?Sized>(
    hero: &HoleCards,
    board: &[Card],
    villain_combos: &[HoleCards],
    iterations: usize,
    chunk_size: usize,
    rng: &mut R,
) -> Option<f64> {
    let dead = board.iter().fold(hero.mask(), |m, c| m | c.mask());
    let combos: Vec<HoleCards> = villain_combos
        .iter()
        .copied()
        .filter(|c| c.mask() & dead == 0)
        .collect();
    if combos.is_empty() || iterations == 0 {
        return None;
    }

    let chunk_size = chunk_size.max(1);
    let chunks: Vec<(u64, usize)> = (0..iterations)
        .step_by(chunk_size)
        .map(|start| (rng.gen::<u64>(), chunk_size.min(iterations - start)))
        .collect();

    let points: u64 = chunks
        .par_iter()
        .map(|&(seed, count)| run_chunk(hero, board, &combos, dead, seed, count))
        .sum();

    Some(points as f64 / (2 * iterations) as f64)
}

/// Play `count` random completions and return hero's half-points.
fn run_chunk(hero: &HoleCards, board: &[Card], combos: &[HoleCards], dead: u64, seed: u64, count: usize) -> u64 {
    let mut rng = StdRng::seed_from_u64(seed);
    let evaluator = HandEvaluator::new();
    let mut full_board = Vec::with_capacity(5);
    let mut points = 0;

    for _ in 0..count {
        let villain = combos[rng.gen_range(0..combos.len())];
        let mut deck = Deck::without_mask(dead | villain.mask());

        full_board.clear();
        full_board.extend_from_slice(board);
        while full_board.len() < 5 {
            match deck.draw(&mut rng) {
                Some(card) => full_board.push(card),
                None => break,
            }
        }

        let hero_rank = evaluator.evaluate_hand(hero, &full_board);
        let villain_rank = evaluator.evaluate_hand(&villain, &full_board);
        points += match hero_rank.cmp(&villain_rank) {
            Ordering::Greater => 2,
            Ordering::Equal => 1,
            Ordering::Less => 0,
        };
    }

    points
}
