//! Benchmarks for hand evaluation and equity simulation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hu_advisor::cards::{parse_cards, HandEvaluator, HoleCards};
use hu_advisor::equity::simulate;
use hu_advisor::ledger::PotType;
use hu_advisor::ranges::{Range, RangeName};
use hu_advisor::snapshot::HUPosition;
use hu_advisor::{EquityEngine, RangeTable};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn hole(s: &str) -> HoleCards {
    let cards = parse_cards(s).unwrap();
    HoleCards::from_slice(&cards).unwrap()
}

fn evaluate_seven_benchmark(c: &mut Criterion) {
    let evaluator = HandEvaluator::new();
    let cards = parse_cards("Ah Kh Qd Jc 9s 4h 2h").unwrap();

    c.bench_function("evaluate_seven_cards", |b| {
        b.iter(|| evaluator.evaluate(black_box(&cards)))
    });
}

fn simulate_flop_benchmark(c: &mut Criterion) {
    let hero = hole("AhKh");
    let board = parse_cards("Qh 7d 2h").unwrap();
    let villain = [hole("QsQc"), hole("JdTd"), hole("7s7c"), hole("AcQc")];

    c.bench_function("simulate_flop_10000", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            simulate(&hero, &board, black_box(&villain), 10_000, 1_000, &mut rng)
        })
    });
}

fn calculate_equity_benchmark(c: &mut Criterion) {
    let call = Range::parse("22,33,44,55,66,77,88,99,TT,AKs,AQs,AJs,KQs,QJs,JTs,AKo:0.5,AQo:0.5").unwrap();
    let ranges = Arc::new(RangeTable::from_ranges([(RangeName::BbCall, call)]));
    let engine = EquityEngine::new(ranges);
    let hero = parse_cards("As Kd").unwrap();
    let board = parse_cards("Kh 8c 3s").unwrap();

    c.bench_function("calculate_equity_2bet_pot", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            engine.calculate_equity(&hero, &board, PotType::TwoBet, HUPosition::SB, black_box(5_000), &mut rng)
        })
    });
}

criterion_group!(
    benches,
    evaluate_seven_benchmark,
    simulate_flop_benchmark,
    calculate_equity_benchmark
);
criterion_main!(benches);
