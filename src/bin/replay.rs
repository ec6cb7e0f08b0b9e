//! Replay a recorded stream of table snapshots through the advisor.
//!
//! Usage:
//!   cargo run --release --bin replay -- --snapshots session.json [OPTIONS]
//!
//! The snapshot file is a JSON array of steps:
//!   [{"snapshot": {...}, "decision": {"action": "BET", "amount": 4.0}}, ...]
//!
//! `decision` is optional and stands in for the postflop reasoner. Preflop
//! hero turns are decided by the range engine. Each emitted decision is
//! printed as one JSON line.

use hu_advisor::snapshot::RawSnapshot;
use hu_advisor::{AdvisorConfig, Decision, Observation, RangeTable, Session, Street, TableSnapshot};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::env;
use std::fs;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Deserialize)]
struct Step {
    snapshot: RawSnapshot,
    #[serde(default)]
    decision: Option<Decision>,
}

fn print_help() {
    println!("HU Advisor Replay");
    println!();
    println!("USAGE:");
    println!("    replay --snapshots <FILE> [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -s, --snapshots <FILE>   JSON array of recorded steps (required)");
    println!("    -c, --config <FILE>      Load advisor configuration from JSON file");
    println!("    -r, --ranges <DIR>       Override the ranges directory");
    println!("        --seed <N>           Random seed for reproducibility");
    println!("        --context            Print the postflop context for each hero turn");
    println!("    -h, --help               Print this help message");
    println!();
    println!("Set RUST_LOG=info (or debug) to see ledger activity.");
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config_file: Option<String> = None;
    let mut snapshots_file: Option<String> = None;
    let mut ranges_dir: Option<String> = None;
    let mut seed: Option<u64> = None;
    let mut show_context = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                config_file = args.get(i).cloned();
            }
            "--snapshots" | "-s" => {
                i += 1;
                snapshots_file = args.get(i).cloned();
            }
            "--ranges" | "-r" => {
                i += 1;
                ranges_dir = args.get(i).cloned();
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|s| s.parse().ok());
            }
            "--context" => {
                show_context = true;
            }
            "--help" | "-h" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                return ExitCode::FAILURE;
            }
        }
        i += 1;
    }

    let Some(snapshots_file) = snapshots_file else {
        eprintln!("Missing --snapshots");
        print_help();
        return ExitCode::FAILURE;
    };

    let mut config = match &config_file {
        Some(path) => match AdvisorConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => AdvisorConfig::default(),
    };
    if let Some(dir) = ranges_dir {
        config = config.with_ranges_dir(dir);
    }
    if let Some(s) = seed {
        config = config.with_seed(s);
    }

    let steps: Vec<Step> = match fs::read_to_string(&snapshots_file)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
    {
        Ok(steps) => steps,
        Err(e) => {
            eprintln!("Error reading {}: {}", snapshots_file, e);
            return ExitCode::FAILURE;
        }
    };

    let ranges = Arc::new(RangeTable::load_dir(&config.ranges_dir));
    let mut session = Session::new(ranges, &config);
    let mut rng = config.rng();

    let pb = ProgressBar::new(steps.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let start_time = Instant::now();
    let mut rejected = 0usize;
    let mut decisions = 0usize;

    for (index, step) in steps.into_iter().enumerate() {
        pb.inc(1);

        let snapshot = match TableSnapshot::try_from(step.snapshot) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("{:<32}step {}: {}", "snapshot rejected", index, e);
                rejected += 1;
                continue;
            }
        };
        let hero_turn = snapshot.is_hero_turn;
        let street = snapshot.street;

        if let Observation::Updated { new_hand, recorded } = session.observe(snapshot) {
            if new_hand {
                pb.set_message(format!("hand {}", session.hand().map_or(0, |h| h.hand_id())));
            }
            for action in &recorded {
                log::debug!("{:<32}{}", "recorded", action);
            }
        }

        if !hero_turn {
            continue;
        }

        let decision = if street == Street::Preflop {
            session.preflop_decision(&mut rng)
        } else {
            if show_context {
                if let Some(context) = session.postflop_context(&mut rng) {
                    pb.suspend(|| println!("{}\n", context.render()));
                }
            }
            match step.decision {
                Some(decision) => session.submit_decision(decision),
                None => continue,
            }
        };

        decisions += 1;
        match serde_json::to_string(&decision) {
            Ok(line) => pb.suspend(|| println!("{}", line)),
            Err(e) => log::warn!("{:<32}{}", "unserializable decision", e),
        }
    }

    pb.finish_with_message("done");

    let elapsed = start_time.elapsed();
    println!();
    println!("Decisions: {}", decisions);
    println!("Rejected snapshots: {}", rejected);
    println!("Time: {:.2}s", elapsed.as_secs_f64());

    if let Some(hand) = session.hand() {
        println!();
        println!("{}", hu_advisor::ledger::format_transcript(hand));
    }

    ExitCode::SUCCESS
}
