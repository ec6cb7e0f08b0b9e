//! # HU Advisor
//!
//! Decision support for a heads-up poker agent that only sees the table
//! through periodic, partial snapshots.
//!
//! ## Features
//!
//! - **Action Ledger**: Validated, deduplicated betting history rebuilt from
//!   snapshots, with inferred checks and calls and a running pot
//! - **Preflop Range Engine**: Weighted static ranges, situation
//!   classification and mapping onto the buttons the table offers
//! - **Equity Engine**: Opponent range selection by pot type, weighted
//!   thinning and parallel Monte Carlo simulation
//! - **Injectable Randomness**: Every draw goes through a caller-supplied
//!   `rand::Rng`, so seeded runs replay exactly
//!
//! ## Quick Start
//!
//! ```ignore
//! use hu_advisor::{AdvisorConfig, RangeTable, Session, TableSnapshot};
//! use std::sync::Arc;
//!
//! let config = AdvisorConfig::from_json_file("advisor.json")?;
//! let ranges = Arc::new(RangeTable::load_dir(&config.ranges_dir));
//! let mut session = Session::new(ranges, &config);
//! let mut rng = config.rng();
//!
//! session.observe(TableSnapshot::from_json_str(&json)?);
//! let decision = session.preflop_decision(&mut rng);
//! ```
//!
//! ## Architecture
//!
//! ```text
//!   perception JSON ──► TableSnapshot (validated)
//!                            │
//!                            ▼
//!                         Session ───────────────► Decision (executor)
//!                  ┌─────────┼──────────┐
//!                  ▼         ▼          ▼
//!            HandRecord  PreflopEngine  EquityEngine ──► PostflopContext
//!            (ledger)         │          │                (reasoner)
//!                             └────┬─────┘
//!                                  ▼
//!                             RangeTable
//! ```

/// Cards, hand evaluation and made-hand analysis.
pub mod cards;

/// Advisor configuration.
pub mod config;

/// Decisions handed to the action executor.
pub mod decision;

/// Opponent range selection and Monte Carlo equity.
pub mod equity;

/// Per-hand action history.
pub mod ledger;

/// Weighted ranges and the preflop engine.
pub mod ranges;

/// Snapshot-to-snapshot session controller.
pub mod session;

/// Validated table snapshots.
pub mod snapshot;

// Re-export commonly used types at crate root for convenience
pub use cards::{Card, HoleCards, Street};
pub use config::{AdvisorConfig, ConfigError};
pub use decision::{Decision, DecisionKind};
pub use equity::{EquityEngine, EquityError, EquityReport};
pub use ledger::{Action, ActionKind, HandRecord, PotType, Rejection};
pub use ranges::{PreflopEngine, PreflopNode, Range, RangeName, RangeTable};
pub use session::{Observation, PostflopContext, Session};
pub use snapshot::{Player, SnapshotError, TableSnapshot};
