//! Action ledger: the validated betting history of one hand.
//!
//! `HandRecord` owns the log and its per-street legality markers,
//! `reconcile` fills in the checks and calls a snapshot sequence implies, and
//! `running_pot` / `format_transcript` turn the log into what the postflop
//! reasoner reads.

pub mod action;
pub mod pot;
pub mod reconcile;
pub mod record;
pub mod transcript;

pub use action::{Action, ActionKind};
pub use pot::{running_pot, PotStep, PotType};
pub use record::{HandRecord, Rejection};
pub use transcript::format_transcript;
