//! Weighted preflop ranges and the range-driven preflop engine.

pub mod engine;
pub mod label;
pub mod table;

pub use engine::{decide, match_decision, membership, PreflopEngine, PreflopNode};
pub use label::{HandLabel, LabelError, Suitedness};
pub use table::{Range, RangeError, RangeName, RangeTable};
