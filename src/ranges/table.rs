//! Weighted range definitions and the range cache.
//!
//! Range files hold a single comma-separated list of `LABEL` or
//! `LABEL:WEIGHT` tokens, e.g. `AA,KK,QQ:0.75,AK,A5s:0.5`. A token without a
//! weight counts as 1.0.

use super::label::{HandLabel, LabelError};
use rustc_hash::FxHashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Named ranges the advisor knows about, one file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RangeName {
    SbOpen,
    BbCall,
    Bb3Bet,
    SbCallVs3Bet,
    Sb4Bet,
    BbCallVs4Bet,
    Bb5Bet,
    SbCallVs5Bet,
}

impl RangeName {
    /// Every named range, in load order.
    pub const ALL: [RangeName; 8] = [
        RangeName::SbOpen,
        RangeName::BbCall,
        RangeName::Bb3Bet,
        RangeName::SbCallVs3Bet,
        RangeName::Sb4Bet,
        RangeName::BbCallVs4Bet,
        RangeName::Bb5Bet,
        RangeName::SbCallVs5Bet,
    ];

    /// Identifier used for file names and descriptions.
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeName::SbOpen => "sb_open",
            RangeName::BbCall => "bb_call",
            RangeName::Bb3Bet => "bb_3bet",
            RangeName::SbCallVs3Bet => "sb_call_vs_3bet",
            RangeName::Sb4Bet => "sb_4bet",
            RangeName::BbCallVs4Bet => "bb_call_vs_4bet",
            RangeName::Bb5Bet => "bb_5bet",
            RangeName::SbCallVs5Bet => "sb_call_vs_5bet",
        }
    }

    /// File name inside the ranges directory.
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.as_str())
    }
}

impl fmt::Display for RangeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for range loading and parsing.
#[derive(Debug, Error)]
pub enum RangeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("range definition is empty")]
    Empty,
    #[error("bad hand in token '{token}': {source}")]
    Label {
        token: String,
        #[source]
        source: LabelError,
    },
    #[error("bad weight in token '{0}'")]
    Weight(String),
    #[error("weight {weight} for {label} is outside [0, 1]")]
    WeightOutOfRange { label: String, weight: f64 },
}

/// Where a range came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOrigin {
    Parsed,
    /// Substituted after a load failure.
    Fallback,
}

/// Weighted set of hand labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    weights: FxHashMap<HandLabel, f64>,
    /// Labels in definition order, so iteration (and therefore sampling) is
    /// reproducible.
    order: Vec<HandLabel>,
    origin: RangeOrigin,
}

impl Range {
    /// Build a range from labels and weights.
    pub fn from_weights<I: IntoIterator<Item = (HandLabel, f64)>>(entries: I) -> Self {
        let mut range = Self {
            weights: FxHashMap::default(),
            order: Vec::new(),
            origin: RangeOrigin::Parsed,
        };
        for (label, weight) in entries {
            range.insert(label, weight);
        }
        range
    }

    fn insert(&mut self, label: HandLabel, weight: f64) {
        if self.weights.insert(label, weight).is_none() {
            self.order.push(label);
        }
    }

    /// Parse the comma-separated range format.
    pub fn parse(text: &str) -> Result<Self, RangeError> {
        let mut range = Self::from_weights(std::iter::empty());

        for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let (hand, weight) = match token.split_once(':') {
                Some((hand, weight)) => {
                    let weight: f64 = weight
                        .trim()
                        .parse()
                        .map_err(|_| RangeError::Weight(token.to_string()))?;
                    (hand, weight)
                }
                None => (token, 1.0),
            };
            let label: HandLabel = hand.parse().map_err(|source| RangeError::Label {
                token: token.to_string(),
                source,
            })?;
            if !(0.0..=1.0).contains(&weight) {
                return Err(RangeError::WeightOutOfRange { label: label.to_string(), weight });
            }
            range.insert(label, weight);
        }

        if range.is_empty() {
            return Err(RangeError::Empty);
        }
        Ok(range)
    }

    /// Read and parse a range file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RangeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| RangeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    fn fallback(labels: &[&str]) -> Self {
        let mut range = Self::from_weights(
            labels
                .iter()
                .filter_map(|l| l.parse::<HandLabel>().ok())
                .map(|l| (l, 1.0)),
        );
        range.origin = RangeOrigin::Fallback;
        range
    }

    /// Range used for preflop decisions when a file cannot be loaded.
    pub fn decision_fallback() -> Self {
        Self::fallback(&["AA", "KK", "QQ", "AKs"])
    }

    /// Range assumed for the opponent when the equity path has no usable range.
    pub fn equity_fallback() -> Self {
        Self::fallback(&["AA", "KK", "QQ"])
    }

    /// Whether this range was substituted after a load failure.
    pub fn is_fallback(&self) -> bool {
        self.origin == RangeOrigin::Fallback
    }

    /// Stored weight for an exact label.
    pub fn weight(&self, label: &HandLabel) -> Option<f64> {
        self.weights.get(label).copied()
    }

    /// Iterate `(label, weight)` in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (HandLabel, f64)> + '_ {
        self.order.iter().map(move |l| (*l, self.weights[l]))
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the range has no labels.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<String> = self
            .iter()
            .map(|(label, weight)| {
                if weight == 1.0 {
                    label.to_string()
                } else {
                    format!("{}:{}", label, weight)
                }
            })
            .collect();
        f.write_str(&tokens.join(","))
    }
}

/// Cache of every named range, loaded once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct RangeTable {
    ranges: FxHashMap<RangeName, Range>,
}

impl RangeTable {
    /// Load every named range from `dir`.
    ///
    /// Missing or malformed files are replaced by the decision fallback and
    /// reported through `log::warn!`; loading never fails as a whole.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let ranges = RangeName::ALL
            .iter()
            .map(|&name| (name, Self::load(dir, name)))
            .collect();
        Self { ranges }
    }

    /// Load a single named range from `dir`, falling back on failure.
    pub fn load(dir: &Path, name: RangeName) -> Range {
        let path = dir.join(name.file_name());
        match Range::from_file(&path) {
            Ok(range) => {
                log::info!("{:<32}{:<24}{} hands", "loaded range", name, range.len());
                range
            }
            Err(e) => {
                log::warn!("range '{}' unavailable ({}), using fallback", name, e);
                Range::decision_fallback()
            }
        }
    }

    /// Build a table from in-memory ranges; names not supplied get the
    /// decision fallback.
    pub fn from_ranges<I: IntoIterator<Item = (RangeName, Range)>>(entries: I) -> Self {
        let mut ranges: FxHashMap<RangeName, Range> = entries.into_iter().collect();
        for name in RangeName::ALL {
            ranges.entry(name).or_insert_with(Range::decision_fallback);
        }
        Self { ranges }
    }

    /// Look up a named range.
    pub fn get(&self, name: RangeName) -> &Range {
        &self.ranges[&name]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> HandLabel {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_weights() {
        let range = Range::parse("AA,KK,QQ:0.75,JJ:0.5, AK ,Q2o:0").unwrap();
        assert_eq!(range.len(), 6);
        assert_eq!(range.weight(&label("AA")), Some(1.0));
        assert_eq!(range.weight(&label("QQ")), Some(0.75));
        assert_eq!(range.weight(&label("AK")), Some(1.0));
        assert_eq!(range.weight(&label("Q2o")), Some(0.0));
        assert_eq!(range.weight(&label("AKs")), None);
        assert!(!range.is_fallback());
    }

    #[test]
    fn test_parse_keeps_definition_order() {
        let range = Range::parse("JJ,AA,T9s:0.5").unwrap();
        let labels: Vec<String> = range.iter().map(|(l, _)| l.to_string()).collect();
        assert_eq!(labels, vec!["JJ", "AA", "T9s"]);
        assert_eq!(range.to_string(), "JJ,AA,T9s:0.5");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(Range::parse(""), Err(RangeError::Empty)));
        assert!(matches!(Range::parse(" , "), Err(RangeError::Empty)));
        assert!(matches!(Range::parse("AA,XX"), Err(RangeError::Label { .. })));
        assert!(matches!(Range::parse("AA:abc"), Err(RangeError::Weight(_))));
        assert!(matches!(Range::parse("AA:1.5"), Err(RangeError::WeightOutOfRange { .. })));
        assert!(matches!(Range::parse("AA:-0.1"), Err(RangeError::WeightOutOfRange { .. })));
    }

    #[test]
    fn test_fallback_ranges() {
        let decision = Range::decision_fallback();
        assert!(decision.is_fallback());
        assert_eq!(decision.to_string(), "AA,KK,QQ,AKs");
        assert_eq!(Range::equity_fallback().to_string(), "AA,KK,QQ");
    }

    #[test]
    fn test_load_dir_falls_back_per_file() {
        let dir = std::env::temp_dir().join(format!("hu-advisor-ranges-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("sb_open.txt"), "AA,KK,AKs:0.5\n").unwrap();
        fs::write(dir.join("bb_call.txt"), "AA,garbage").unwrap();

        let table = RangeTable::load_dir(&dir);
        let sb_open = table.get(RangeName::SbOpen);
        assert!(!sb_open.is_fallback());
        assert_eq!(sb_open.weight(&label("AKs")), Some(0.5));

        assert!(table.get(RangeName::BbCall).is_fallback());
        assert!(table.get(RangeName::Bb5Bet).is_fallback());

        fs::remove_dir_all(&dir).unwrap();
    }
}
