//! Evidence level normalization, scores and ordering

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::indicator::IndicatorRecord;

static LEVEL_PREFIX_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"LEVEL_(.*)").unwrap());

/// Canonical level orderings
#[derive(Debug, Clone, Copy)]
pub struct Levels {
    pub sensitivity: &'static [&'static str],
    pub resistance: &'static [&'static str],
    pub all: &'static [&'static str],
}

pub const LEVELS: Levels = Levels {
    sensitivity: &["4", "3B", "3A", "2", "1", "0"],
    resistance: &["R3", "R2", "R1"],
    all: &["4", "R3", "3B", "3A", "R2", "2", "1", "R1", "0"],
};

const SENSITIVITY_LEVEL_SCORE: &[(&str, u32)] =
    &[("4", 1), ("3B", 2), ("3A", 3), ("2", 5), ("1", 6)];
const RESISTANCE_LEVEL_SCORE: &[(&str, u32)] = &[("R3", 1), ("R2", 2), ("R1", 3)];
const DIAGNOSTIC_LEVEL_SCORE: &[(&str, u32)] = &[("Dx3", 1), ("Dx2", 2), ("Dx1", 3)];
const PROGNOSTIC_LEVEL_SCORE: &[(&str, u32)] = &[("Px3", 1), ("Px2", 2), ("Px1", 3)];

/// Strips a `LEVEL_` prefix: `"LEVEL_3A"` becomes `"3A"`.
///
/// Strings without the prefix pass through unchanged; an empty level is `None`.
pub fn normalize_level(level: &str) -> Option<String> {
    if level.is_empty() {
        return None;
    }

    let normalized = LEVEL_PREFIX_PATTERN
        .captures(level)
        .and_then(|caps| caps.get(1))
        .map_or(level, |m| m.as_str());

    Some(normalized.to_string())
}

fn score(table: &[(&str, u32)], level: &str) -> u32 {
    let Some(level) = normalize_level(level) else {
        return 0;
    };

    table
        .iter()
        .find(|(key, _)| *key == level)
        .map_or(0, |(_, score)| *score)
}

pub fn sensitivity_level_score(level: &str) -> u32 {
    score(SENSITIVITY_LEVEL_SCORE, level)
}

pub fn resistance_level_score(level: &str) -> u32 {
    score(RESISTANCE_LEVEL_SCORE, level)
}

pub fn diagnostic_level_score(level: &str) -> u32 {
    score(DIAGNOSTIC_LEVEL_SCORE, level)
}

pub fn prognostic_level_score(level: &str) -> u32 {
    score(PROGNOSTIC_LEVEL_SCORE, level)
}

fn canonical_index(level: &str) -> i64 {
    LEVELS
        .all
        .iter()
        .position(|l| *l == level)
        .map_or(-1, |i| i as i64)
}

/// Orders levels by descending position in [`LEVELS`]`.all`.
///
/// A level later in the canonical list sorts first, so `"0"` precedes `"1"`
/// and `"4"` comes last among known levels. Unknown levels sort after all
/// known ones.
pub fn level_comparator(a: &str, b: &str) -> Ordering {
    canonical_index(b).cmp(&canonical_index(a))
}

/// Which facet of an indicator a card or icon describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardDataType {
    Biological,
    Txs,
    Txr,
    Dx,
    Px,
}

/// The raw highest level for the given facet, or `""` when the indicator is
/// missing, the facet is biological, or the level is unset.
pub fn highest_indicator_level(kind: CardDataType, indicator: Option<&IndicatorRecord>) -> String {
    let Some(indicator) = indicator else {
        return String::new();
    };

    let level = match kind {
        CardDataType::Biological => None,
        CardDataType::Txs => indicator.highest_sensitive_level.as_deref(),
        CardDataType::Txr => indicator.highest_resistance_level.as_deref(),
        CardDataType::Dx => indicator.highest_diagnostic_implication_level.as_deref(),
        CardDataType::Px => indicator.highest_prognostic_implication_level.as_deref(),
    };

    level.unwrap_or_default().to_string()
}
