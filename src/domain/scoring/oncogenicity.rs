//! Oncogenicity classification

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static FIRST_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").unwrap());

/// Oncogenicity classifications reported by the annotation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Oncogenicity {
    Oncogenic,
    #[serde(rename = "Likely Oncogenic")]
    LikelyOncogenic,
    Resistance,
    Neutral,
    #[serde(rename = "Likely Neutral")]
    LikelyNeutral,
    Inconclusive,
    Unknown,
}

impl Oncogenicity {
    pub const ALL: [Oncogenicity; 7] = [
        Self::Oncogenic,
        Self::LikelyOncogenic,
        Self::Resistance,
        Self::Neutral,
        Self::LikelyNeutral,
        Self::Inconclusive,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oncogenic => "Oncogenic",
            Self::LikelyOncogenic => "Likely Oncogenic",
            Self::Resistance => "Resistance",
            Self::Neutral => "Neutral",
            Self::LikelyNeutral => "Likely Neutral",
            Self::Inconclusive => "Inconclusive",
            Self::Unknown => "Unknown",
        }
    }

    /// Exact, case-sensitive parse of a service classification string
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.as_str() == value)
    }

    /// Sort score: 5 for oncogenic-like classes, 0 otherwise
    pub fn score(&self) -> u32 {
        match self {
            Self::Oncogenic | Self::LikelyOncogenic | Self::Resistance => 5,
            _ => 0,
        }
    }

    /// CSS class fragment, where one is defined
    pub fn class_name(&self) -> Option<&'static str> {
        match self {
            Self::Oncogenic | Self::LikelyOncogenic | Self::Resistance => Some("oncogenic"),
            Self::LikelyNeutral => Some("neutral"),
            Self::Inconclusive => Some("inconclusive"),
            Self::Unknown => Some("unknown"),
            Self::Neutral => None,
        }
    }
}

impl fmt::Display for Oncogenicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Score of a raw classification string; unrecognized strings score 0
pub fn oncogenic_score(oncogenic: &str) -> u32 {
    Oncogenicity::parse(oncogenic).map_or(0, |o| o.score())
}

pub fn oncogenic_class_name(oncogenic: &str) -> Option<&'static str> {
    Oncogenicity::parse(oncogenic).and_then(|o| o.class_name())
}

/// Trims and lowercases, replacing the first whitespace character with `-`.
///
/// Missing or empty input normalizes to `"unknown"`.
pub fn normalize_oncogenicity(oncogenicity: Option<&str>) -> String {
    let value = oncogenicity
        .filter(|o| !o.is_empty())
        .unwrap_or("unknown")
        .trim()
        .to_lowercase();

    FIRST_WHITESPACE.replace(&value, "-").into_owned()
}
