//! Protein change parsing and alteration compaction

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;

static MISSENSE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Z])([0-9]+)([A-Z])$").unwrap());

static PROTEIN_CHANGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]+)([0-9]+)([A-Z]*)$").unwrap());

/// A single-residue substitution such as `V600E`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Missense {
    pub reference: char,
    pub position: u64,
    pub variant: char,
}

impl Missense {
    pub fn parse(alteration: &str) -> Option<Self> {
        let caps = MISSENSE_PATTERN.captures(alteration)?;

        Some(Self {
            reference: caps[1].chars().next()?,
            position: caps[2].parse().ok()?,
            variant: caps[3].chars().next()?,
        })
    }
}

/// Reference residues, position and (possibly empty) variant residues
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinChange<'a> {
    pub reference: &'a str,
    pub position: &'a str,
    pub variant: &'a str,
}

impl<'a> ProteinChange<'a> {
    pub fn parse(alteration: &'a str) -> Option<Self> {
        let caps = PROTEIN_CHANGE_PATTERN.captures(alteration)?;

        Some(Self {
            reference: caps.get(1)?.as_str(),
            position: caps.get(2)?.as_str(),
            variant: caps.get(3)?.as_str(),
        })
    }

    /// True for a positional variant (`V600`) or a same-length substitution
    pub fn is_positional_or_substitution(&self) -> bool {
        self.variant.is_empty() || self.reference.len() == self.variant.len()
    }
}

/// Positional form of a missense or positional alteration, e.g. `V600E` and
/// `V600` both give `V600`. Anything else gives `None`.
pub fn positional_variant(alteration: &str) -> Option<String> {
    let change = ProteinChange::parse(alteration)?;

    if !change.is_positional_or_substitution() {
        return None;
    }

    let first = change.reference.chars().next()?;
    Some(format!("{}{}", first, change.position))
}

/// Compacts same-position missense alterations: `["V600E", "V600K"]` gives
/// `"V600E/K"`.
///
/// Alterations that are not single-residue missense changes come first, in
/// input order, followed by the compacted groups by ascending position and
/// then reference residue. Duplicates collapse.
pub fn merge_alterations<S: AsRef<str>>(alterations: &[S]) -> String {
    let mut positions: BTreeMap<u64, BTreeMap<char, BTreeSet<char>>> = BTreeMap::new();
    let mut merged: Vec<String> = Vec::new();

    for alteration in alterations {
        let alteration = alteration.as_ref();
        match Missense::parse(alteration) {
            Some(missense) => {
                positions
                    .entry(missense.position)
                    .or_default()
                    .entry(missense.reference)
                    .or_default()
                    .insert(missense.variant);
            }
            None => merged.push(alteration.to_string()),
        }
    }

    for (position, references) in positions {
        for (reference, variants) in references {
            let variants: Vec<String> = variants.into_iter().map(String::from).collect();
            merged.push(format!("{}{}{}", reference, position, variants.join("/")));
        }
    }

    merged.join(", ")
}
