//! Annotation scoring, ordering and display helpers

mod alteration;
mod format;
mod layout;
mod level;
mod oncogenicity;

pub use alteration::{Missense, ProteinChange, merge_alterations, positional_variant};
pub use format::{
    annotation_icon_class_names, level_icon_class_names, oncogenic_citations,
    oncogenicity_icon_class_names, treatments_to_string,
};
pub use layout::{IconOffset, oncogenic_x_position, oncogenic_y_position};
pub use level::{
    CardDataType, LEVELS, Levels, diagnostic_level_score, highest_indicator_level,
    level_comparator, normalize_level, prognostic_level_score, resistance_level_score,
    sensitivity_level_score,
};
pub use oncogenicity::{Oncogenicity, normalize_oncogenicity, oncogenic_class_name, oncogenic_score};

use serde::Serialize;

use crate::domain::indicator::IndicatorRecord;

/// Sort scores of one indicator.
///
/// Ordering compares oncogenicity first, then sensitivity, resistance,
/// diagnostic and prognostic levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct IndicatorScores {
    pub oncogenic: u32,
    pub sensitivity: u32,
    pub resistance: u32,
    pub diagnostic: u32,
    pub prognostic: u32,
}

impl IndicatorScores {
    pub fn for_indicator(indicator: &IndicatorRecord) -> Self {
        let level = |l: &Option<String>| l.clone().unwrap_or_default();

        Self {
            oncogenic: oncogenic_score(&indicator.oncogenic),
            sensitivity: sensitivity_level_score(&level(&indicator.highest_sensitive_level)),
            resistance: resistance_level_score(&level(&indicator.highest_resistance_level)),
            diagnostic: diagnostic_level_score(&level(
                &indicator.highest_diagnostic_implication_level,
            )),
            prognostic: prognostic_level_score(&level(
                &indicator.highest_prognostic_implication_level,
            )),
        }
    }
}
