//! Sprite offsets for oncogenicity and level icons

use serde::Serialize;

use super::level::normalize_level;
use super::oncogenicity::Oncogenicity;
use crate::domain::indicator::IndicatorRecord;

/// Horizontal offset for a normalized sensitivity level.
///
/// Stronger levels sit further left.
pub fn oncogenic_x_position(highest_sensitive_level: Option<&str>) -> i32 {
    let index = match highest_sensitive_level {
        Some("1") => 1,
        Some("2") => 2,
        Some("3A") => 4,
        Some("3B") => 5,
        Some("4") => 6,
        _ => 0,
    };

    -(8 + index * 30)
}

/// Vertical offset from the oncogenicity row and the resistance column.
pub fn oncogenic_y_position(oncogenicity: &str, is_vus: bool, resistance_level: Option<&str>) -> i32 {
    let mut oncogenicity_index = match Oncogenicity::parse(oncogenicity) {
        Some(Oncogenicity::Oncogenic | Oncogenicity::LikelyOncogenic | Oncogenicity::Resistance) => 0,
        Some(Oncogenicity::Neutral | Oncogenicity::LikelyNeutral) => 1,
        Some(Oncogenicity::Unknown | Oncogenicity::Inconclusive) => 2,
        None => 4,
    };
    if oncogenicity_index > 1 && is_vus {
        oncogenicity_index = 3;
    }

    let resistance_index = match resistance_level {
        Some("R1") => 1,
        Some("R2") => 2,
        Some("R3") => 3,
        _ => 0,
    };

    -(7 + oncogenicity_index * 120 + resistance_index * 30)
}

/// Sprite offset for an indicator's oncogenicity icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IconOffset {
    pub x: i32,
    pub y: i32,
}

impl IconOffset {
    pub fn for_indicator(indicator: &IndicatorRecord) -> Self {
        let sensitive = indicator
            .highest_sensitive_level
            .as_deref()
            .and_then(normalize_level);
        let resistance = indicator
            .highest_resistance_level
            .as_deref()
            .and_then(normalize_level);

        Self {
            x: oncogenic_x_position(sensitive.as_deref()),
            y: oncogenic_y_position(&indicator.oncogenic, indicator.vus, resistance.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::variant::VariantId;

    #[test]
    fn test_x_position() {
        assert_eq!(oncogenic_x_position(None), -8);
        assert_eq!(oncogenic_x_position(Some("1")), -38);
        assert_eq!(oncogenic_x_position(Some("2")), -68);
        assert_eq!(oncogenic_x_position(Some("3A")), -128);
        assert_eq!(oncogenic_x_position(Some("3B")), -158);
        assert_eq!(oncogenic_x_position(Some("4")), -188);
        assert_eq!(oncogenic_x_position(Some("R1")), -8);
    }

    #[test]
    fn test_y_position() {
        assert_eq!(oncogenic_y_position("Oncogenic", false, None), -7);
        assert_eq!(oncogenic_y_position("Likely Neutral", false, None), -127);
        assert_eq!(oncogenic_y_position("Unknown", false, None), -247);
        assert_eq!(oncogenic_y_position("Something Else", false, None), -487);
        assert_eq!(oncogenic_y_position("Oncogenic", false, Some("R2")), -67);
        assert_eq!(oncogenic_y_position("Oncogenic", false, Some("LEVEL_R2")), -7);
    }

    #[test]
    fn test_vus_overrides_only_unknown_like_rows() {
        assert_eq!(oncogenic_y_position("Unknown", true, None), -367);
        assert_eq!(oncogenic_y_position("Bogus", true, None), -367);
        assert_eq!(oncogenic_y_position("Likely Neutral", true, None), -127);
        assert_eq!(oncogenic_y_position("Oncogenic", true, None), -7);
    }

    #[test]
    fn test_offset_for_indicator_normalizes_levels() {
        let id = VariantId::for_mutation(673, "Melanoma", "V600E", "Missense_Mutation");
        let mut record = IndicatorRecord::new(&id, "Oncogenic");
        record.highest_sensitive_level = Some("LEVEL_1".into());
        record.highest_resistance_level = Some("LEVEL_R1".into());

        assert_eq!(IconOffset::for_indicator(&record), IconOffset { x: -38, y: -37 });
    }
}
