//! Tumor type naming

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainType {
    #[serde(default)]
    pub name: Option<String>,
}

/// Tumor type as reported by the annotation service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TumorType {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub main_type: Option<MainType>,
}

impl TumorType {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            main_type: None,
        }
    }
}

/// Display name of a tumor type, falling back to its main type, then ""
pub fn tumor_type_name(tumor_type: Option<&TumorType>) -> String {
    let Some(tumor_type) = tumor_type else {
        return String::new();
    };

    non_empty(tumor_type.name.as_deref())
        .or_else(|| {
            tumor_type
                .main_type
                .as_ref()
                .and_then(|main| non_empty(main.name.as_deref()))
        })
        .map(str::to_string)
        .unwrap_or_default()
}

/// Display name with the excluded tumor types appended, e.g.
/// `"All Solid Tumors (excluding Melanoma, Thyroid Cancer)"`
pub fn tumor_type_name_with_exclusions(
    tumor_type: Option<&TumorType>,
    excluded: &[TumorType],
) -> String {
    let name = tumor_type_name(tumor_type);

    if excluded.is_empty() {
        return name;
    }

    let excluded_names: Vec<String> = excluded
        .iter()
        .map(|t| tumor_type_name(Some(t)))
        .collect();

    format!("{} (excluding {})", name, excluded_names.join(", "))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_prefers_subtype() {
        let tumor_type = TumorType {
            name: Some("Cutaneous Melanoma".into()),
            main_type: Some(MainType {
                name: Some("Melanoma".into()),
            }),
        };
        assert_eq!(tumor_type_name(Some(&tumor_type)), "Cutaneous Melanoma");
    }

    #[test]
    fn test_name_falls_back_to_main_type() {
        let tumor_type = TumorType {
            name: None,
            main_type: Some(MainType {
                name: Some("Melanoma".into()),
            }),
        };
        assert_eq!(tumor_type_name(Some(&tumor_type)), "Melanoma");
        assert_eq!(tumor_type_name(Some(&TumorType::default())), "");
        assert_eq!(tumor_type_name(None), "");
    }

    #[test]
    fn test_name_with_exclusions() {
        let all_solid = TumorType::named("All Solid Tumors");
        let excluded = vec![TumorType::named("Melanoma"), TumorType::named("Thyroid Cancer")];

        assert_eq!(
            tumor_type_name_with_exclusions(Some(&all_solid), &excluded),
            "All Solid Tumors (excluding Melanoma, Thyroid Cancer)"
        );
        assert_eq!(
            tumor_type_name_with_exclusions(Some(&all_solid), &[]),
            "All Solid Tumors"
        );
    }
}
