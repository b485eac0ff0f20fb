//! Molecular profile entity

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One molecular profile of a study, as listed by the portal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MolecularProfile {
    pub molecular_profile_id: String,
    pub study_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub molecular_alteration_type: Option<String>,
    #[serde(default)]
    pub datatype: Option<String>,
    #[serde(default)]
    pub show_profile_in_analysis_tab: bool,
    #[serde(default)]
    pub patient_level: bool,
    #[serde(default)]
    pub generic_assay_type: Option<String>,
}

impl MolecularProfile {
    pub fn new(study_id: impl Into<String>, molecular_profile_id: impl Into<String>) -> Self {
        Self {
            molecular_profile_id: molecular_profile_id.into(),
            study_id: study_id.into(),
            ..Default::default()
        }
    }

    pub fn with_alteration_type(mut self, alteration_type: impl Into<String>) -> Self {
        self.molecular_alteration_type = Some(alteration_type.into());
        self
    }
}

/// Request body for listing the profiles of a set of studies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MolecularProfileFilter {
    pub study_ids: Vec<String>,
}

impl MolecularProfileFilter {
    pub fn for_studies(study_ids: &[String]) -> Self {
        Self {
            study_ids: study_ids.to_vec(),
        }
    }
}

/// Groups profiles by study. Every requested study gets an entry, empty when
/// the listing returned nothing for it; profiles of unrequested studies are
/// dropped.
pub fn profiles_by_study(
    study_ids: &[String],
    profiles: Vec<MolecularProfile>,
) -> Vec<(String, Vec<MolecularProfile>)> {
    let mut grouped: HashMap<String, Vec<MolecularProfile>> = HashMap::new();
    for profile in profiles {
        grouped.entry(profile.study_id.clone()).or_default().push(profile);
    }

    study_ids
        .iter()
        .map(|study_id| {
            let profiles = grouped.get(study_id).cloned().unwrap_or_default();
            (study_id.clone(), profiles)
        })
        .collect()
}
