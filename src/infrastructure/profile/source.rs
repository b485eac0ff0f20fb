//! Per-study molecular profile cache

use std::sync::Arc;

use async_trait::async_trait;

use super::client::MolecularProfileClient;
use crate::domain::profile::profiles_by_study;
use crate::domain::{AugmentedData, BatchSource, DomainError, MolecularProfile};
use crate::infrastructure::cache::LazyBatchCache;

/// Batch source keyed by study id; each slot holds that study's profiles
#[derive(Clone)]
pub struct MolecularProfileSource {
    client: Arc<dyn MolecularProfileClient>,
}

impl MolecularProfileSource {
    pub fn new(client: Arc<dyn MolecularProfileClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BatchSource for MolecularProfileSource {
    type Query = String;
    type Key = String;
    type Data = MolecularProfile;
    type Meta = String;

    fn query_key(&self, study_id: &String) -> String {
        study_id.clone()
    }

    fn data_key(&self, _profile: &MolecularProfile, study_id: &String) -> String {
        study_id.clone()
    }

    async fn fetch(
        &self,
        study_ids: &[String],
    ) -> Result<Vec<AugmentedData<MolecularProfile, String>>, DomainError> {
        let profiles = self.client.fetch_profiles(study_ids).await?;

        Ok(profiles_by_study(study_ids, profiles)
            .into_iter()
            .map(|(study_id, profiles)| AugmentedData::new(profiles, study_id))
            .collect())
    }
}

pub type MolecularProfilesInStudyCache = LazyBatchCache<MolecularProfileSource>;

pub fn molecular_profiles_in_study_cache(
    client: Arc<dyn MolecularProfileClient>,
) -> MolecularProfilesInStudyCache {
    LazyBatchCache::new("molecular_profiles_in_study", MolecularProfileSource::new(client))
}
