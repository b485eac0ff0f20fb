//! Molecular profile listing client

use async_trait::async_trait;

use crate::domain::{DomainError, MolecularProfile, MolecularProfileFilter};
use crate::infrastructure::http_client::HttpClientTrait;

#[cfg(test)]
use mockall::automock;

/// Lists the molecular profiles of a set of studies
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MolecularProfileClient: Send + Sync {
    async fn fetch_profiles(&self, study_ids: &[String]) -> Result<Vec<MolecularProfile>, DomainError>;
}

/// Portal API implementation
#[derive(Debug)]
pub struct PortalProfileClient<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> PortalProfileClient<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn fetch_url(&self) -> String {
        format!("{}/api/molecular-profiles/fetch", self.base_url)
    }
}

#[async_trait]
impl<C: HttpClientTrait> MolecularProfileClient for PortalProfileClient<C> {
    async fn fetch_profiles(&self, study_ids: &[String]) -> Result<Vec<MolecularProfile>, DomainError> {
        let body = serde_json::to_value(MolecularProfileFilter::for_studies(study_ids))
            .map_err(|e| DomainError::internal(format!("Failed to encode filter: {}", e)))?;

        let response = self
            .client
            .post_json(&self.fetch_url(), vec![("Accept", "application/json")], &body)
            .await?;

        serde_json::from_value(response).map_err(|e| {
            DomainError::provider("portal", format!("Failed to parse profiles: {}", e))
        })
    }
}
