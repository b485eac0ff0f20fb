//! Annotation service client

use async_trait::async_trait;

use super::query::{ProteinChangeQuery, StructuralVariantQuery};
use crate::domain::{DomainError, IndicatorRecord};
use crate::infrastructure::http_client::HttpClientTrait;

#[cfg(test)]
use mockall::automock;

const DEFAULT_ONCOKB_BASE_URL: &str = "https://www.oncokb.org";

/// Batch annotation endpoints.
///
/// Each call answers with one record per matched query; a query without a
/// match is simply absent from the response.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AnnotationClient: Send + Sync {
    async fn annotate_protein_changes(
        &self,
        queries: &[ProteinChangeQuery],
    ) -> Result<Vec<IndicatorRecord>, DomainError>;

    async fn annotate_structural_variants(
        &self,
        queries: &[StructuralVariantQuery],
    ) -> Result<Vec<IndicatorRecord>, DomainError>;
}

/// OncoKB API client
#[derive(Debug)]
pub struct OncoKbAnnotator<C: HttpClientTrait> {
    client: C,
    auth_header: Option<String>,
    base_url: String,
}

impl<C: HttpClientTrait> OncoKbAnnotator<C> {
    pub fn new(client: C, token: Option<String>) -> Self {
        Self::with_base_url(client, token, DEFAULT_ONCOKB_BASE_URL)
    }

    pub fn with_base_url(client: C, token: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            auth_header: token
                .filter(|t| !t.is_empty())
                .map(|t| format!("Bearer {}", t)),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(auth) = &self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }
        headers
    }

    async fn annotate<Q: serde::Serialize + Sync>(
        &self,
        endpoint: &str,
        queries: &[Q],
    ) -> Result<Vec<IndicatorRecord>, DomainError> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/api/v1/annotate/{}", self.base_url, endpoint);
        let body = serde_json::to_value(queries)
            .map_err(|e| DomainError::internal(format!("Failed to encode queries: {}", e)))?;

        let response = self.client.post_json(&url, self.headers(), &body).await?;

        let records: Vec<IndicatorRecord> = serde_json::from_value(response).map_err(|e| {
            DomainError::provider("oncokb", format!("Failed to parse response: {}", e))
        })?;

        tracing::debug!(
            endpoint,
            queries = queries.len(),
            records = records.len(),
            "Annotated batch"
        );

        Ok(records)
    }
}

#[async_trait]
impl<C: HttpClientTrait> AnnotationClient for OncoKbAnnotator<C> {
    async fn annotate_protein_changes(
        &self,
        queries: &[ProteinChangeQuery],
    ) -> Result<Vec<IndicatorRecord>, DomainError> {
        self.annotate("mutations/byProteinChange", queries).await
    }

    async fn annotate_structural_variants(
        &self,
        queries: &[StructuralVariantQuery],
    ) -> Result<Vec<IndicatorRecord>, DomainError> {
        self.annotate("structuralVariants", queries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mutation;
    use crate::infrastructure::annotation::AnnotationQuery;
    use crate::infrastructure::http_client::mock::MockHttpClient;
    use serde_json::json;

    const PROTEIN_CHANGE_URL: &str = "http://oncokb.test/api/v1/annotate/mutations/byProteinChange";

    fn v600e_query() -> ProteinChangeQuery {
        let mutation = Mutation::point(673, "V600E", "Missense_Mutation").with_position(600);
        match AnnotationQuery::for_mutation(&mutation, "Melanoma", 673) {
            AnnotationQuery::ProteinChange(q) => q,
            AnnotationQuery::StructuralVariant(_) => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_annotate_protein_changes() {
        let query = v600e_query();
        let client = MockHttpClient::new().with_response(
            PROTEIN_CHANGE_URL,
            json!([{
                "query": {"id": query.id.as_str(), "entrezGeneId": 673, "alteration": "V600E"},
                "oncogenic": "Oncogenic",
                "highestSensitiveLevel": "LEVEL_1"
            }]),
        );
        let annotator =
            OncoKbAnnotator::with_base_url(client, Some("token".into()), "http://oncokb.test/");

        let records = annotator
            .annotate_protein_changes(std::slice::from_ref(&query))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].query_id(), Some(query.id.as_str()));
        assert_eq!(records[0].highest_sensitive_level.as_deref(), Some("LEVEL_1"));

        let requests = annotator.client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].1[0]["alteration"], "V600E");
    }

    #[tokio::test]
    async fn test_empty_batch_skips_request() {
        let annotator = OncoKbAnnotator::new(MockHttpClient::new(), None);

        let records = annotator.annotate_structural_variants(&[]).await.unwrap();

        assert!(records.is_empty());
        assert!(annotator.client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_headers_include_token_only_when_set() {
        let with_token = OncoKbAnnotator::new(MockHttpClient::new(), Some("abc".into()));
        assert!(with_token.headers().contains(&("Authorization", "Bearer abc")));

        let without = OncoKbAnnotator::new(MockHttpClient::new(), Some(String::new()));
        assert!(without.headers().iter().all(|(k, _)| *k != "Authorization"));
    }

    #[tokio::test]
    async fn test_service_error_propagates() {
        let client = MockHttpClient::new().with_error(PROTEIN_CHANGE_URL, "HTTP 401");
        let annotator = OncoKbAnnotator::with_base_url(client, None, "http://oncokb.test");

        let error = annotator
            .annotate_protein_changes(&[v600e_query()])
            .await
            .unwrap_err();

        assert!(error.to_string().contains("HTTP 401"));
    }
}
