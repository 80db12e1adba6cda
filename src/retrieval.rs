//! Thin contract around the external document-retrieval service. Retrieval
//! is advisory: the soil and crop-planning agents log and continue when it
//! fails, and retrieved documents never gate their output.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const RETRIEVAL_TIMEOUT: Duration = Duration::from_secs(5);
const TOP_K: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedDocument {
    pub id: String,
    pub score: f64,
    #[serde(default)]
    pub metadata: Value,
}

#[async_trait]
pub trait DocumentRetrieval: Send + Sync {
    /// Top-k documents for the query; empty on any failure.
    async fn retrieve(&self, query: &str) -> Vec<RetrievedDocument>;
}

/// HTTP-backed retrieval against an endpoint configured out of band.
#[derive(Debug, Clone)]
pub struct HttpRetrieval {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRetrieval {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[derive(Debug, Serialize)]
struct RetrievalRequest<'a> {
    query: &'a str,
    top_k: usize,
}

#[async_trait]
impl DocumentRetrieval for HttpRetrieval {
    async fn retrieve(&self, query: &str) -> Vec<RetrievedDocument> {
        let response = match self
            .client
            .post(&self.endpoint)
            .timeout(RETRIEVAL_TIMEOUT)
            .json(&RetrievalRequest { query, top_k: TOP_K })
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                warn!(error = %error, "Retrieval request failed");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!(
                status = response.status().as_u16(),
                "Retrieval service returned non-success status"
            );
            return Vec::new();
        }

        match response.json::<Vec<RetrievedDocument>>().await {
            Ok(documents) => {
                debug!(count = documents.len(), "Retrieved documents");
                documents
            }
            Err(error) => {
                warn!(error = %error, "Retrieval response did not parse");
                Vec::new()
            }
        }
    }
}

/// Used when no retrieval endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRetrieval;

#[async_trait]
impl DocumentRetrieval for NoopRetrieval {
    async fn retrieve(&self, _query: &str) -> Vec<RetrievedDocument> {
        Vec::new()
    }
}

/// Build the retrieval adapter from config: HTTP when an endpoint is set,
/// no-op otherwise.
pub fn retrieval_from_config(
    client: &reqwest::Client,
    config: &crate::config::Config,
) -> Arc<dyn DocumentRetrieval> {
    config.retrieval_api_url.as_ref().map_or_else(
        || Arc::new(NoopRetrieval) as Arc<dyn DocumentRetrieval>,
        |endpoint| Arc::new(HttpRetrieval::new(client.clone(), endpoint.clone())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_retrieval_is_always_empty() {
        let documents = NoopRetrieval.retrieve("soil analysis clay").await;
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_degrades_to_empty() {
        let retrieval = HttpRetrieval::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9/retrieve".to_string(),
        );
        assert!(retrieval.retrieve("anything").await.is_empty());
    }
}
