//! HTTP client for a remotely hosted research engine

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{EngineRequest, ResearchEngine};

/// Reaches a research engine over HTTP: one JSON POST per session,
/// no retries, no streaming.
pub struct RemoteEngine {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteEngine {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/research", self.base_url)
    }
}

#[async_trait]
impl ResearchEngine for RemoteEngine {
    async fn conduct_research(&self, request: &EngineRequest) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .context("Failed to send request to research engine")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Research engine error ({}): {}", status, error_text);
        }

        response
            .json::<serde_json::Value>()
            .await
            .context("Failed to parse research engine response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let engine = RemoteEngine::new("http://localhost:8000");
        assert_eq!(engine.endpoint(), "http://localhost:8000/research");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let engine = RemoteEngine::new("http://localhost:8000/");
        assert_eq!(engine.endpoint(), "http://localhost:8000/research");
    }
}
