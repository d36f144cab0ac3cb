//! Research engine collaborator seam
//!
//! The multi-agent engine (planning, specialized search, reflection,
//! synthesis) lives behind [`ResearchEngine`]: a single-shot asynchronous
//! call with no incremental progress channel. Its result is a loosely
//! structured JSON mapping; the session formatter extracts fields
//! defensively and never trusts a fixed schema.

mod remote;

pub use remote::RemoteEngine;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::session::ResearchRequest;

/// Wire request accepted by the engine's research entry point
#[derive(Debug, Clone, Serialize)]
pub struct EngineRequest {
    pub query: String,
    pub extra_effort: bool,
    pub minimum_effort: bool,
    pub provider: String,
    pub model: String,
    /// Research loop budget; carried on the wire rather than through
    /// shared process state, so concurrent sessions cannot cross-talk
    pub max_loops: u32,
    pub streaming: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_content: Option<String>,
    pub steering_enabled: bool,
}

impl EngineRequest {
    /// Build the wire request from a validated session request.
    pub fn from_request(request: &ResearchRequest) -> Self {
        let config = request.config();
        Self {
            query: request.query().to_string(),
            extra_effort: config.extra_effort(),
            minimum_effort: config.minimum_effort(),
            provider: config.provider().to_string(),
            model: config.model().to_string(),
            max_loops: config.max_loops(),
            streaming: request.streaming(),
            uploaded_content: request.uploaded_content(),
            steering_enabled: config.steering_enabled(),
        }
    }
}

/// The external research engine
///
/// Implementations may fail with any error kind; the execution bridge
/// catches everything at its boundary.
#[async_trait]
pub trait ResearchEngine: Send + Sync {
    /// Run one research session and return the raw result mapping.
    ///
    /// Expected (but not guaranteed) keys: `running_summary` (string),
    /// `sources_gathered` (array of strings), `research_loop_count`
    /// (integer).
    async fn conduct_research(&self, request: &EngineRequest) -> Result<serde_json::Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{build_request, resolve_configuration, DocumentBundle};

    #[test]
    fn test_wire_request_mirrors_session_request() {
        let (config, _) =
            resolve_configuration("anthropic", "claude-sonnet-4", 8, true, false, true).unwrap();
        let request = build_request("dark matter", config, DocumentBundle::default(), false)
            .unwrap();

        let wire = EngineRequest::from_request(&request);
        assert_eq!(wire.query, "dark matter");
        assert_eq!(wire.provider, "anthropic");
        assert_eq!(wire.model, "claude-sonnet-4");
        assert_eq!(wire.max_loops, 8);
        assert!(wire.extra_effort);
        assert!(wire.steering_enabled);
        assert!(wire.uploaded_content.is_none());
    }

    #[test]
    fn test_wire_request_omits_absent_upload() {
        let (config, _) =
            resolve_configuration("openai", "o3-mini", 5, false, false, false).unwrap();
        let request =
            build_request("topic", config, DocumentBundle::default(), false).unwrap();

        let wire = EngineRequest::from_request(&request);
        let json = serde_json::to_value(&wire).unwrap();
        assert!(json.get("uploaded_content").is_none());
        assert_eq!(json["streaming"], serde_json::json!(false));
    }
}
