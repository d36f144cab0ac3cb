//! Execution bridge between a validated request and the research engine
//!
//! Single-shot orchestration: the engine is invoked exactly once per
//! request, behind an optional deadline. Milestones are fixed advisory
//! fractions because the engine exposes no incremental progress channel.
//! Every engine failure is captured here as a typed error; nothing from
//! the engine propagates past this boundary unhandled.

use std::time::Duration;

use crate::engine::{EngineRequest, ResearchEngine};
use crate::session::error::SessionError;
use crate::session::types::{ProgressReporter, ResearchRequest};

/// Dispatch one request to the engine and return the raw result mapping.
///
/// A `deadline` elapse yields `SessionError::Timeout` without blocking;
/// whether the engine call itself is interrupted is an engine property
/// this layer does not assume.
pub async fn dispatch(
    engine: &dyn ResearchEngine,
    request: &ResearchRequest,
    progress: &mut ProgressReporter,
    deadline: Option<Duration>,
) -> Result<serde_json::Value, SessionError> {
    progress.report(0.1, "Initializing research...");
    tracing::info!("Starting research: {:.50}...", request.query());

    let engine_request = EngineRequest::from_request(request);
    if engine_request.uploaded_content.is_some() {
        progress.report(0.2, "Processing uploaded files...");
    }

    progress.report(0.3, "Starting deep research...");

    let call = engine.conduct_research(&engine_request);
    let outcome = match deadline {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!("Research timed out after {:?}", limit);
                return Err(SessionError::Timeout(limit));
            }
        },
        None => call.await,
    };

    let raw = outcome.map_err(|err| SessionError::Engine(err.to_string()))?;

    progress.report(1.0, "Research complete!");
    Ok(raw)
}
