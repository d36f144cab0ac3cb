//! Per-request orchestration of research sessions
//!
//! One `Orchestrator` may serve many concurrent sessions: every session
//! gets its own configuration, documents, request, and phase tracker, so
//! nothing one request does can leak into another. The public `run` never
//! returns an error; all failures render to a status string.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::engine::ResearchEngine;
use crate::session::error::SessionError;
use crate::session::types::{
    ProgressReporter, ProgressSink, ResearchResult, SessionInputs, SessionOutput, SessionPhase,
};
use crate::session::{bridge, format, ingest, request, resolver};

/// Tracks one session's lifecycle, logging each transition.
struct PhaseTracker {
    session: Uuid,
    phase: SessionPhase,
}

impl PhaseTracker {
    fn new(session: Uuid) -> Self {
        Self {
            session,
            phase: SessionPhase::Idle,
        }
    }

    fn advance(&mut self, next: SessionPhase) -> Result<(), SessionError> {
        self.phase = self.phase.advance(next)?;
        tracing::debug!("session {}: entered phase '{}'", self.session, next.name());
        Ok(())
    }

    /// Force the terminal `Failed` state; a no-op once terminal.
    fn fail(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = SessionPhase::Failed;
            tracing::debug!("session {}: entered phase 'failed'", self.session);
        }
    }
}

/// Sequences one research session end to end.
pub struct Orchestrator {
    engine: Arc<dyn ResearchEngine>,
    deadline: Option<Duration>,
    limiter: Option<Arc<Semaphore>>,
}

impl Orchestrator {
    pub fn new(engine: Arc<dyn ResearchEngine>) -> Self {
        Self {
            engine,
            deadline: None,
            limiter: None,
        }
    }

    /// Attach a deadline to each session's engine call.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Cap the number of simultaneously dispatched sessions
    /// (unbounded by default).
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.limiter = Some(Arc::new(Semaphore::new(max)));
        self
    }

    /// Run one session and render its output triple.
    ///
    /// This is the inbound contract: it never fails. Every error becomes a
    /// status string paired with empty report and sources.
    pub async fn run(&self, inputs: SessionInputs, progress: ProgressSink) -> SessionOutput {
        match self.execute(inputs, progress).await {
            Ok(result) => {
                for warning in &result.warnings {
                    tracing::warn!("{}", warning);
                }
                format::render_output(&result)
            }
            Err(err) => {
                if err.is_pre_dispatch() {
                    tracing::warn!("Research session rejected: {}", err);
                } else {
                    tracing::error!("Research session failed: {}", err);
                }
                format::failure_output(&err)
            }
        }
    }

    /// Run one session, returning the typed result.
    ///
    /// Unlike [`run`](Self::run), this surfaces the typed error so hosts
    /// and tests can assert on the failure kind.
    pub async fn execute(
        &self,
        inputs: SessionInputs,
        progress: ProgressSink,
    ) -> Result<ResearchResult, SessionError> {
        let session = Uuid::new_v4();
        let mut tracker = PhaseTracker::new(session);
        let mut reporter = ProgressReporter::new(progress);

        match self.drive(&mut tracker, inputs, &mut reporter).await {
            Ok(result) => {
                tracker.advance(SessionPhase::Completed)?;
                Ok(result)
            }
            Err(err) => {
                tracker.fail();
                Err(err)
            }
        }
    }

    async fn drive(
        &self,
        tracker: &mut PhaseTracker,
        inputs: SessionInputs,
        reporter: &mut ProgressReporter,
    ) -> Result<ResearchResult, SessionError> {
        tracker.advance(SessionPhase::Validating)?;
        let (config, mut warnings) = resolver::resolve_configuration(
            &inputs.provider,
            &inputs.model,
            inputs.max_loops,
            inputs.extra_effort,
            inputs.minimum_effort,
            inputs.steering_enabled,
        )?;

        tracker.advance(SessionPhase::Ingesting)?;
        let bundle = ingest::ingest_documents(&inputs.uploaded_files);
        warnings.extend(bundle.warnings().to_vec());
        let request = request::build_request(&inputs.query, config, bundle, false)?;

        tracker.advance(SessionPhase::Dispatched)?;
        let _permit = match &self.limiter {
            Some(limiter) => Some(
                limiter
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|err| SessionError::Engine(err.to_string()))?,
            ),
            None => None,
        };
        let raw = bridge::dispatch(self.engine.as_ref(), &request, reporter, self.deadline).await?;

        Ok(format::extract_result(&raw, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineRequest;
    use anyhow::Result;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEngine {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl CountingEngine {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ResearchEngine for CountingEngine {
        async fn conduct_research(&self, _request: &EngineRequest) -> Result<serde_json::Value> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(30)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(json!({"research_loop_count": 1}))
        }
    }

    fn inputs(query: &str) -> SessionInputs {
        SessionInputs {
            query: query.to_string(),
            provider: "openai".to_string(),
            model: "o3-mini".to_string(),
            max_loops: 3,
            extra_effort: false,
            minimum_effort: false,
            steering_enabled: false,
            uploaded_files: Vec::new(),
        }
    }

    fn quiet_sink() -> ProgressSink {
        Arc::new(|_| {})
    }

    #[tokio::test]
    async fn test_concurrency_cap_limits_in_flight_sessions() {
        let engine = Arc::new(CountingEngine::new());
        let orchestrator = Arc::new(Orchestrator::new(engine.clone()).with_max_concurrent(2));

        let mut handles = Vec::new();
        for i in 0..6 {
            let orchestrator = orchestrator.clone();
            handles.push(tokio::spawn(async move {
                orchestrator
                    .run(inputs(&format!("query {}", i)), quiet_sink())
                    .await
            }));
        }
        for handle in handles {
            let output = handle.await.unwrap();
            assert!(output.status.contains('✅'));
        }

        assert!(engine.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_unbounded_by_default() {
        let engine = Arc::new(CountingEngine::new());
        let orchestrator = Arc::new(Orchestrator::new(engine.clone()));

        let mut handles = Vec::new();
        for i in 0..4 {
            let orchestrator = orchestrator.clone();
            handles.push(tokio::spawn(async move {
                orchestrator
                    .run(inputs(&format!("query {}", i)), quiet_sink())
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // With no cap and overlapping sleeps, sessions should overlap
        assert!(engine.peak.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn test_execute_surfaces_typed_validation_error() {
        let engine = Arc::new(CountingEngine::new());
        let orchestrator = Orchestrator::new(engine);

        let err = orchestrator
            .execute(inputs("   "), quiet_sink())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
    }
}
