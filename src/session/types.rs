//! Shared types for research sessions
//!
//! Every value here is created fresh for one request and discarded with it.
//! Configuration, documents, and the built request travel as explicit data
//! through the pipeline; nothing is stashed in process-global state.

use std::path::PathBuf;
use std::sync::Arc;

use crate::session::error::{SessionError, SessionWarning};

/// Immutable per-request configuration
///
/// Constructed only by the resolver and moved into the request it was
/// built for. Fields are read-only after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfiguration {
    provider: String,
    model: String,
    max_loops: u32,
    extra_effort: bool,
    minimum_effort: bool,
    steering_enabled: bool,
}

impl SessionConfiguration {
    pub(crate) fn new(
        provider: String,
        model: String,
        max_loops: u32,
        extra_effort: bool,
        minimum_effort: bool,
        steering_enabled: bool,
    ) -> Self {
        Self {
            provider,
            model,
            max_loops,
            extra_effort,
            minimum_effort,
            steering_enabled,
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Effective research loop budget, always within the resolver's range.
    pub fn max_loops(&self) -> u32 {
        self.max_loops
    }

    pub fn extra_effort(&self) -> bool {
        self.extra_effort
    }

    pub fn minimum_effort(&self) -> bool {
        self.minimum_effort
    }

    pub fn steering_enabled(&self) -> bool {
        self.steering_enabled
    }
}

/// One ingested document, in upload order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    pub text: String,
}

/// Ordered collection of ingested documents plus per-file skip warnings
#[derive(Debug, Clone, Default)]
pub struct DocumentBundle {
    documents: Vec<Document>,
    warnings: Vec<SessionWarning>,
}

impl DocumentBundle {
    pub(crate) fn push_document(&mut self, document: Document) {
        self.documents.push(document);
    }

    pub(crate) fn push_skip(&mut self, filename: String, reason: String) {
        self.warnings
            .push(SessionWarning::FileSkipped { filename, reason });
    }

    /// Documents in upload order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Skip warnings recorded during ingestion.
    pub fn warnings(&self) -> &[SessionWarning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }
}

/// A file handle passed in by the host surface
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub path: PathBuf,
    /// Name shown in document delimiters and warnings
    pub display_name: String,
}

impl UploadedFile {
    /// Build a handle whose display name is the path's final component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, display_name }
    }
}

/// Validated, immutable research request
///
/// Constructed once by the request builder and passed by reference to the
/// engine bridge; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ResearchRequest {
    query: String,
    config: SessionConfiguration,
    documents: DocumentBundle,
    streaming: bool,
}

impl ResearchRequest {
    pub(crate) fn new(
        query: String,
        config: SessionConfiguration,
        documents: DocumentBundle,
        streaming: bool,
    ) -> Self {
        Self {
            query,
            config,
            documents,
            streaming,
        }
    }

    /// Trimmed, non-empty query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn config(&self) -> &SessionConfiguration {
        &self.config
    }

    pub fn documents(&self) -> &DocumentBundle {
        &self.documents
    }

    pub fn streaming(&self) -> bool {
        self.streaming
    }

    /// All documents concatenated into one labeled block, each prefixed
    /// with a `=== File: name ===` delimiter header. `None` when the
    /// bundle is empty.
    pub fn uploaded_content(&self) -> Option<String> {
        if self.documents.is_empty() {
            return None;
        }
        let blocks: Vec<String> = self
            .documents
            .documents()
            .iter()
            .map(|doc| format!("=== File: {} ===\n{}\n", doc.filename, doc.text))
            .collect();
        Some(blocks.join("\n\n"))
    }
}

/// Advisory progress checkpoint
///
/// Fractions are fixed milestones, not engine-internal progress; within one
/// request they never decrease.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub fraction: f64,
    pub label: String,
}

/// Callback receiving progress events for one request
pub type ProgressSink = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Wraps a sink and enforces per-request monotonicity
///
/// Regressive fractions are dropped rather than reported; progress is
/// advisory and must never drive control flow.
pub struct ProgressReporter {
    sink: ProgressSink,
    last: f64,
}

impl ProgressReporter {
    pub fn new(sink: ProgressSink) -> Self {
        Self { sink, last: 0.0 }
    }

    pub fn report(&mut self, fraction: f64, label: &str) {
        let fraction = fraction.clamp(0.0, 1.0);
        if fraction < self.last {
            return;
        }
        self.last = fraction;
        (self.sink)(ProgressEvent {
            fraction,
            label: label.to_string(),
        });
    }
}

/// Final result of one session, built once by the formatter and discarded
/// by the caller
#[derive(Debug, Clone)]
pub struct ResearchResult {
    pub report: String,
    pub sources: Vec<String>,
    pub loop_count: u32,
    pub warnings: Vec<SessionWarning>,
}

/// Rendered output triple of the inbound contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutput {
    pub report: String,
    pub sources: String,
    pub status: String,
}

/// Raw inputs accepted from the host surface, one set per session
#[derive(Debug, Clone)]
pub struct SessionInputs {
    pub query: String,
    pub provider: String,
    pub model: String,
    pub max_loops: u32,
    pub extra_effort: bool,
    pub minimum_effort: bool,
    pub steering_enabled: bool,
    pub uploaded_files: Vec<UploadedFile>,
}

/// Lifecycle of one request
///
/// `Completed` and `Failed` are terminal; a failed request is retried only
/// by constructing a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Validating,
    Ingesting,
    Dispatched,
    Completed,
    Failed,
}

impl SessionPhase {
    pub fn name(self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Validating => "validating",
            SessionPhase::Ingesting => "ingesting",
            SessionPhase::Dispatched => "dispatched",
            SessionPhase::Completed => "completed",
            SessionPhase::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Completed | SessionPhase::Failed)
    }

    /// Validate a transition, returning the new phase.
    ///
    /// Forward moves follow the pipeline order; any non-terminal phase may
    /// move to `Failed`. Terminal phases have no outgoing transitions.
    pub fn advance(self, next: SessionPhase) -> Result<SessionPhase, SessionError> {
        let allowed = match (self, next) {
            (SessionPhase::Idle, SessionPhase::Validating) => true,
            (SessionPhase::Validating, SessionPhase::Ingesting) => true,
            (SessionPhase::Ingesting, SessionPhase::Dispatched) => true,
            (SessionPhase::Dispatched, SessionPhase::Completed) => true,
            (from, SessionPhase::Failed) if !from.is_terminal() => true,
            _ => false,
        };
        if allowed {
            Ok(next)
        } else {
            Err(SessionError::PhaseTransition {
                from: self.name(),
                to: next.name(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording_sink() -> (ProgressSink, Arc<Mutex<Vec<ProgressEvent>>>) {
        let events: Arc<Mutex<Vec<ProgressEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let recorded = events.clone();
        let sink: ProgressSink = Arc::new(move |event| {
            recorded.lock().unwrap().push(event);
        });
        (sink, events)
    }

    #[test]
    fn test_progress_reporter_is_monotonic() {
        let (sink, events) = recording_sink();
        let mut reporter = ProgressReporter::new(sink);

        reporter.report(0.1, "a");
        reporter.report(0.3, "b");
        reporter.report(0.2, "regressive"); // dropped
        reporter.report(1.0, "done");

        let fractions: Vec<f64> = events.lock().unwrap().iter().map(|e| e.fraction).collect();
        assert_eq!(fractions, vec![0.1, 0.3, 1.0]);
    }

    #[test]
    fn test_progress_reporter_clamps_fractions() {
        let (sink, events) = recording_sink();
        let mut reporter = ProgressReporter::new(sink);

        reporter.report(-0.5, "low");
        reporter.report(7.0, "high");

        let fractions: Vec<f64> = events.lock().unwrap().iter().map(|e| e.fraction).collect();
        assert_eq!(fractions, vec![0.0, 1.0]);
    }

    #[test]
    fn test_repeated_fraction_still_reported() {
        let (sink, events) = recording_sink();
        let mut reporter = ProgressReporter::new(sink);

        reporter.report(0.5, "first");
        reporter.report(0.5, "second");

        assert_eq!(events.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_uploaded_content_delimiters() {
        let mut bundle = DocumentBundle::default();
        bundle.push_document(Document {
            filename: "a.txt".into(),
            text: "alpha".into(),
        });
        bundle.push_document(Document {
            filename: "b.txt".into(),
            text: "beta".into(),
        });

        let config =
            SessionConfiguration::new("openai".into(), "o3-mini".into(), 5, false, false, false);
        let request = ResearchRequest::new("query".into(), config, bundle, false);

        let content = request.uploaded_content().unwrap();
        assert_eq!(
            content,
            "=== File: a.txt ===\nalpha\n\n\n=== File: b.txt ===\nbeta\n"
        );
    }

    #[test]
    fn test_uploaded_content_absent_for_empty_bundle() {
        let config =
            SessionConfiguration::new("openai".into(), "o3-mini".into(), 5, false, false, false);
        let request =
            ResearchRequest::new("query".into(), config, DocumentBundle::default(), false);
        assert!(request.uploaded_content().is_none());
    }

    #[test]
    fn test_uploaded_file_display_name() {
        let file = UploadedFile::from_path("/tmp/reports/summary.txt");
        assert_eq!(file.display_name, "summary.txt");
    }

    #[test]
    fn test_phase_forward_chain() {
        let phase = SessionPhase::Idle;
        let phase = phase.advance(SessionPhase::Validating).unwrap();
        let phase = phase.advance(SessionPhase::Ingesting).unwrap();
        let phase = phase.advance(SessionPhase::Dispatched).unwrap();
        let phase = phase.advance(SessionPhase::Completed).unwrap();
        assert!(phase.is_terminal());
    }

    #[test]
    fn test_phase_failure_from_any_active_state() {
        for phase in [
            SessionPhase::Idle,
            SessionPhase::Validating,
            SessionPhase::Ingesting,
            SessionPhase::Dispatched,
        ] {
            assert_eq!(
                phase.advance(SessionPhase::Failed).unwrap(),
                SessionPhase::Failed
            );
        }
    }

    #[test]
    fn test_terminal_phases_reject_transitions() {
        for terminal in [SessionPhase::Completed, SessionPhase::Failed] {
            for next in [
                SessionPhase::Idle,
                SessionPhase::Validating,
                SessionPhase::Dispatched,
                SessionPhase::Failed,
            ] {
                assert!(terminal.advance(next).is_err());
            }
        }
    }

    #[test]
    fn test_phase_cannot_skip_forward() {
        assert!(SessionPhase::Idle.advance(SessionPhase::Dispatched).is_err());
        assert!(SessionPhase::Validating
            .advance(SessionPhase::Completed)
            .is_err());
    }
}
