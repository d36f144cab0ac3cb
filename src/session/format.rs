//! Defensive formatting of engine results
//!
//! The engine's result mapping has no guaranteed schema. Every field is
//! extracted with an explicit fallback and nothing here can fail: a
//! missing or mistyped field degrades to its documented default.

use serde_json::Value;

use crate::session::error::{SessionError, SessionWarning};
use crate::session::types::{ResearchResult, SessionOutput};

/// Report text used when the engine returns none
pub const EMPTY_REPORT_PLACEHOLDER: &str = "No report generated";

/// Rendered source list used when the engine gathered none
pub const NO_SOURCES_PLACEHOLDER: &str = "No sources gathered";

/// Extract a result from the raw engine mapping.
///
/// `running_summary` → report, `sources_gathered` → sources (non-string
/// entries dropped), `research_loop_count` → loop count. Absent or
/// mistyped fields fall back to their defaults; this never fails.
pub fn extract_result(raw: &Value, warnings: Vec<SessionWarning>) -> ResearchResult {
    let report = raw
        .get("running_summary")
        .and_then(Value::as_str)
        .unwrap_or(EMPTY_REPORT_PLACEHOLDER)
        .to_string();

    let sources = raw
        .get("sources_gathered")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let loop_count = raw
        .get("research_loop_count")
        .and_then(Value::as_u64)
        .and_then(|count| u32::try_from(count).ok())
        .unwrap_or(0);

    ResearchResult {
        report,
        sources,
        loop_count,
        warnings,
    }
}

/// One bullet line per source, in the order received.
pub fn render_sources(sources: &[String]) -> String {
    if sources.is_empty() {
        return NO_SOURCES_PLACEHOLDER.to_string();
    }
    sources
        .iter()
        .map(|source| format!("- {}", source))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Status line for a completed session.
pub fn success_status(loop_count: u32) -> String {
    format!(
        "✅ Research complete! Conducted {} research loops.",
        loop_count
    )
}

/// Status line for a failed session.
pub fn failure_status(error: &SessionError) -> String {
    match error {
        SessionError::Validation(_) => "❌ Please enter a research query".to_string(),
        other => format!("❌ Error during research: {}", other),
    }
}

/// Render the output triple for a completed session.
pub fn render_output(result: &ResearchResult) -> SessionOutput {
    SessionOutput {
        report: result.report.clone(),
        sources: render_sources(&result.sources),
        status: success_status(result.loop_count),
    }
}

/// Render the output triple for a failed session: empty report and
/// sources, status carrying the captured error.
pub fn failure_output(error: &SessionError) -> SessionOutput {
    SessionOutput {
        report: String::new(),
        sources: String::new(),
        status: failure_status(error),
    }
}

/// Compose the full markdown document for saving a session's output.
pub fn render_markdown(output: &SessionOutput) -> String {
    format!(
        "# Research Report\n\n{report}\n\n---\n\n## Sources\n{sources}\n\n---\n\n**Status**: {status}\n",
        report = output.report,
        sources = output.sources,
        status = output.status,
    )
}
