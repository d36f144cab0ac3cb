//! Typed errors and warnings for research sessions
//!
//! Fatal conditions are `SessionError`; recoverable conditions are
//! `SessionWarning` values carried on the session result, so callers can
//! assert on them instead of scraping logs.

use std::time::Duration;

use thiserror::Error;

/// Fatal session errors
///
/// None of these escape the orchestrator boundary as a panic or an
/// unhandled error; the orchestrator renders each into a status string.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Request failed validation; the engine is never invoked
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The requested provider is not in the catalog; the engine is never invoked
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// The engine call failed; wraps whatever the engine surfaced
    #[error("Research engine error: {0}")]
    Engine(String),

    /// The configured deadline elapsed before the engine returned
    #[error("Research timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid session phase transition
    #[error("Invalid session phase transition: {from} -> {to}")]
    PhaseTransition {
        from: &'static str,
        to: &'static str,
    },
}

impl SessionError {
    /// True when the failure precedes any engine dispatch.
    pub fn is_pre_dispatch(&self) -> bool {
        matches!(
            self,
            SessionError::Validation(_) | SessionError::UnknownProvider(_)
        )
    }
}

/// Non-fatal conditions surfaced on the session result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionWarning {
    /// Requested model is not in the provider's catalog entry; the
    /// provider's default model was substituted
    UnknownModel {
        provider: String,
        requested: String,
        substituted: String,
    },
    /// An uploaded file could not be ingested and was skipped
    FileSkipped { filename: String, reason: String },
}

impl std::fmt::Display for SessionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionWarning::UnknownModel {
                provider,
                requested,
                substituted,
            } => write!(
                f,
                "Unknown model '{}' for provider '{}', using '{}'",
                requested, provider, substituted
            ),
            SessionWarning::FileSkipped { filename, reason } => {
                write!(f, "Skipped file '{}': {}", filename, reason)
            }
        }
    }
}
