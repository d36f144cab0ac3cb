//! Research request construction
//!
//! The last validation gate before the engine: an empty query fails here,
//! so no engine interaction can happen for a blank request.

use crate::session::error::SessionError;
use crate::session::types::{DocumentBundle, ResearchRequest, SessionConfiguration};

/// Build an immutable request from a raw query and resolved parts.
///
/// The query is trimmed; a resulting empty string is a fatal
/// `Validation` error raised before any engine call.
pub fn build_request(
    query: &str,
    config: SessionConfiguration,
    documents: DocumentBundle,
    streaming: bool,
) -> Result<ResearchRequest, SessionError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SessionError::Validation("empty query".to_string()));
    }
    Ok(ResearchRequest::new(
        query.to_string(),
        config,
        documents,
        streaming,
    ))
}
