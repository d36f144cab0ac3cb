//! Research session orchestration
//!
//! The per-request pipeline: resolve configuration, ingest documents,
//! build the immutable request, dispatch to the engine, format the result.
//! Every entity is created fresh for one session and discarded with it;
//! configuration travels as explicit data, never through shared state.

pub mod bridge;
pub mod error;
pub mod format;
pub mod ingest;
pub mod orchestrator;
pub mod request;
pub mod resolver;
pub mod types;

pub use error::{SessionError, SessionWarning};
pub use format::render_markdown;
pub use ingest::ingest_documents;
pub use orchestrator::Orchestrator;
pub use request::build_request;
pub use resolver::{resolve_configuration, MAX_LOOPS, MIN_LOOPS};
pub use types::{
    Document, DocumentBundle, ProgressEvent, ProgressSink, ResearchRequest, ResearchResult,
    SessionConfiguration, SessionInputs, SessionOutput, SessionPhase, UploadedFile,
};
