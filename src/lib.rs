//! delver: deep research sessions from the command line
//!
//! This library provides:
//! - Request-scoped session configuration resolved against a static
//!   provider catalog
//! - Defensive ingestion of uploaded documents with per-file skip warnings
//! - A single-shot execution bridge to an external multi-agent research
//!   engine, with advisory progress milestones and an optional deadline
//! - Defensive formatting of the engine's loosely structured results into
//!   stable report/sources/status strings
//!
//! The research engine itself (query planning, specialized search agents,
//! reflection, synthesis) is an external collaborator reached through the
//! [`engine::ResearchEngine`] trait.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod session;

pub use config::Config;
pub use session::Orchestrator;
