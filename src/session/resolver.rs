//! Session configuration resolution
//!
//! Normalizes raw provider/model/effort inputs into an immutable
//! [`SessionConfiguration`]. The resolved configuration is returned to the
//! caller and threaded through every downstream call as data. It is never
//! written into environment variables or other process-wide state, so
//! concurrent sessions cannot observe each other's settings.

use crate::catalog;
use crate::session::error::{SessionError, SessionWarning};
use crate::session::types::SessionConfiguration;

/// Inclusive research loop bounds
pub const MIN_LOOPS: u32 = 1;
pub const MAX_LOOPS: u32 = 20;

/// Resolve raw inputs into a configuration plus non-fatal warnings.
///
/// An unknown provider is fatal. An unknown model is substituted with the
/// provider's default and reported as a warning. `minimum_effort` forces a
/// single loop and overrides `extra_effort`.
pub fn resolve_configuration(
    provider: &str,
    model: &str,
    max_loops: u32,
    extra_effort: bool,
    minimum_effort: bool,
    steering_enabled: bool,
) -> Result<(SessionConfiguration, Vec<SessionWarning>), SessionError> {
    let entry = catalog::find(provider)
        .ok_or_else(|| SessionError::UnknownProvider(provider.to_string()))?;

    let mut warnings = Vec::new();
    let model = if entry.supports_model(model) {
        model.to_string()
    } else {
        let substituted = entry.default_model().to_string();
        tracing::warn!(
            "Unknown model '{}' for provider '{}', using '{}'",
            model,
            provider,
            substituted
        );
        warnings.push(SessionWarning::UnknownModel {
            provider: provider.to_string(),
            requested: model.to_string(),
            substituted: substituted.clone(),
        });
        substituted
    };

    let clamped = max_loops.clamp(MIN_LOOPS, MAX_LOOPS);
    let (max_loops, extra_effort) = if minimum_effort {
        (MIN_LOOPS, false)
    } else {
        (clamped, extra_effort)
    };

    Ok((
        SessionConfiguration::new(
            provider.to_string(),
            model,
            max_loops,
            extra_effort,
            minimum_effort,
            steering_enabled,
        ),
        warnings,
    ))
}
