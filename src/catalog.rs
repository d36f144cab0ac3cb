//! Static catalog of supported LLM providers
//!
//! Maps each provider name to its ordered list of model identifiers and the
//! environment variable that carries the provider's API credential. The
//! catalog is consulted by the session configuration resolver; the first
//! model in each list is the provider's substitution default.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// A provider entry in the catalog.
#[derive(Debug)]
pub struct ProviderEntry {
    /// Provider name as accepted on the command line and in requests
    pub name: &'static str,
    /// Supported model identifiers, most preferred first
    pub models: &'static [&'static str],
    /// Environment variable holding the provider's API credential
    pub key_env: &'static str,
}

impl ProviderEntry {
    /// The model substituted when a requested model is not in `models`.
    pub fn default_model(&self) -> &'static str {
        self.models[0]
    }

    /// Whether `model` is one of this provider's supported identifiers.
    pub fn supports_model(&self, model: &str) -> bool {
        self.models.contains(&model)
    }
}

/// Supported providers, in presentation order.
pub const CATALOG: &[ProviderEntry] = &[
    ProviderEntry {
        name: "openai",
        models: &[
            "o4-mini",
            "o4-mini-high",
            "o3-mini",
            "o3-mini-reasoning",
            "gpt-4o",
        ],
        key_env: "OPENAI_API_KEY",
    },
    ProviderEntry {
        name: "anthropic",
        models: &[
            "claude-sonnet-4",
            "claude-sonnet-4-thinking",
            "claude-3-7-sonnet",
            "claude-3-7-sonnet-thinking",
        ],
        key_env: "ANTHROPIC_API_KEY",
    },
    ProviderEntry {
        name: "google",
        models: &[
            "gemini-2.5-pro",
            "gemini-1.5-pro-latest",
            "gemini-1.5-flash-latest",
        ],
        key_env: "GOOGLE_CLOUD_PROJECT",
    },
    ProviderEntry {
        name: "groq",
        models: &[
            "deepseek-r1-distill-llama-70b",
            "llama-3.3-70b-versatile",
            "llama3-70b-8192",
        ],
        key_env: "GROQ_API_KEY",
    },
    ProviderEntry {
        name: "sambanova",
        models: &["DeepSeek-V3-0324"],
        key_env: "SAMBANOVA_API_KEY",
    },
];

static BY_NAME: Lazy<HashMap<&'static str, &'static ProviderEntry>> =
    Lazy::new(|| CATALOG.iter().map(|entry| (entry.name, entry)).collect());

/// All providers in presentation order.
pub fn all() -> &'static [ProviderEntry] {
    CATALOG
}

/// Look up a provider by name.
pub fn find(name: &str) -> Option<&'static ProviderEntry> {
    BY_NAME.get(name).copied()
}
