//! Configuration management: the persisted config record and its defaults.

pub mod store;

pub use store::{Config, ConfigStore, ConfigUpdate};

/// Crate-wide constants.
pub mod constants {
    use std::time::Duration;

    // Batch handling
    pub const MAX_BATCH_SIZE: usize = 4000;
    pub const BATCH_SEPARATOR: &str = "\n---SEPARATOR---\n";

    // Remote provider endpoints
    pub const DEFAULT_API_BASE_URL: &str = "https://openrouter.ai/api/v1";
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    // Identifying headers sent alongside the bearer token
    pub const CLIENT_REFERER: &str = "https://github.com/pagetrans/pagetrans";
    pub const CLIENT_TITLE: &str = "pagetrans";

    // Built-in configuration defaults
    pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
    pub const DEFAULT_TARGET_LANGUAGE: &str = "th";
    pub const DEFAULT_MODELS: &[&str] = &[
        "openai/gpt-4o-mini",
        "openai/gpt-4o",
        "google/gemini-2.5-flash-preview:thinking",
    ];
    pub const DEFAULT_CONFIG_FILE: &str = "pagetrans.json";

    // Elements whose subtree contributes no translatable text
    pub const SKIP_ELEMENTS: &[&str] = &["script", "style", "noscript"];
}
