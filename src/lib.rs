//! # Pagetrans Library
//!
//! Library for translating the visible text of web pages via an LLM
//! chat-completion API.
//!
//! ## Module organization
//!
//! - `html` - DOM parsing, serialization, and text extraction
//! - `pipeline` - batching and the page translation orchestrator
//! - `api` - remote provider client and the backend trait
//! - `messaging` - page ↔ privileged-executor request channel
//! - `config` - persisted configuration store
//! - `error` - unified error types

pub mod api;
pub mod config;
pub mod error;
pub mod html;
pub mod messaging;
pub mod pipeline;

// Re-export commonly used items for convenience
pub use api::{ApiClient, ModelInfo, TranslateBackend};
pub use config::{Config, ConfigStore, ConfigUpdate};
pub use error::{TranslateError, TranslateResult};
pub use html::{extract_text_units, html_to_dom, serialize_document, TextUnit};
pub use messaging::{spawn_executor, MessageSender};
pub use pipeline::{batch_texts, Batch, TranslationOrchestrator, TranslationSummary};
