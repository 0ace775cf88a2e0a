//! The page translation pipeline: batching and orchestration.

pub mod batch;
pub mod orchestrator;

pub use batch::{batch_texts, Batch};
pub use orchestrator::{TranslationOrchestrator, TranslationSummary};
