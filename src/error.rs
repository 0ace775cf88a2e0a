//! Unified error handling for the translation pipeline.

use thiserror::Error;

/// Errors produced by the translation pipeline.
///
/// The taxonomy mirrors how failures are surfaced to the user: `Config`
/// aborts an operation before any network activity, `Auth`/`Remote`/`Network`
/// are reported per batch without stopping sibling batches, and `Busy`
/// rejects a second page translation while one is in flight.
///
/// Variants carry plain strings so errors stay `Clone`: the orchestrator
/// records a representative error while the remaining batch responses
/// continue to arrive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// A required input is missing or empty (e.g. an unset API key).
    #[error("configuration error: {0}")]
    Config(String),

    /// The remote service rejected the API key.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// The remote service returned an application-level error.
    #[error("translation API error: {0}")]
    Remote(String),

    /// The remote call could not be completed at all.
    #[error("network error: {0}")]
    Network(String),

    /// The page context lost contact with the privileged executor.
    #[error("messaging channel error: {0}")]
    Channel(String),

    /// Reading or writing the persisted configuration failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A page translation is already in flight on this orchestrator.
    #[error("a page translation is already in progress")]
    Busy,
}

/// Result type alias used throughout the crate.
pub type TranslateResult<T> = Result<T, TranslateError>;
