//! Remote translation provider: wire types, HTTP client, and the backend
//! trait the privileged executor is generic over.

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::ModelInfo;

use async_trait::async_trait;

use crate::error::TranslateResult;

/// A translation backend: text + target language + model + key in,
/// translated text or a typed failure out.
///
/// [`ApiClient`] is the production implementation; tests substitute their
/// own. Implementations must not retry internally; retry policy, if any,
/// belongs to the caller.
#[async_trait]
pub trait TranslateBackend: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        model: &str,
        api_key: &str,
    ) -> TranslateResult<String>;
}

#[async_trait]
impl TranslateBackend for ApiClient {
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        model: &str,
        api_key: &str,
    ) -> TranslateResult<String> {
        ApiClient::translate(self, text, target_lang, model, api_key).await
    }
}
