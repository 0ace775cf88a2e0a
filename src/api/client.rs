//! HTTP client for the OpenRouter-style chat-completion provider.

use reqwest::{RequestBuilder, Response, StatusCode};

use crate::config::constants;
use crate::error::{TranslateError, TranslateResult};

use super::types::{
    ApiErrorResponse, ChatMessage, ChatRequest, ChatResponse, ModelInfo, ModelsResponse,
};

/// Stateless client for the remote translation provider.
///
/// One outbound call per operation, no internal retries. The base URL is
/// overridable for tests and self-hosted gateways.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(constants::REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        ApiClient {
            http,
            base_url: constants::DEFAULT_API_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Translates `text` into `target_lang` using the given model.
    ///
    /// Fails with [`TranslateError::Config`] before any network activity
    /// when any argument is empty. Remote rejections map to `Auth` (401/403)
    /// or `Remote`; transport failures map to `Network`.
    pub async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        model: &str,
        api_key: &str,
    ) -> TranslateResult<String> {
        if text.is_empty() || target_lang.is_empty() || model.is_empty() || api_key.is_empty() {
            return Err(TranslateError::Config(
                "missing required parameters for translation".to_string(),
            ));
        }

        let prompt = format!("Translate the following text to {target_lang}:\n\n{text}\n\nTranslation:");
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model, target_lang, chars = text.chars().count(), "sending translation request");

        let response = self
            .request(self.http.post(format!("{}/chat/completions", self.base_url)), api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranslateError::Network(e.to_string()))?;

        let response = Self::check_status(response).await?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Remote(format!("malformed response: {e}")))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| {
                TranslateError::Remote("response contained no completion choices".to_string())
            })
    }

    /// Best-effort check that the key is accepted by the provider.
    ///
    /// Advisory only: returns `false` on an empty key, a rejected key, or
    /// any network failure, and never errors.
    pub async fn validate_api_key(&self, api_key: &str) -> bool {
        if api_key.is_empty() {
            return false;
        }

        let result = self
            .request(self.http.get(format!("{}/auth/key", self.base_url)), api_key)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "API key validation request failed");
                false
            }
        }
    }

    /// Lists the models available to this key, in provider order.
    pub async fn list_models(&self, api_key: &str) -> TranslateResult<Vec<ModelInfo>> {
        if api_key.is_empty() {
            return Err(TranslateError::Config(
                "API key is required to fetch available models".to_string(),
            ));
        }

        let response = self
            .request(self.http.get(format!("{}/models", self.base_url)), api_key)
            .send()
            .await
            .map_err(|e| TranslateError::Network(e.to_string()))?;

        let response = Self::check_status(response).await?;
        let body: ModelsResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Remote(format!("malformed response: {e}")))?;

        Ok(body.data)
    }

    fn request(&self, builder: RequestBuilder, api_key: &str) -> RequestBuilder {
        builder
            .bearer_auth(api_key)
            .header("HTTP-Referer", constants::CLIENT_REFERER)
            .header("X-Title", constants::CLIENT_TITLE)
    }

    /// Maps non-success statuses onto the error taxonomy, pulling the
    /// provider-supplied message out of the body when there is one.
    async fn check_status(response: Response) -> TranslateResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ApiErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.error)
            .and_then(|error| error.message)
            .unwrap_or_else(|| format!("HTTP {status}"));

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(TranslateError::Auth(message))
        } else {
            Err(TranslateError::Remote(message))
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn translate_with_empty_key_fails_before_network() {
        let client = ApiClient::new();
        let result = client.translate("Hello", "th", "openai/gpt-4o-mini", "").await;

        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[tokio::test]
    async fn translate_with_empty_text_fails_before_network() {
        let client = ApiClient::new();
        let result = client.translate("", "th", "openai/gpt-4o-mini", "sk-key").await;

        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[tokio::test]
    async fn validate_empty_key_is_false_without_network() {
        let client = ApiClient::new();
        assert!(!client.validate_api_key("").await);
    }

    #[tokio::test]
    async fn list_models_requires_key() {
        let client = ApiClient::new();
        let result = client.list_models("").await;

        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[tokio::test]
    async fn unreachable_host_maps_to_network_error() {
        let client = ApiClient::new().with_base_url("http://127.0.0.1:9");
        let result = client.translate("Hello", "th", "m", "sk-key").await;

        assert!(matches!(result, Err(TranslateError::Network(_))));
    }
}
