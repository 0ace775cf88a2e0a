//! The privileged executor task: owns the API key and performs remote calls.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::TranslateBackend;
use crate::config::ConfigStore;
use crate::error::{TranslateError, TranslateResult};

use super::{MessageSender, PageMessage};

/// Starts the executor task and returns the page-context handle to it.
///
/// The executor services requests until every [`MessageSender`] clone is
/// dropped. Translate requests are handled on their own spawned tasks, so
/// all batches of a page translation proceed concurrently.
pub fn spawn_executor<B>(store: ConfigStore, backend: B) -> MessageSender
where
    B: TranslateBackend + 'static,
{
    let (sender, rx) = super::channel();
    tokio::spawn(run(store, Arc::new(backend), rx));
    sender
}

async fn run<B>(
    store: ConfigStore,
    backend: Arc<B>,
    mut rx: mpsc::UnboundedReceiver<PageMessage>,
) where
    B: TranslateBackend + 'static,
{
    while let Some(message) = rx.recv().await {
        match message {
            PageMessage::Translate {
                text,
                target_lang,
                model,
                reply,
            } => {
                let store = store.clone();
                let backend = Arc::clone(&backend);
                tokio::spawn(async move {
                    let result =
                        handle_translate(&store, backend.as_ref(), &text, &target_lang, &model)
                            .await;
                    // The requester may have gone away; nothing to do then.
                    let _ = reply.send(result);
                });
            }
            PageMessage::GetConfig { reply } => {
                let _ = reply.send(store.get());
            }
        }
    }

    tracing::debug!("message channel closed; executor stopping");
}

/// Reads the key and defaults from the store and invokes the backend. The
/// key stays on this side of the channel; replies carry only the translated
/// text or the error.
async fn handle_translate<B>(
    store: &ConfigStore,
    backend: &B,
    text: &str,
    target_lang: &str,
    model: &str,
) -> TranslateResult<String>
where
    B: TranslateBackend,
{
    let config = store.get();

    if config.api_key.is_empty() {
        return Err(TranslateError::Config(
            "API key is not configured; set it in the configuration file".to_string(),
        ));
    }

    let model = if model.is_empty() {
        config.default_model.as_str()
    } else {
        model
    };

    backend
        .translate(text, target_lang, model, &config.api_key)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ConfigUpdate};

    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every call it receives and echoes the text back uppercased.
    struct RecordingBackend {
        calls: Arc<Mutex<Vec<(String, String, String, String)>>>,
    }

    #[async_trait]
    impl TranslateBackend for RecordingBackend {
        async fn translate(
            &self,
            text: &str,
            target_lang: &str,
            model: &str,
            api_key: &str,
        ) -> TranslateResult<String> {
            self.calls.lock().unwrap().push((
                text.to_string(),
                target_lang.to_string(),
                model.to_string(),
                api_key.to_string(),
            ));
            Ok(text.to_uppercase())
        }
    }

    fn recording_backend() -> (RecordingBackend, Arc<Mutex<Vec<(String, String, String, String)>>>)
    {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            RecordingBackend {
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    fn store_with_key(dir: &tempfile::TempDir, api_key: &str) -> ConfigStore {
        let store = ConfigStore::new(dir.path().join("config.json"));
        store
            .update(ConfigUpdate {
                api_key: Some(api_key.to_string()),
                ..Default::default()
            })
            .unwrap();
        store
    }

    #[tokio::test]
    async fn translate_flows_through_backend_with_stored_key() {
        let dir = tempfile::tempdir().unwrap();
        let (backend, calls) = recording_backend();
        let sender = spawn_executor(store_with_key(&dir, "sk-secret"), backend);

        let translated = sender
            .translate("hello".to_string(), "th", "openai/gpt-4o")
            .await
            .unwrap();

        assert_eq!(translated, "HELLO");
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (
            "hello".to_string(),
            "th".to_string(),
            "openai/gpt-4o".to_string(),
            "sk-secret".to_string(),
        ));
    }

    #[tokio::test]
    async fn empty_model_falls_back_to_configured_default() {
        let dir = tempfile::tempdir().unwrap();
        let (backend, calls) = recording_backend();
        let sender = spawn_executor(store_with_key(&dir, "sk-secret"), backend);

        sender.translate("hi".to_string(), "de", "").await.unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].2, Config::default().default_model);
    }

    #[tokio::test]
    async fn unset_key_yields_config_error_without_backend_call() {
        let dir = tempfile::tempdir().unwrap();
        let (backend, calls) = recording_backend();
        let store = ConfigStore::new(dir.path().join("config.json"));
        let sender = spawn_executor(store, backend);

        let result = sender.translate("hi".to_string(), "de", "m").await;

        assert!(matches!(result, Err(TranslateError::Config(_))));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_config_returns_stored_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let (backend, _calls) = recording_backend();
        let store = store_with_key(&dir, "sk-visible-on-executor-side");
        let expected = store.get();
        let sender = spawn_executor(store, backend);

        assert_eq!(sender.get_config().await.unwrap(), expected);
    }
}
