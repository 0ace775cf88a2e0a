//! Asynchronous request/response channel between the page context and the
//! privileged executor.
//!
//! The page side holds a [`MessageSender`] and never sees the API key; the
//! executor side owns the config store and the translation backend. Each
//! request envelope carries a oneshot reply sender, so responses complete
//! out of order without any correlation bookkeeping.

pub mod executor;

pub use executor::spawn_executor;

use tokio::sync::{mpsc, oneshot};

use crate::config::Config;
use crate::error::{TranslateError, TranslateResult};

/// Request envelopes accepted by the privileged executor.
pub enum PageMessage {
    Translate {
        text: String,
        target_lang: String,
        model: String,
        reply: oneshot::Sender<TranslateResult<String>>,
    },
    GetConfig {
        reply: oneshot::Sender<Config>,
    },
}

/// Page-context handle to the executor. Cheap to clone; every clone feeds
/// the same executor task.
#[derive(Clone)]
pub struct MessageSender {
    tx: mpsc::UnboundedSender<PageMessage>,
}

impl MessageSender {
    /// Submits one translation request and suspends until its reply arrives.
    pub async fn translate(
        &self,
        text: String,
        target_lang: &str,
        model: &str,
    ) -> TranslateResult<String> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(PageMessage::Translate {
                text,
                target_lang: target_lang.to_string(),
                model: model.to_string(),
                reply,
            })
            .map_err(|_| TranslateError::Channel("executor is not running".to_string()))?;

        rx.await
            .map_err(|_| TranslateError::Channel("executor dropped the reply".to_string()))?
    }

    /// Fetches the full configuration from the executor side.
    pub async fn get_config(&self) -> TranslateResult<Config> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(PageMessage::GetConfig { reply })
            .map_err(|_| TranslateError::Channel("executor is not running".to_string()))?;

        rx.await
            .map_err(|_| TranslateError::Channel("executor dropped the reply".to_string()))
    }
}

pub(crate) fn channel() -> (MessageSender, mpsc::UnboundedReceiver<PageMessage>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MessageSender { tx }, rx)
}
