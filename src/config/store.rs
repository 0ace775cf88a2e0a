//! File-backed configuration store with get/set/reset/update semantics.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::constants;
use crate::error::{TranslateError, TranslateResult};

/// The persisted configuration record.
///
/// Serialized as a single JSON document using the camelCase field names of
/// the stored shape. Fields the current version does not know about are kept
/// in `extra` and written back untouched on the next `set`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// API key for the remote provider; empty means "unconfigured".
    pub api_key: String,
    /// Model used when a translation request does not name one.
    pub default_model: String,
    /// Target language used when none is given.
    pub default_target_language: String,
    /// Whether the in-page translate button is shown.
    pub show_button: bool,
    /// Selectable model identifiers, ordered, without duplicates.
    pub models: Vec<String>,
    /// Unknown fields, passed through unexamined.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            default_model: constants::DEFAULT_MODEL.to_string(),
            default_target_language: constants::DEFAULT_TARGET_LANGUAGE.to_string(),
            show_button: true,
            models: constants::DEFAULT_MODELS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            extra: serde_json::Map::new(),
        }
    }
}

impl Config {
    /// Drops duplicate model identifiers while preserving order.
    fn dedup_models(&mut self) {
        let mut seen = Vec::with_capacity(self.models.len());
        self.models.retain(|model| {
            if seen.contains(model) {
                false
            } else {
                seen.push(model.clone());
                true
            }
        });
    }
}

/// A partial configuration used for read-modify-write updates.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    pub api_key: Option<String>,
    pub default_model: Option<String>,
    pub default_target_language: Option<String>,
    pub show_button: Option<bool>,
    pub models: Option<Vec<String>>,
}

/// Persisted key-value configuration at a fixed file path.
///
/// The record is always read and written as one unit; `set` replaces the
/// file atomically (temp file + rename) so a crash never leaves a partially
/// written config behind. Concurrent writers race with last-write-wins.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        ConfigStore { path: path.into() }
    }

    /// Opens the store at the default file name in the working directory.
    pub fn open_default() -> Self {
        Self::new(constants::DEFAULT_CONFIG_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored configuration, or the built-in default when the
    /// file is absent or unreadable.
    pub fn get(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "stored config could not be parsed; using defaults"
                    );
                    Config::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Config::default(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "stored config could not be read; using defaults"
                );
                Config::default()
            }
        }
    }

    /// Atomically replaces the stored configuration.
    pub fn set(&self, mut config: Config) -> TranslateResult<()> {
        config.dedup_models();

        let data = serde_json::to_vec_pretty(&config)
            .map_err(|e| TranslateError::Storage(format!("failed to serialize config: {e}")))?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, data).map_err(|e| {
            TranslateError::Storage(format!(
                "failed to write {}: {e}",
                tmp_path.display()
            ))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            TranslateError::Storage(format!(
                "failed to replace {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(())
    }

    /// Restores the built-in default configuration.
    pub fn reset(&self) -> TranslateResult<()> {
        self.set(Config::default())
    }

    /// Merges the given fields over the current configuration, stores the
    /// result, and returns it.
    pub fn update(&self, update: ConfigUpdate) -> TranslateResult<Config> {
        let mut config = self.get();

        if let Some(api_key) = update.api_key {
            config.api_key = api_key;
        }
        if let Some(default_model) = update.default_model {
            config.default_model = default_model;
        }
        if let Some(default_target_language) = update.default_target_language {
            config.default_target_language = default_target_language;
        }
        if let Some(show_button) = update.show_button {
            config.show_button = show_button;
        }
        if let Some(models) = update.models {
            config.models = models;
        }
        config.dedup_models();

        self.set(config.clone())?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join("config.json"))
    }

    #[test]
    fn get_returns_default_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.get(), Config::default());
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut config = Config::default();
        config.api_key = "sk-test".to_string();
        config.default_target_language = "de".to_string();
        store.set(config.clone()).unwrap();

        assert_eq!(store.get(), config);
    }

    #[test]
    fn reset_restores_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut config = Config::default();
        config.api_key = "sk-test".to_string();
        store.set(config).unwrap();
        store.reset().unwrap();

        assert_eq!(store.get(), Config::default());
    }

    #[test]
    fn update_preserves_untouched_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut config = Config::default();
        config.default_target_language = "ja".to_string();
        config.show_button = false;
        store.set(config).unwrap();

        let updated = store
            .update(ConfigUpdate {
                api_key: Some("sk-new".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.api_key, "sk-new");
        assert_eq!(updated.default_target_language, "ja");
        assert!(!updated.show_button);
        assert_eq!(store.get(), updated);
    }

    #[test]
    fn set_drops_duplicate_models() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut config = Config::default();
        config.models = vec!["a".into(), "b".into(), "a".into(), "c".into(), "b".into()];
        store.set(config).unwrap();

        assert_eq!(store.get().models, vec!["a", "b", "c"]);
    }

    #[test]
    fn unknown_fields_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"apiKey":"k","defaultModel":"m","defaultTargetLanguage":"th",
               "showButton":true,"models":["m"],"customFlag":42}"#,
        )
        .unwrap();

        let store = ConfigStore::new(&path);
        let config = store.get();
        assert_eq!(config.extra.get("customFlag"), Some(&serde_json::json!(42)));

        store.set(config).unwrap();
        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["customFlag"], serde_json::json!(42));
    }
}
