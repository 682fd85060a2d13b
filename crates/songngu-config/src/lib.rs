use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::dictionary::DictionaryConfig;
use self::reader::ReaderConfig;
use self::translator::TranslatorConfig;

pub mod dictionary;
pub mod reader;
pub mod translator;

fn default_lookup_timeout_ms() -> u64 {
    8000
}

fn default_translate_timeout_ms() -> u64 {
    60000
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Config {
    pub reader: ReaderConfig,
    pub dictionary: DictionaryConfig,
    pub translator: TranslatorConfig,

    /// Upper bound for a single dictionary or phrase translation call
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
    /// Upper bound for translating the whole document
    #[serde(default = "default_translate_timeout_ms")]
    pub translate_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reader: ReaderConfig::default(),
            dictionary: DictionaryConfig::default(),
            translator: TranslatorConfig::default(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
            translate_timeout_ms: default_translate_timeout_ms(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Read a JSON config file; missing fields take their defaults, env still wins
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&data)?;
        config.apply_env();
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if let Ok(key) = env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.translator.api_key = key.trim().to_string();
            }
        }

        if let Some(ms) = env_number("LOOKUP_TIMEOUT_MS") {
            self.lookup_timeout_ms = ms;
        }

        if let Some(ms) = env_number("TRANSLATE_TIMEOUT_MS") {
            self.translate_timeout_ms = ms;
        }

        if let Some(size) = env_number("FONT_SIZE") {
            self.reader.font_size = reader::clamp_font_size(size.min(u16::MAX as u64) as u16);
        }
    }

    /// Translation needs both the switch and a key
    pub fn translator_available(&self) -> bool {
        self.translator.enabled && !self.translator.api_key.is_empty()
    }
}

fn env_number(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_takes_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"reader": {"font_size": 24}, "lookup_timeout_ms": 500}"#)
                .unwrap();
        assert_eq!(config.reader.font_size, 24);
        assert_eq!(config.reader.reading_poll_ms, 50);
        assert_eq!(config.lookup_timeout_ms, 500);
        assert_eq!(config.translate_timeout_ms, 60000);
        assert_eq!(config.translator.to_lang, "vi");
        assert!(config.dictionary.enabled);
    }

    #[test]
    fn test_font_clamp() {
        assert_eq!(reader::clamp_font_size(4), reader::MIN_FONT_SIZE);
        assert_eq!(reader::clamp_font_size(20), 20);
        assert_eq!(reader::clamp_font_size(90), reader::MAX_FONT_SIZE);
    }

    #[test]
    fn test_translator_needs_key() {
        let mut config = Config::default();
        config.translator.api_key.clear();
        assert!(!config.translator_available());
        config.translator.api_key = "sk-test".to_string();
        assert!(config.translator_available());
        config.translator.enabled = false;
        assert!(!config.translator_available());
    }
}
