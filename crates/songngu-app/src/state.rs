use std::sync::Arc;

use songngu_config::Config;
use songngu_core::dictionary::Dictionary;
use songngu_core::language::LanguageProcessor;
use songngu_core::reading::SpeechOutput;
use songngu_core::segment::SentenceTokenizer;
use songngu_lang_english::{EnglishProcessor, FreeDictionary, OpenAiTranslator};
use songngu_translator::Translator;
use tokio::sync::RwLock;

use crate::speech::ConsoleSpeech;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }
}

/// Collaborators handed to the event loop
pub struct Services {
    pub language: Arc<dyn LanguageProcessor>,
    pub sentences: Arc<dyn SentenceTokenizer>,
    pub dictionary: Option<Arc<dyn Dictionary>>,
    pub translator: Option<Arc<dyn Translator>>,
    pub speech: Arc<dyn SpeechOutput>,
}

impl Services {
    pub fn from_config(config: &Config) -> Self {
        let processor = Arc::new(EnglishProcessor::new());

        let dictionary: Option<Arc<dyn Dictionary>> = if config.dictionary.enabled {
            Some(Arc::new(FreeDictionary::new(config.dictionary.api_url.clone())))
        } else {
            tracing::warn!("Dictionary disabled, meanings fall back to translation only");
            None
        };

        let translator: Option<Arc<dyn Translator>> = if config.translator_available() {
            let t = &config.translator;
            Some(Arc::new(OpenAiTranslator::new(
                t.api_key.clone(),
                t.api_url.clone(),
                t.model.clone(),
                &t.from_lang,
                &t.to_lang,
            )))
        } else {
            tracing::warn!("Translator disabled or missing API key, mirror translation unavailable");
            None
        };

        Self {
            language: processor.clone(),
            sentences: processor,
            dictionary,
            translator,
            speech: Arc::new(ConsoleSpeech::new(config.reader.words_per_minute)),
        }
    }
}
