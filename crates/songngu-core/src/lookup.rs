//! Word-info resolution for a freshly marked selection.
//!
//! Every collaborator call is bounded by a timeout and degrades to a fallback value,
//! so resolving always yields a usable [`WordInfo`]; problems come back as notices.

use std::collections::HashMap;
use std::time::Duration;

use songngu_config::Config;
use songngu_translator::{PhraseRequest, PhraseTranslation, TranslateError, Translator};
use songngu_types::entry::paragraph_hash;

use crate::dictionary::{Dictionary, DictionaryHit};
use crate::error::AnnotateError;
use crate::language::{LanguageProcessor, PosHint};

/// Semantic fields of a new entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordInfo {
    pub lemma: String,
    pub part_of_speech: String,
    pub phonetic: String,
    pub meaning: String,
    pub gloss: String,
}

#[derive(Debug)]
pub struct Resolved {
    pub info: WordInfo,
    /// Non-fatal problems met on the way (`LookupFailure`, `QuotaExceeded`)
    pub notices: Vec<AnnotateError>,
}

/// External services used while resolving; absent services are skipped
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub language: &'a dyn LanguageProcessor,
    pub dictionary: Option<&'a dyn Dictionary>,
    pub translator: Option<&'a dyn Translator>,
}

#[derive(Debug, Clone, Copy)]
pub struct LookupTimeouts {
    pub lookup: Duration,
    pub translate: Duration,
}

impl From<&Config> for LookupTimeouts {
    fn from(config: &Config) -> Self {
        Self {
            lookup: Duration::from_millis(config.lookup_timeout_ms),
            translate: Duration::from_millis(config.translate_timeout_ms),
        }
    }
}

pub async fn resolve_word_info(
    selection: &str,
    paragraph: &str,
    collaborators: Collaborators<'_>,
    timeouts: LookupTimeouts,
) -> Resolved {
    let mut notices = Vec::new();

    let hit = match collaborators.dictionary {
        Some(dictionary) => {
            match tokio::time::timeout(timeouts.lookup, dictionary.lookup(selection)).await {
                Ok(Ok(hit)) => hit,
                Ok(Err(e)) => {
                    tracing::warn!("Dictionary lookup of '{}' failed: {}", selection, e);
                    notices.push(AnnotateError::LookupFailure(e.to_string()));
                    DictionaryHit::default()
                }
                Err(_) => {
                    tracing::warn!("Dictionary lookup of '{}' timed out", selection);
                    notices.push(AnnotateError::LookupFailure(format!(
                        "dictionary lookup timed out after {} ms",
                        timeouts.lookup.as_millis()
                    )));
                    DictionaryHit::default()
                }
            }
        }
        None => DictionaryHit::default(),
    };

    let tagged = pos_from_tagger(collaborators.language, selection, paragraph);
    let pos_source = if tagged.is_empty() {
        hit.part_of_speech.to_lowercase()
    } else {
        tagged
    };
    let lemma = lemmatize(collaborators.language, selection, &pos_source);

    let mut info = WordInfo {
        part_of_speech: normalize_pos(&pos_source),
        phonetic: hit.phonetic.clone(),
        gloss: hit.first_definition().unwrap_or_default().to_string(),
        meaning: String::new(),
        lemma,
    };

    let translated = match collaborators.translator {
        Some(translator) => {
            let request = PhraseRequest {
                phrase: selection,
                lemma: &info.lemma,
                paragraph,
            };
            match tokio::time::timeout(timeouts.translate, translator.translate_phrase(request)).await
            {
                Ok(Ok(translation)) => Some(translation),
                Ok(Err(e)) => {
                    tracing::warn!("Translating '{}' failed: {}", selection, e);
                    notices.push(translate_notice(e));
                    None
                }
                Err(_) => {
                    tracing::warn!("Translating '{}' timed out", selection);
                    notices.push(AnnotateError::LookupFailure(format!(
                        "translation timed out after {} ms",
                        timeouts.translate.as_millis()
                    )));
                    None
                }
            }
        }
        None => None,
    };

    if let Some(PhraseTranslation {
        part_of_speech,
        phonetic,
        ..
    }) = &translated
    {
        if let Some(pos) = part_of_speech.as_deref().filter(|p| !p.trim().is_empty()) {
            info.part_of_speech = normalize_pos(pos.trim());
        }
        if let Some(phonetic) = phonetic.as_deref().filter(|p| !p.trim().is_empty()) {
            info.phonetic = phonetic.trim().to_string();
        }
    }

    let meaning = translated
        .as_ref()
        .and_then(|t| first_line(&t.meaning))
        .map(str::to_string);
    info.meaning = meaning.unwrap_or_else(|| fallback_meaning(&hit, &info.lemma));

    tracing::debug!("Resolved '{}' -> {:?}", selection, info);
    Resolved { info, notices }
}

/// Quota, auth and rate errors get their own warning
pub fn translate_notice(error: TranslateError) -> AnnotateError {
    if error.is_quota() {
        AnnotateError::QuotaExceeded(error.to_string())
    } else {
        AnnotateError::LookupFailure(error.to_string())
    }
}

/// First definition's first clause, else the lemma itself
pub fn fallback_meaning(hit: &DictionaryHit, lemma: &str) -> String {
    hit.first_definition()
        .and_then(|d| d.split(';').next())
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(lemma)
        .to_string()
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}

/// Collapse a tagger or dictionary label onto the coarse classes shown to the reader
pub fn normalize_pos(value: &str) -> String {
    let value = value.to_lowercase();
    let normalized = if value.starts_with('v') {
        "verb"
    } else if value.starts_with('n') {
        "noun"
    } else if value.starts_with("adj") || value.starts_with('j') {
        "adjective"
    } else if value.starts_with("adv") || value.starts_with('r') {
        "adverb"
    } else if value.is_empty() {
        "other"
    } else {
        return value;
    };
    normalized.to_string()
}

/// Tag of the selection as it appears in its paragraph.
///
/// Falls back to tagging the selection alone, then to the paragraph's first tag.
/// Returns an empty string when nothing could be tagged.
pub fn pos_from_tagger(language: &dyn LanguageProcessor, selection: &str, paragraph: &str) -> String {
    let selection_words: Vec<String> = language
        .tokenize(selection)
        .into_iter()
        .filter(|t| t.surface.chars().any(char::is_alphabetic))
        .map(|t| t.surface)
        .collect();
    let lowered: Vec<String> = selection_words.iter().map(|w| w.to_lowercase()).collect();

    let paragraph_tags = if paragraph.trim().is_empty() {
        Vec::new()
    } else {
        language.pos_tag(paragraph)
    };

    if !lowered.is_empty() {
        let found = paragraph_tags.windows(lowered.len()).find(|window| {
            window
                .iter()
                .zip(&lowered)
                .all(|(token, word)| token.word.to_lowercase() == *word)
        });
        if let Some(window) = found {
            return window[0].tag.to_lowercase();
        }

        let alone = language.pos_tag(&selection_words.join(" "));
        if let Some(first) = alone.first() {
            return first.tag.to_lowercase();
        }
    }

    paragraph_tags
        .first()
        .map(|t| t.tag.to_lowercase())
        .unwrap_or_default()
}

/// Lowercased dictionary form without a possessive `'s`
pub fn lemmatize(language: &dyn LanguageProcessor, selection: &str, pos_hint: &str) -> String {
    let base = selection.trim().to_lowercase();
    let lemma = language.lemmatize(&base, PosHint::from_tag(pos_hint));
    match lemma.strip_suffix("'s").or_else(|| lemma.strip_suffix("’s")) {
        Some(stripped) => stripped.to_string(),
        None => lemma,
    }
}

/// Resolved word info per `(selection, paragraph)`, cleared with the document
#[derive(Debug, Default)]
pub struct LookupCache {
    items: HashMap<String, WordInfo>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_key(selection: &str, paragraph: &str) -> String {
        format!("{}|{:016x}", selection.to_lowercase(), paragraph_hash(paragraph))
    }

    pub fn get(&self, selection: &str, paragraph: &str) -> Option<&WordInfo> {
        self.items.get(&Self::cache_key(selection, paragraph))
    }

    pub fn insert(&mut self, selection: &str, paragraph: &str, info: WordInfo) {
        self.items.insert(Self::cache_key(selection, paragraph), info);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{DictionaryMetadata, LookupError};
    use crate::language::{TaggedToken, Token};
    use songngu_translator::{ProviderMetadata, Translation};

    struct FakeLanguage;

    impl LanguageProcessor for FakeLanguage {
        fn language_code(&self) -> &str {
            "en"
        }

        fn normalize(&self, text: &str) -> String {
            text.to_string()
        }

        fn tokenize(&self, text: &str) -> Vec<Token> {
            text.split_whitespace()
                .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation()))
                .filter(|w| !w.is_empty())
                .map(|w| Token {
                    surface: w.to_string(),
                    normalized: w.to_lowercase(),
                    position: 0,
                })
                .collect()
        }

        fn pos_tag(&self, text: &str) -> Vec<TaggedToken> {
            self.tokenize(text)
                .into_iter()
                .map(|t| {
                    let tag = match t.normalized.as_str() {
                        "houses" => "NNS",
                        "runs" | "have" => "VBZ",
                        "quickly" => "RB",
                        "calm" => "JJ",
                        "i" => "PRP",
                        _ => "NN",
                    };
                    TaggedToken::new(t.surface, tag)
                })
                .collect()
        }

        fn lemmatize(&self, word: &str, pos: PosHint) -> String {
            match pos {
                PosHint::Noun | PosHint::Verb if !word.ends_with("'s") => {
                    word.strip_suffix('s').unwrap_or(word).to_string()
                }
                _ => word.to_string(),
            }
        }
    }

    struct FakeDictionary {
        result: Result<DictionaryHit, ()>,
    }

    #[async_trait::async_trait]
    impl Dictionary for FakeDictionary {
        async fn lookup(&self, word: &str) -> Result<DictionaryHit, LookupError> {
            self.result
                .clone()
                .map_err(|_| LookupError::NotFound(word.to_string()))
        }

        fn metadata(&self) -> DictionaryMetadata {
            DictionaryMetadata {
                name: "fake".into(),
                language: "en".into(),
            }
        }
    }

    enum Reply {
        Meaning(&'static str),
        Quota,
        Broken,
        Slow,
    }

    struct FakeTranslator {
        reply: Reply,
    }

    #[async_trait::async_trait]
    impl Translator for FakeTranslator {
        async fn translate_phrase(
            &self,
            _request: PhraseRequest<'_>,
        ) -> Result<PhraseTranslation, TranslateError> {
            match self.reply {
                Reply::Meaning(text) => Ok(PhraseTranslation {
                    meaning: text.to_string(),
                    ..Default::default()
                }),
                Reply::Quota => Err(TranslateError::QuotaExceeded),
                Reply::Broken => Err(TranslateError::ApiError("HTTP 500".into())),
                Reply::Slow => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Err(TranslateError::EmptyResponse)
                }
            }
        }

        async fn translate_document(&self, _text: &str) -> Result<Translation, TranslateError> {
            Err(TranslateError::EmptyResponse)
        }

        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                name: "fake".into(),
                requires_api_key: false,
            }
        }
    }

    fn house_hit() -> DictionaryHit {
        DictionaryHit {
            phonetic: "/haʊs/".into(),
            part_of_speech: "noun".into(),
            definitions: vec!["A dwelling; a building for living in.".into()],
        }
    }

    fn timeouts() -> LookupTimeouts {
        LookupTimeouts {
            lookup: Duration::from_millis(200),
            translate: Duration::from_millis(50),
        }
    }

    const PARAGRAPH: &str = "I have two houses near the lake.";

    #[tokio::test]
    async fn test_resolves_with_every_collaborator() {
        let dictionary = FakeDictionary {
            result: Ok(house_hit()),
        };
        let translator = FakeTranslator {
            reply: Reply::Meaning("nhà\nextra line"),
        };
        let collaborators = Collaborators {
            language: &FakeLanguage,
            dictionary: Some(&dictionary),
            translator: Some(&translator),
        };

        let resolved = resolve_word_info("houses", PARAGRAPH, collaborators, timeouts()).await;
        assert!(resolved.notices.is_empty());
        assert_eq!(
            resolved.info,
            WordInfo {
                lemma: "house".into(),
                part_of_speech: "noun".into(),
                phonetic: "/haʊs/".into(),
                meaning: "nhà".into(),
                gloss: "A dwelling; a building for living in.".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_quota_falls_back_to_definition_clause() {
        let dictionary = FakeDictionary {
            result: Ok(house_hit()),
        };
        let translator = FakeTranslator { reply: Reply::Quota };
        let collaborators = Collaborators {
            language: &FakeLanguage,
            dictionary: Some(&dictionary),
            translator: Some(&translator),
        };

        let resolved = resolve_word_info("houses", PARAGRAPH, collaborators, timeouts()).await;
        assert_eq!(resolved.info.meaning, "A dwelling");
        assert!(matches!(
            resolved.notices.as_slice(),
            [AnnotateError::QuotaExceeded(_)]
        ));
    }

    #[tokio::test]
    async fn test_every_failure_falls_back_to_lemma() {
        let dictionary = FakeDictionary { result: Err(()) };
        let translator = FakeTranslator {
            reply: Reply::Broken,
        };
        let collaborators = Collaborators {
            language: &FakeLanguage,
            dictionary: Some(&dictionary),
            translator: Some(&translator),
        };

        let resolved = resolve_word_info("runs", "She runs quickly.", collaborators, timeouts()).await;
        assert_eq!(resolved.info.lemma, "run");
        assert_eq!(resolved.info.part_of_speech, "verb");
        assert_eq!(resolved.info.meaning, "run");
        assert_eq!(resolved.info.gloss, "");
        assert_eq!(resolved.notices.len(), 2);
        assert!(
            resolved
                .notices
                .iter()
                .all(|n| matches!(n, AnnotateError::LookupFailure(_)))
        );
    }

    #[tokio::test]
    async fn test_slow_translation_times_out() {
        let translator = FakeTranslator { reply: Reply::Slow };
        let collaborators = Collaborators {
            language: &FakeLanguage,
            dictionary: None,
            translator: Some(&translator),
        };

        let resolved = resolve_word_info("calm", "The lake is calm.", collaborators, timeouts()).await;
        assert_eq!(resolved.info.meaning, "calm");
        assert_eq!(resolved.info.part_of_speech, "adjective");
        assert!(matches!(
            resolved.notices.as_slice(),
            [AnnotateError::LookupFailure(_)]
        ));
    }

    #[test]
    fn test_normalize_pos() {
        assert_eq!(normalize_pos("VBD"), "verb");
        assert_eq!(normalize_pos("nns"), "noun");
        assert_eq!(normalize_pos("jj"), "adjective");
        assert_eq!(normalize_pos("adjective"), "adjective");
        assert_eq!(normalize_pos("rb"), "adverb");
        assert_eq!(normalize_pos("prp"), "prp");
        assert_eq!(normalize_pos(""), "other");
    }

    #[test]
    fn test_pos_prefers_paragraph_context() {
        let pos = pos_from_tagger(&FakeLanguage, "two houses", PARAGRAPH);
        assert_eq!(pos, "nn");
        let pos = pos_from_tagger(&FakeLanguage, "houses", PARAGRAPH);
        assert_eq!(pos, "nns");
        // Not in the paragraph: tag the selection alone
        let pos = pos_from_tagger(&FakeLanguage, "quickly", PARAGRAPH);
        assert_eq!(pos, "rb");
        // Nothing alphabetic: paragraph's first tag
        let pos = pos_from_tagger(&FakeLanguage, "42", PARAGRAPH);
        assert_eq!(pos, "prp");
        assert_eq!(pos_from_tagger(&FakeLanguage, "...", ""), "");
    }

    #[test]
    fn test_lemmatize_strips_possessive() {
        assert_eq!(lemmatize(&FakeLanguage, " John's ", "nnp"), "john");
        assert_eq!(lemmatize(&FakeLanguage, "Houses", "nns"), "house");
    }

    #[test]
    fn test_cache_is_per_paragraph() {
        let mut cache = LookupCache::new();
        let info = WordInfo {
            lemma: "lake".into(),
            ..Default::default()
        };
        cache.insert("Lake", "Paragraph A.", info.clone());
        assert_eq!(cache.get("lake", "Paragraph A."), Some(&info));
        assert_eq!(cache.get("lake", "Paragraph B."), None);
        cache.clear();
        assert!(cache.is_empty());
    }
}
