/// Text processing interface for language implementations
pub trait LanguageProcessor: Send + Sync {
    /// Language identifier (ISO 639-1 code: "en", "vi", etc.)
    fn language_code(&self) -> &str;

    /// Normalize text (Unicode normalization, whitespace, etc.)
    fn normalize(&self, text: &str) -> String;

    /// Break text into word and punctuation tokens
    fn tokenize(&self, text: &str) -> Vec<Token>;

    /// Tag every token of `text` with a part-of-speech label
    fn pos_tag(&self, text: &str) -> Vec<TaggedToken>;

    /// Dictionary form of `word`, guided by a coarse POS hint
    fn lemmatize(&self, word: &str, pos: PosHint) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub surface: String,
    pub normalized: String,
    /// Character offset into the tokenized text
    pub position: usize,
}

impl Token {
    pub fn is_alphabetic(&self) -> bool {
        !self.surface.is_empty() && self.surface.chars().all(char::is_alphabetic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub word: String,
    /// Penn Treebank style tag, e.g. `NN`, `VBD`, `JJ`
    pub tag: String,
}

impl TaggedToken {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }
}

/// Word class a lemmatizer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosHint {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl PosHint {
    /// `v*` verb, `adj*`/`j*` adjective, `adv*`/`r*` adverb, anything else noun
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.to_lowercase();
        if tag.starts_with('v') {
            PosHint::Verb
        } else if tag.starts_with("adv") || tag.starts_with('r') {
            PosHint::Adverb
        } else if tag.starts_with("adj") || tag.starts_with('j') {
            PosHint::Adjective
        } else {
            PosHint::Noun
        }
    }
}
