use songngu_core::language::{LanguageProcessor, PosHint, TaggedToken, Token};
use songngu_core::segment::SentenceTokenizer;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::lemmatizer::EnglishLemmatizer;
use crate::sentences::SentenceSplitter;
use crate::tagger::EnglishTagger;

/// English language processor
pub struct EnglishProcessor {
    tagger: EnglishTagger,
    lemmatizer: EnglishLemmatizer,
    splitter: SentenceSplitter,
}

impl EnglishProcessor {
    pub fn new() -> Self {
        Self {
            tagger: EnglishTagger::new(),
            lemmatizer: EnglishLemmatizer::new(),
            splitter: SentenceSplitter::new(),
        }
    }
}

impl Default for EnglishProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageProcessor for EnglishProcessor {
    fn language_code(&self) -> &str {
        "en"
    }

    fn normalize(&self, text: &str) -> String {
        text.nfkc()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Words and punctuation per UAX #29 word boundaries; whitespace is dropped
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut chars_seen = 0;
        let mut bytes_seen = 0;

        for (idx, piece) in text.split_word_bound_indices() {
            chars_seen += text[bytes_seen..idx].chars().count();
            bytes_seen = idx;

            if piece.trim().is_empty() {
                continue;
            }
            tokens.push(Token {
                surface: piece.to_string(),
                normalized: piece.nfkc().collect::<String>().to_lowercase(),
                position: chars_seen,
            });
        }

        tokens
    }

    fn pos_tag(&self, text: &str) -> Vec<TaggedToken> {
        let tokens = self.tokenize(text);
        let words: Vec<&str> = tokens.iter().map(|t| t.surface.as_str()).collect();
        let tags = self.tagger.tag(&words);

        tokens
            .into_iter()
            .zip(tags)
            .map(|(token, tag)| TaggedToken::new(token.surface, tag))
            .collect()
    }

    fn lemmatize(&self, word: &str, pos: PosHint) -> String {
        self.lemmatizer.lemmatize(&word.to_lowercase(), pos)
    }
}

impl SentenceTokenizer for EnglishProcessor {
    fn sentences<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = String> + 'a> {
        self.splitter.sentences(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_keeps_char_positions() {
        let processor = EnglishProcessor::new();
        let tokens = processor.tokenize("Café isn't far, John’s house.");
        let surfaces: Vec<_> = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["Café", "isn't", "far", ",", "John’s", "house", "."]);
        let positions: Vec<_> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 5, 11, 14, 16, 23, 28]);
        assert_eq!(tokens[0].normalized, "café");
    }

    #[test]
    fn test_pos_tag_paragraph() {
        let processor = EnglishProcessor::new();
        let tagged = processor.pos_tag("I have two houses near the lake.");
        let houses = tagged.iter().find(|t| t.word == "houses").unwrap();
        assert_eq!(houses.tag, "NNS");
        assert_eq!(tagged.last().unwrap().tag, ".");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        let processor = EnglishProcessor::new();
        assert_eq!(processor.normalize("  ﬁne\n\n day "), "fine day");
    }

    #[test]
    fn test_sentences_through_tokenizer_trait() {
        let processor = EnglishProcessor::new();
        let text = "I have two houses near the lake.\n\nThe lake is calm.";
        let sentences: Vec<String> = processor.sentences(text).collect();
        assert_eq!(sentences, vec!["I have two houses near the lake.", "The lake is calm."]);
    }
}
