use std::collections::HashSet;

use songngu_core::segment::SentenceTokenizer;

/// Titles that are always followed by a name, so never end a sentence
const TITLE_ABBREVIATIONS: &[&str] = &["dr.", "mr.", "mrs.", "ms.", "prof.", "sr.", "jr.", "st."];

/// Abbreviations that end a sentence only when a capitalised word follows
const ABBREVIATIONS: &[&str] = &[
    "etc.", "vs.", "e.g.", "i.e.", "a.m.", "p.m.", "u.s.", "u.k.", "no.", "fig.", "approx.",
];

const TERMINATORS: &[char] = &['.', '!', '?', '\u{2026}'];

/// Closing quotes and brackets that stay with the sentence they close
const CLOSERS: &[char] = &['"', '\'', ')', ']', '\u{201D}', '\u{2019}'];

const OPENERS: &[char] = &['"', '\'', '(', '[', '\u{201C}', '\u{2018}'];

/// Rule-based English sentence boundary detection
pub struct SentenceSplitter {
    titles: HashSet<&'static str>,
    abbreviations: HashSet<&'static str>,
}

impl SentenceSplitter {
    pub fn new() -> Self {
        Self {
            titles: TITLE_ABBREVIATIONS.iter().copied().collect(),
            abbreviations: ABBREVIATIONS.iter().copied().collect(),
        }
    }

    /// Lazily split `text`; sentences come back trimmed and in order
    pub fn split<'a>(&'a self, text: &'a str) -> Sentences<'a> {
        Sentences {
            splitter: self,
            text,
            pos: 0,
        }
    }

    fn last_word(&self, text: &str) -> String {
        text.split_whitespace()
            .last()
            .unwrap_or_default()
            .trim_start_matches(OPENERS)
            .to_lowercase()
    }

    /// Whether the terminator ending `before` really closes a sentence, given what follows
    fn is_boundary(&self, before: &str, after: &str) -> bool {
        let word = self.last_word(before);
        if self.titles.contains(word.as_str()) {
            return false;
        }

        let next = after.trim_start().chars().next();
        let starts_lower = next.is_some_and(char::is_lowercase);
        if starts_lower {
            return false;
        }

        if self.abbreviations.contains(word.as_str()) {
            return next.is_some_and(char::is_uppercase);
        }

        // Single-letter initials: "J. R. R. Tolkien"
        let stem = word.trim_end_matches('.');
        !(stem.chars().count() == 1 && stem.chars().all(char::is_alphabetic))
    }
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceTokenizer for SentenceSplitter {
    fn sentences<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = String> + 'a> {
        Box::new(self.split(text).map(str::to_string))
    }
}

pub struct Sentences<'a> {
    splitter: &'a SentenceSplitter,
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let rest = &self.text[self.pos..];
            let start = self.pos + (rest.len() - rest.trim_start().len());
            if start >= self.text.len() {
                self.pos = self.text.len();
                return None;
            }

            let end = self.find_end(start);
            self.pos = end;
            let sentence = self.text[start..end].trim();
            if !sentence.is_empty() {
                return Some(sentence);
            }
        }
    }
}

impl Sentences<'_> {
    /// Byte offset just past the sentence starting at `start`
    fn find_end(&self, start: usize) -> usize {
        let text = self.text;
        let mut chars = text[start..].char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            let at = start + idx;

            // A blank line always ends a sentence
            if c == '\n' && text[at + 1..].trim_start_matches([' ', '\t', '\r']).starts_with('\n')
            {
                return at;
            }

            if !TERMINATORS.contains(&c) {
                continue;
            }

            let mut end = at + c.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if TERMINATORS.contains(&next) || CLOSERS.contains(&next) {
                    end = start + next_idx + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }

            let after = &text[end..];
            let followed_by_space = after.is_empty() || after.starts_with(char::is_whitespace);
            if followed_by_space && self.splitter.is_boundary(&text[start..end], after) {
                return end;
            }
        }

        text.len()
    }
}
