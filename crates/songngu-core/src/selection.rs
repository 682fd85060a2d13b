use songngu_types::TextRange;

use crate::position::{char_len, slice};
use crate::segment::paragraph_at;

/// Characters stripped from both ends of a selection, on top of whitespace
const TRIM_CHARS: &[char] = &[
    '.', ',', '!', '?', ';', ':', '\'', '"', '(', ')', '[', ']', '{', '}', '<', '>', '\u{201C}',
    '\u{201D}', '\u{2018}', '\u{2019}', '\u{2014}', '-', '\u{2026}',
];

fn is_trimmable(c: char) -> bool {
    c.is_whitespace() || TRIM_CHARS.contains(&c)
}

/// Shrink `[start, end)` inward past punctuation and whitespace; `None` if nothing is left
pub fn trim_selection(doc: &str, start: usize, end: usize) -> Option<TextRange> {
    let len = char_len(doc);
    let (start, end) = (start.min(len), end.min(len));
    if start >= end {
        return None;
    }

    let chars: Vec<char> = slice(doc, TextRange::new(start, end)).chars().collect();
    let lead = chars.iter().take_while(|c| is_trimmable(**c)).count();
    if lead == chars.len() {
        return None;
    }
    let tail = chars.iter().rev().take_while(|c| is_trimmable(**c)).count();

    Some(TextRange::new(start + lead, end - tail))
}

/// A trimmed selection together with the paragraph it was made in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub range: TextRange,
    pub surface: String,
    pub paragraph: String,
}

impl Selection {
    pub fn resolve(doc: &str, start: usize, end: usize) -> Option<Self> {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let range = trim_selection(doc, start, end)?;
        let surface = slice(doc, range).to_string();
        let (_, paragraph) = paragraph_at(doc, range.start, range.end);

        Some(Self {
            range,
            surface,
            paragraph: paragraph.to_string(),
        })
    }
}
