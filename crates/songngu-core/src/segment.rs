//! Paragraph and sentence spans of the primary document, rebuilt on every load.

use songngu_types::TextRange;

use crate::position::{byte_offset, char_len, char_offset};

const PARAGRAPH_BREAK: &str = "\n\n";

/// External sentence-boundary capability.
///
/// The iterator is consumed once, in document order. Returned sentences may be
/// normalised (whitespace collapsed, quotes changed) relative to the source text.
pub trait SentenceTokenizer: Send + Sync {
    fn sentences<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = String> + 'a>;
}

/// Cached spans for one loaded document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    paragraphs: Vec<TextRange>,
    sentences: Vec<TextRange>,
}

impl Segments {
    pub fn build(doc: &str, tokenizer: &dyn SentenceTokenizer) -> Self {
        let segments = Self {
            paragraphs: paragraph_spans(doc),
            sentences: sentence_spans(doc, tokenizer.sentences(doc)),
        };
        tracing::debug!(
            "Segmented document: {} paragraphs, {} sentences",
            segments.paragraphs.len(),
            segments.sentences.len()
        );
        segments
    }

    pub fn paragraphs(&self) -> &[TextRange] {
        &self.paragraphs
    }

    pub fn sentences(&self) -> &[TextRange] {
        &self.sentences
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty() && self.sentences.is_empty()
    }

    /// Sentence containing `offset`; an offset right after a sentence still belongs to it
    pub fn sentence_at(&self, offset: usize) -> Option<TextRange> {
        self.sentences.iter().copied().find(|s| s.touches(offset))
    }
}

/// Blank-line delimited paragraphs, trimmed, with offsets into the untrimmed document
pub fn paragraph_spans(doc: &str) -> Vec<TextRange> {
    let mut spans = Vec::new();
    let mut piece_start = 0;

    for piece in doc.split(PARAGRAPH_BREAK) {
        if let Some(range) = trimmed_range(piece, piece_start) {
            spans.push(range);
        }
        piece_start += char_len(piece) + PARAGRAPH_BREAK.len();
    }

    spans
}

/// Map tokenizer output back onto the document, always searching forward.
///
/// A sentence that can't be found verbatim starts at the cursor instead, so spans
/// stay monotonic and never overlap.
pub fn sentence_spans(doc: &str, sentences: impl Iterator<Item = String>) -> Vec<TextRange> {
    let doc_len = char_len(doc);
    let mut spans = Vec::new();
    let mut cursor = 0;

    for sentence in sentences {
        let len = char_len(&sentence);
        if len == 0 {
            continue;
        }

        let from = byte_offset(doc, cursor);
        let start = match doc[from..].find(sentence.as_str()) {
            Some(idx) => char_offset(doc, from + idx),
            None => {
                tracing::debug!("Sentence not found verbatim, anchoring at {}", cursor);
                cursor
            }
        };
        let end = (start + len).min(doc_len);
        if start >= end {
            break;
        }

        spans.push(TextRange::new(start, end));
        cursor = end;
    }

    spans
}

/// The paragraph around `[start, end)`: out to the nearest blank line on each side, trimmed
pub fn paragraph_at(doc: &str, start: usize, end: usize) -> (TextRange, &str) {
    let start_byte = byte_offset(doc, start);
    let end_byte = byte_offset(doc, end.max(start));

    let left = doc[..start_byte]
        .rfind(PARAGRAPH_BREAK)
        .map(|idx| idx + PARAGRAPH_BREAK.len())
        .unwrap_or(0);
    let right = doc[end_byte..]
        .find(PARAGRAPH_BREAK)
        .map(|idx| end_byte + idx)
        .unwrap_or(doc.len());

    let raw = &doc[left..right];
    let text = raw.trim();
    let lead = raw.len() - raw.trim_start().len();
    let range_start = char_offset(doc, left + lead);
    let range = TextRange::new(range_start, range_start + char_len(text));

    (range, text)
}

fn trimmed_range(piece: &str, piece_start: usize) -> Option<TextRange> {
    let trimmed = piece.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lead = char_len(&piece[..piece.len() - piece.trim_start().len()]);
    let start = piece_start + lead;
    Some(TextRange::new(start, start + char_len(trimmed)))
}
