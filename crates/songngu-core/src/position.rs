//! Conversions between absolute character offsets and line/column positions.
//!
//! Every offset in this crate counts Unicode scalar values, not bytes. Lines are
//! separated by `\n` and each break counts as one character.

use songngu_types::{Position, TextRange};

/// Map an offset to its line and column.
///
/// Offsets past the end of the document clamp to the last position. An offset
/// that sits on a line break resolves to the end of the line before it.
pub fn offset_to_position(doc: &str, offset: usize) -> Position {
    let mut acc = 0;
    let mut last = Position::default();

    for (line, text) in doc.split('\n').enumerate() {
        let len = text.chars().count();
        if acc + len >= offset {
            return Position::new(line, offset - acc);
        }
        last = Position::new(line, len);
        acc += len + 1;
    }

    last
}

/// Inverse of [`offset_to_position`]: lengths of all prior lines (+1 each) plus the column.
///
/// A line past the end clamps to the last line and a column past the end of
/// its line clamps to the line end, so a position never spills onto the next line.
pub fn position_to_offset(doc: &str, position: Position) -> usize {
    let mut acc = 0;
    let mut lines = doc.split('\n').enumerate().peekable();

    while let Some((line, text)) = lines.next() {
        let len = text.chars().count();
        if line == position.line || lines.peek().is_none() {
            let col = if line == position.line { position.col } else { len };
            return acc + col.min(len);
        }
        acc += len + 1;
    }

    acc
}

/// Rewrite `\r\n` and lone `\r` breaks as `\n`
pub fn normalize_line_endings(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

pub fn char_len(doc: &str) -> usize {
    doc.chars().count()
}

/// Byte index of a character offset, clamped to the end of the document
pub fn byte_offset(doc: &str, offset: usize) -> usize {
    doc.char_indices()
        .nth(offset)
        .map(|(idx, _)| idx)
        .unwrap_or(doc.len())
}

/// Character offset of a byte index that lies on a char boundary
pub fn char_offset(doc: &str, byte_idx: usize) -> usize {
    doc[..byte_idx.min(doc.len())].chars().count()
}

/// Text covered by `range`, clamped to the document
pub fn slice(doc: &str, range: TextRange) -> &str {
    let start = byte_offset(doc, range.start);
    let end = byte_offset(doc, range.end.max(range.start));
    &doc[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_every_offset() {
        let docs = [
            "",
            "single line",
            "I have two houses near the lake.\n\nThe lake is calm.",
            "\n\nleading breaks",
            "trailing break\n",
            "Tôi có hai nhà\ngần hồ.\n",
        ];

        for doc in docs {
            for offset in 0..=char_len(doc) {
                let position = offset_to_position(doc, offset);
                assert_eq!(
                    position_to_offset(doc, position),
                    offset,
                    "doc {doc:?} offset {offset} -> {position:?}"
                );
            }
        }
    }

    #[test]
    fn test_break_resolves_to_line_end() {
        let doc = "ab\ncd";
        assert_eq!(offset_to_position(doc, 2), Position::new(0, 2));
        assert_eq!(offset_to_position(doc, 3), Position::new(1, 0));
        assert_eq!(offset_to_position(doc, 5), Position::new(1, 2));
    }

    #[test]
    fn test_out_of_range_clamps() {
        let doc = "ab\ncd";
        assert_eq!(offset_to_position(doc, 99), Position::new(1, 2));
        assert_eq!(offset_to_position("", 3), Position::new(0, 0));

        assert_eq!(position_to_offset(doc, Position::new(0, 99)), 2);
        assert_eq!(position_to_offset(doc, Position::new(0, 3)), 2);
        assert_eq!(position_to_offset(doc, Position::new(1, 99)), 5);
        assert_eq!(position_to_offset(doc, Position::new(9, 0)), 5);
        assert_eq!(position_to_offset("", Position::new(2, 4)), 0);
    }

    #[test]
    fn test_line_endings_become_newlines() {
        assert_eq!(normalize_line_endings("a\r\n\r\nb\rc".to_string()), "a\n\nb\nc");
        assert_eq!(normalize_line_endings("plain\n".to_string()), "plain\n");
    }

    #[test]
    fn test_multibyte_slice() {
        let doc = "Tôi có hai nhà gần hồ.";
        assert_eq!(slice(doc, TextRange::new(11, 14)), "nhà");
        assert_eq!(byte_offset(doc, 1000), doc.len());
        assert_eq!(char_offset(doc, byte_offset(doc, 19)), 19);
    }
}
