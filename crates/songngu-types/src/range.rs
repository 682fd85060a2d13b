use serde::{Deserialize, Deserializer, Serialize};

/// Half-open character range `[start, end)` inside a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Inclusive on both ends, so an offset sitting right after the range still counts
    pub fn touches(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Non-empty and inside a document of `doc_len` characters
    pub fn is_valid_for(&self, doc_len: usize) -> bool {
        self.start < self.end && self.end <= doc_len
    }
}

// Older sessions stored anchors as `abs_start`/`abs_end`, sometimes without an end.
#[derive(Deserialize)]
struct RawRange {
    #[serde(alias = "abs_start")]
    start: usize,
    #[serde(alias = "abs_end")]
    end: Option<usize>,
}

impl<'de> Deserialize<'de> for TextRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawRange::deserialize(deserializer)?;
        Ok(TextRange {
            start: raw.start,
            end: raw.end.unwrap_or(raw.start),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_half_open() {
        let a = TextRange::new(0, 5);
        assert!(a.overlaps(&TextRange::new(4, 6)));
        assert!(!a.overlaps(&TextRange::new(5, 9)));
        assert!(!TextRange::new(5, 9).overlaps(&a));
    }

    #[test]
    fn test_legacy_field_names() {
        let current: TextRange = serde_json::from_str(r#"{"start": 3, "end": 7}"#).unwrap();
        let legacy: TextRange = serde_json::from_str(r#"{"abs_start": 3, "abs_end": 7}"#).unwrap();
        assert_eq!(current, legacy);

        let open: TextRange = serde_json::from_str(r#"{"start": 4}"#).unwrap();
        assert_eq!(open, TextRange::new(4, 4));
        assert!(!open.is_valid_for(10));
    }
}
