use std::collections::HashMap;

use songngu_types::{StableKey, TextRange, VocabularyEntry};

use crate::locator::MirrorMatch;

/// Vocabulary entries of the open document, keyed by stable identity.
///
/// Iteration order carries no meaning; use [`crate::order::OrderIndex`] for display order.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: HashMap<StableKey, VocabularyEntry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; returns the entry previously stored under the same key
    pub fn insert(&mut self, entry: VocabularyEntry) -> (StableKey, Option<VocabularyEntry>) {
        let key = entry.key();
        let previous = self.entries.insert(key.clone(), entry);
        if previous.is_some() {
            tracing::debug!("Entry {} replaced", key);
        }
        (key, previous)
    }

    pub fn remove(&mut self, key: &StableKey) -> Option<VocabularyEntry> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &StableKey) -> Option<&VocabularyEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &StableKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StableKey, &VocabularyEntry)> {
        self.entries.iter()
    }

    /// Snapshot of every entry
    pub fn all(&self) -> Vec<VocabularyEntry> {
        self.entries.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the contents with persisted entries, re-deriving keys.
    ///
    /// Anchors that are empty or fall outside a document of `doc_len` characters are dropped.
    /// Colliding keys keep the later entry.
    pub fn restore(&mut self, entries: Vec<VocabularyEntry>, doc_len: usize) {
        self.entries.clear();

        for mut entry in entries {
            let before = entry.anchors.len();
            entry.anchors.retain(|anchor| anchor.is_valid_for(doc_len));
            if entry.anchors.len() != before {
                tracing::warn!(
                    "Dropped {} invalid anchor(s) of '{}'",
                    before - entry.anchors.len(),
                    entry.display_form
                );
            }
            // Mirror spans are recomputed against whatever mirror text is loaded next
            entry.mirror_span = None;
            self.insert(entry);
        }

        tracing::info!("Restored {} entries", self.entries.len());
    }

    /// Write one Span Locator pass back into the entries
    pub fn apply_matches(&mut self, matches: Vec<MirrorMatch>) {
        for found in matches {
            let Some(entry) = self.entries.get_mut(&found.key) else {
                continue;
            };
            entry.mirror_span = found.span;
            if let Some(text) = found.matched_text {
                if text != entry.target_meaning {
                    tracing::debug!("Meaning of {} follows mirror text: '{}'", found.key, text);
                    entry.target_meaning = text;
                }
            }
        }
    }

    /// Drop every mirror span, e.g. when the mirror text goes away
    pub fn clear_mirror_spans(&mut self) {
        for entry in self.entries.values_mut() {
            entry.mirror_span = None;
        }
    }

    pub fn mirror_spans(&self) -> Vec<TextRange> {
        self.entries.values().filter_map(|e| e.mirror_span).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use songngu_types::entry::timestamp;

    pub(crate) fn entry(display: &str, paragraph: &str, start: usize, end: usize) -> VocabularyEntry {
        VocabularyEntry {
            display_form: display.to_string(),
            surface_form: display.to_string(),
            part_of_speech: "noun".to_string(),
            phonetic: String::new(),
            target_meaning: String::new(),
            source_gloss: String::new(),
            context_paragraph: paragraph.to_string(),
            anchors: vec![TextRange::new(start, end)],
            mirror_span: None,
            status: "new".to_string(),
            created_at: timestamp::now(),
        }
    }

    #[test]
    fn test_same_paragraph_replaces() {
        let mut store = EntryStore::new();
        let (first, previous) = store.insert(entry("lake", "Paragraph A.", 3, 7));
        assert!(previous.is_none());
        let (second, previous) = store.insert(entry("Lake", "Paragraph A.", 20, 24));
        assert_eq!(first, second);
        assert!(previous.is_some());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&first).unwrap().anchors[0].start, 20);
    }

    #[test]
    fn test_other_paragraph_is_distinct() {
        let mut store = EntryStore::new();
        store.insert(entry("lake", "Paragraph A.", 3, 7));
        store.insert(entry("lake", "Paragraph B.", 40, 44));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_restore_drops_invalid_anchors() {
        let mut store = EntryStore::new();
        let mut broken = entry("calm", "P", 10, 10);
        broken.anchors.push(TextRange::new(2, 6));
        broken.anchors.push(TextRange::new(50, 90));
        broken.mirror_span = Some(TextRange::new(0, 3));

        store.restore(vec![broken, entry("lake", "P", 0, 4)], 20);

        let restored = store.get(&StableKey::derive("calm", "P")).unwrap();
        assert_eq!(restored.anchors, vec![TextRange::new(2, 6)]);
        assert_eq!(restored.mirror_span, None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_apply_matches_rewrites_meaning() {
        let mut store = EntryStore::new();
        let mut e = entry("lake", "P", 0, 4);
        e.target_meaning = "hồ".to_string();
        let (key, _) = store.insert(e);

        store.apply_matches(vec![MirrorMatch {
            key: key.clone(),
            span: Some(TextRange::new(5, 7)),
            matched_text: Some("Hồ".to_string()),
        }]);
        let updated = store.get(&key).unwrap();
        assert_eq!(updated.target_meaning, "Hồ");
        assert_eq!(updated.mirror_span, Some(TextRange::new(5, 7)));

        store.clear_mirror_spans();
        assert!(store.mirror_spans().is_empty());
    }
}
