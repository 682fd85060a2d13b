use std::collections::HashMap;

use songngu_types::{StableKey, VocabularyEntry};

use crate::store::EntryStore;

/// Entries ordered by first occurrence, with 1-based contiguous ordinals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderIndex {
    keys: Vec<StableKey>,
    ordinals: HashMap<StableKey, usize>,
}

impl OrderIndex {
    /// Sort by `(first anchor start, first anchor end)`, ties broken by key.
    ///
    /// Entries without anchors go last.
    pub fn build(store: &EntryStore) -> Self {
        let mut ranked: Vec<(SortKey, &StableKey)> = store
            .iter()
            .map(|(key, entry)| (sort_key(entry), key))
            .collect();
        ranked.sort();

        let keys: Vec<StableKey> = ranked.into_iter().map(|(_, key)| key.clone()).collect();
        let ordinals = keys
            .iter()
            .enumerate()
            .map(|(idx, key)| (key.clone(), idx + 1))
            .collect();

        Self { keys, ordinals }
    }

    pub fn ordinal(&self, key: &StableKey) -> Option<usize> {
        self.ordinals.get(key).copied()
    }

    /// Key shown with the given 1-based ordinal
    pub fn key_at(&self, ordinal: usize) -> Option<&StableKey> {
        ordinal.checked_sub(1).and_then(|idx| self.keys.get(idx))
    }

    /// `(ordinal, key)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &StableKey)> {
        self.keys.iter().enumerate().map(|(idx, key)| (idx + 1, key))
    }

    pub fn keys(&self) -> &[StableKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Entries of `store` in display order
    pub fn entries<'s>(&self, store: &'s EntryStore) -> Vec<&'s VocabularyEntry> {
        self.keys.iter().filter_map(|key| store.get(key)).collect()
    }
}

type SortKey = (usize, usize);

fn sort_key(entry: &VocabularyEntry) -> SortKey {
    entry
        .first_anchor()
        .map(|anchor| (anchor.start, anchor.end))
        .unwrap_or((usize::MAX, usize::MAX))
}
