//! Matching entry meanings against the mirror (translated) document.
//!
//! One pass walks the entries in first-occurrence order and gives each the leftmost
//! case-insensitive occurrence of its meaning that no earlier entry has claimed.
//! Passes always start from scratch.

use songngu_types::{StableKey, TextRange};

use crate::order::OrderIndex;
use crate::store::EntryStore;

/// Outcome of one entry in a locator pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorMatch {
    pub key: StableKey,
    /// `None` when the meaning is empty or every occurrence is taken
    pub span: Option<TextRange>,
    /// Mirror text under `span`, in the mirror's own casing
    pub matched_text: Option<String>,
}

/// Run a full pass for the store's entries in Order Index order
pub fn locate(store: &EntryStore, order: &OrderIndex, mirror: &str) -> Vec<MirrorMatch> {
    let needles = order.keys().iter().filter_map(|key| {
        store
            .get(key)
            .map(|entry| (key.clone(), entry.target_meaning.as_str()))
    });
    locate_needles(mirror, needles)
}

/// Core of the pass over `(key, meaning)` pairs already in priority order
pub fn locate_needles<'a>(
    mirror: &str,
    needles: impl IntoIterator<Item = (StableKey, &'a str)>,
) -> Vec<MirrorMatch> {
    let haystack: Vec<char> = mirror.chars().collect();
    let mut claimed: Vec<TextRange> = Vec::new();
    let mut matches = Vec::new();

    for (key, meaning) in needles {
        let needle: Vec<char> = meaning.trim().chars().collect();
        if needle.is_empty() {
            matches.push(MirrorMatch {
                key,
                span: None,
                matched_text: None,
            });
            continue;
        }

        let found = find_unclaimed(&haystack, &needle, &claimed);
        match found {
            Some(span) => {
                claimed.push(span);
                let text: String = haystack[span.start..span.end].iter().collect();
                matches.push(MirrorMatch {
                    key,
                    span: Some(span),
                    matched_text: Some(text),
                });
            }
            None => {
                tracing::debug!("No free occurrence of '{}' in mirror", meaning.trim());
                matches.push(MirrorMatch {
                    key,
                    span: None,
                    matched_text: None,
                });
            }
        }
    }

    matches
}

fn find_unclaimed(haystack: &[char], needle: &[char], claimed: &[TextRange]) -> Option<TextRange> {
    let mut from = 0;
    while let Some(start) = find_from(haystack, needle, from) {
        let candidate = TextRange::new(start, start + needle.len());
        if !claimed.iter().any(|taken| taken.overlaps(&candidate)) {
            return Some(candidate);
        }
        from = start + 1;
    }
    None
}

/// Leftmost case-insensitive occurrence of `needle` at or after `from`
fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&start| {
        haystack[start..start + needle.len()]
            .iter()
            .zip(needle)
            .all(|(a, b)| chars_eq_ignore_case(*a, *b))
    })
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::entry;

    const MIRROR: &str = "Tôi có hai nhà gần hồ. hồ rất yên.";

    fn key(name: &str) -> StableKey {
        StableKey::derive(name, "P")
    }

    #[test]
    fn test_first_occurrences_in_order() {
        let mut store = EntryStore::new();
        let mut house = entry("house", "P", 10, 16);
        house.target_meaning = "nhà".to_string();
        let mut lake = entry("lake", "P", 25, 29);
        lake.target_meaning = "hồ".to_string();
        store.insert(house);
        store.insert(lake);

        let order = OrderIndex::build(&store);
        let matches = locate(&store, &order, MIRROR);

        assert_eq!(matches[0].key, key("house"));
        assert_eq!(matches[0].span, Some(TextRange::new(11, 14)));
        assert_eq!(matches[1].key, key("lake"));
        assert_eq!(matches[1].span, Some(TextRange::new(19, 21)));
        assert!(!matches[0].span.unwrap().overlaps(&matches[1].span.unwrap()));
    }

    #[test]
    fn test_earlier_entry_wins_contested_match() {
        let needles = vec![(key("lake"), "hồ"), (key("pond"), "HỒ"), (key("pool"), "hồ")];
        let matches = locate_needles(MIRROR, needles);

        assert_eq!(matches[0].span, Some(TextRange::new(19, 21)));
        assert_eq!(matches[1].span, Some(TextRange::new(23, 25)));
        assert_eq!(matches[1].matched_text.as_deref(), Some("hồ"));
        assert_eq!(matches[2].span, None);
    }

    #[test]
    fn test_overlapping_candidates_are_rechecked() {
        let needles = vec![(key("a"), "ana"), (key("b"), "nan")];
        let matches = locate_needles("banana", needles);
        assert_eq!(matches[0].span, Some(TextRange::new(1, 4)));
        assert_eq!(matches[1].span, None);

        let needles = vec![(key("a"), "an"), (key("b"), "an"), (key("c"), "na")];
        let matches = locate_needles("banana", needles);
        assert_eq!(matches[0].span, Some(TextRange::new(1, 3)));
        assert_eq!(matches[1].span, Some(TextRange::new(3, 5)));
        assert_eq!(matches[2].span, None);
    }

    #[test]
    fn test_empty_meaning_and_empty_mirror() {
        let matches = locate_needles(MIRROR, vec![(key("x"), "  ")]);
        assert_eq!(matches[0].span, None);

        let matches = locate_needles("", vec![(key("x"), "nhà")]);
        assert_eq!(matches[0].span, None);
    }

    #[test]
    fn test_no_overlap_across_many_entries() {
        let mirror = "nhà nhà hồ nhà hồ hồ";
        let needles = vec![
            (key("1"), "nhà"),
            (key("2"), "hồ"),
            (key("3"), "nhà"),
            (key("4"), "hồ"),
            (key("5"), "nhà"),
            (key("6"), "nhà"),
        ];
        let matches = locate_needles(mirror, needles);
        let spans: Vec<_> = matches.iter().filter_map(|m| m.span).collect();
        for (i, a) in spans.iter().enumerate() {
            for b in &spans[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
        assert_eq!(spans.len(), 5);
        assert_eq!(matches[5].span, None);
    }
}
