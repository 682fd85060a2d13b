use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::range::TextRange;

/// Identity of a vocabulary entry: `lowercase(display form) | hash(context paragraph)`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StableKey(String);

impl StableKey {
    pub fn derive(display_form: &str, context_paragraph: &str) -> Self {
        Self(format!(
            "{}|{:016x}",
            display_form.to_lowercase(),
            paragraph_hash(context_paragraph)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fx hashing has no per-process seed, so the value is the same after a reload
pub fn paragraph_hash(paragraph: &str) -> u64 {
    let mut hasher = FxHasher::default();
    paragraph.hash(&mut hasher);
    hasher.finish()
}

fn default_status() -> String {
    "new".to_string()
}

/// A marked word or phrase anchored in the primary document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Lemma shown in the summary table
    #[serde(alias = "display")]
    pub display_form: String,
    /// Exact text the reader selected
    #[serde(alias = "surface", default)]
    pub surface_form: String,
    #[serde(alias = "pos", default)]
    pub part_of_speech: String,
    #[serde(alias = "ipa", default)]
    pub phonetic: String,
    #[serde(alias = "vi_meaning", default)]
    pub target_meaning: String,
    #[serde(alias = "gloss_en", default)]
    pub source_gloss: String,
    #[serde(alias = "context_sentence", default)]
    pub context_paragraph: String,
    #[serde(alias = "offsets", default)]
    pub anchors: Vec<TextRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_span: Option<TextRange>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(alias = "added_at", with = "timestamp", default = "timestamp::now")]
    pub created_at: NaiveDateTime,
}

impl VocabularyEntry {
    pub fn key(&self) -> StableKey {
        StableKey::derive(&self.display_form, &self.context_paragraph)
    }

    pub fn first_anchor(&self) -> Option<TextRange> {
        self.anchors.first().copied()
    }
}

pub mod timestamp {
    use chrono::{DateTime, Local, NaiveDateTime, SubsecRound};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Current local time at the stored precision
    pub fn now() -> NaiveDateTime {
        Local::now().naive_local().trunc_subsecs(0)
    }

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    /// Accepts the plain format and RFC 3339; anything else (including "") becomes now
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(parse(&raw).unwrap_or_else(now))
    }

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        NaiveDateTime::parse_from_str(raw, FORMAT).ok().or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Local).naive_local())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_separates_paragraphs() {
        let a = StableKey::derive("Lake", "I have two houses near the lake.");
        let b = StableKey::derive("lake", "The lake is calm.");
        let again = StableKey::derive("lake", "I have two houses near the lake.");
        assert_ne!(a, b);
        assert_eq!(a, again);
        assert!(a.as_str().starts_with("lake|"));
    }

    #[test]
    fn test_legacy_entry_fields() {
        let json = r#"{
            "display": "house",
            "pos": "noun",
            "ipa": "/haʊs/",
            "vi_meaning": "nhà",
            "gloss_en": "A building",
            "context_sentence": "I have two houses near the lake.",
            "offsets": [{"abs_start": 11, "abs_end": 17}],
            "status": "new",
            "added_at": "2024-05-01 10:20:30"
        }"#;
        let entry: VocabularyEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.display_form, "house");
        assert_eq!(entry.surface_form, "");
        assert_eq!(entry.anchors, vec![TextRange::new(11, 17)]);
        assert_eq!(entry.mirror_span, None);
        assert_eq!(
            entry.created_at.format(timestamp::FORMAT).to_string(),
            "2024-05-01 10:20:30"
        );
    }
}
