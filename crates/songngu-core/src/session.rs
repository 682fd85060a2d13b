use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use songngu_config::reader::DEFAULT_FONT_SIZE;
use songngu_types::VocabularyEntry;
use songngu_types::entry::timestamp;

use crate::error::AnnotateError;

fn default_theme() -> String {
    "light".to_string()
}

fn default_font_size() -> u16 {
    DEFAULT_FONT_SIZE
}

/// A saved reading session: the document, its entries and display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub text_path: Option<PathBuf>,
    #[serde(default)]
    pub text_content: String,
    #[serde(with = "timestamp", default = "timestamp::now")]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub entries: Vec<VocabularyEntry>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_font_size")]
    pub font_size: u16,
}

impl Session {
    pub fn to_json(&self) -> Result<String, AnnotateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self, AnnotateError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), AnnotateError> {
        fs::write(path, self.to_json()?)?;
        tracing::info!("Saved {} entries to {}", self.entries.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, AnnotateError> {
        let data = fs::read_to_string(path)?;
        let session = Self::from_json(&data)?;
        tracing::info!(
            "Loaded session with {} entries from {}",
            session.entries.len(),
            path.display()
        );
        Ok(session)
    }
}

pub const EXPORT_HEADER: &str = "word\tpos\tmeaning_vi";

/// Tab-separated word list, one row per entry in the given order
pub fn export_tsv<'a>(entries: impl IntoIterator<Item = &'a VocabularyEntry>) -> String {
    let mut out = String::from(EXPORT_HEADER);
    out.push('\n');
    for entry in entries {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            single_line(&entry.display_form),
            single_line(&entry.part_of_speech),
            single_line(&entry.target_meaning)
        ));
    }
    out
}

/// Write the export file; an empty word list is refused and nothing is written
pub fn write_export(path: &Path, entries: &[&VocabularyEntry]) -> Result<usize, AnnotateError> {
    if entries.is_empty() {
        return Err(AnnotateError::NothingToExport);
    }
    fs::write(path, export_tsv(entries.iter().copied()))?;
    tracing::info!("Exported {} entries to {}", entries.len(), path.display());
    Ok(entries.len())
}

fn single_line(field: &str) -> String {
    field.replace(['\r', '\n', '\t'], " ")
}
