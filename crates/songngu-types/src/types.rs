use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum AppEvent {
    OpenDocument(PathBuf),
    MarkSelection {
        start: Position,
        end: Position,
    },
    DeleteEntry {
        ordinal: usize,
    },
    TranslateMirror,
    LoadMirror(PathBuf),
    ChangeFont(u16),
    SaveSession(PathBuf),
    LoadSession(PathBuf),
    Export(PathBuf),
    StartReading(ReadingMode),
    TogglePause,
    StopReading,
    ListEntries,
    ShowDocuments,
    ShowSummary(Vec<SummaryRow>),
    ShowText {
        role: DocumentRole,
        text: String,
    },
    ReadingStatus {
        status: String,
        reading: bool,
    },
    Notice(Notice),
    Shutdown,
}

/// 0-based line and column, counted in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Which of the two side-by-side documents an overlay belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentRole {
    Primary,
    Mirror,
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRole::Primary => f.write_str("primary"),
            DocumentRole::Mirror => f.write_str("mirror"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadingMode {
    /// Every paragraph of the primary document, in order
    Paragraph,
    /// The sentence under the cursor
    Sentence { cursor: Position },
    /// A selected word or phrase
    Word { start: Position, end: Position },
    /// One vocabulary entry by its ordinal: the marked text, or the display form
    Entry { ordinal: usize },
}

/// One row of the vocabulary summary table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub ordinal: usize,
    pub key: String,
    pub display_form: String,
    pub part_of_speech: String,
    pub target_meaning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// A message surfaced to the reader; never fatal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.kind {
            NoticeKind::Info => "info",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        };
        write!(f, "[{level}] {}: {}", self.title, self.message)
    }
}
