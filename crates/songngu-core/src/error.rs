use crate::reading::ReadingError;

/// Failures of annotation operations; none of them leave the entry store half-updated
#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    #[error("Selection is empty after trimming")]
    EmptySelection,

    #[error("No document is open")]
    NoDocument,

    #[error("No entry with number {0}")]
    UnknownOrdinal(usize),

    #[error("Lookup failed: {0}")]
    LookupFailure(String),

    #[error("Translation quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Nothing to export")]
    NothingToExport,

    #[error(transparent)]
    Reading(#[from] ReadingError),

    #[error("Session error: {0}")]
    Session(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnnotateError {
    /// Whether the reader gets a warning rather than an error
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            AnnotateError::EmptySelection
                | AnnotateError::LookupFailure(_)
                | AnnotateError::QuotaExceeded(_)
                | AnnotateError::NothingToExport
                | AnnotateError::Reading(ReadingError::AlreadyActive)
        )
    }
}
