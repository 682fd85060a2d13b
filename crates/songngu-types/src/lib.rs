pub mod entry;
pub mod range;
pub mod types;

pub use entry::{StableKey, VocabularyEntry};
pub use range::TextRange;
pub use types::{
    AppEvent, DocumentRole, Notice, NoticeKind, Position, ReadingMode, SummaryRow,
};
