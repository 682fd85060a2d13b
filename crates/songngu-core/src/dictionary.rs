/// Dictionary lookup service
#[async_trait::async_trait]
pub trait Dictionary: Send + Sync {
    /// Look up a single headword
    async fn lookup(&self, word: &str) -> Result<DictionaryHit, LookupError>;

    /// Get dictionary metadata
    fn metadata(&self) -> DictionaryMetadata;
}

/// What a dictionary knows about a word; every field may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryHit {
    pub phonetic: String,
    pub part_of_speech: String,
    pub definitions: Vec<String>,
}

impl DictionaryHit {
    pub fn is_empty(&self) -> bool {
        self.phonetic.is_empty() && self.part_of_speech.is_empty() && self.definitions.is_empty()
    }

    pub fn first_definition(&self) -> Option<&str> {
        self.definitions
            .iter()
            .map(|d| d.trim())
            .find(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct DictionaryMetadata {
    pub name: String,
    pub language: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Word not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("Lookup timed out after {0} ms")]
    Timeout(u64),
}
