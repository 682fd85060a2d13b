pub type LanguageCode = String;

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate a marked word or phrase, using its paragraph only to pick the sense
    async fn translate_phrase(
        &self,
        request: PhraseRequest<'_>,
    ) -> Result<PhraseTranslation, TranslateError>;

    /// Translate a whole document, keeping its paragraph breaks
    async fn translate_document(&self, text: &str) -> Result<Translation, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone, Copy)]
pub struct PhraseRequest<'a> {
    /// Exact text the reader selected
    pub phrase: &'a str,
    pub lemma: &'a str,
    pub paragraph: &'a str,
}

/// Short (one to three words) meaning of a phrase, with optional overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseTranslation {
    pub meaning: String,
    pub part_of_speech: Option<String>,
    pub phonetic: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub provider: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Quota exceeded")]
    QuotaExceeded,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("Empty translation")]
    EmptyResponse,
}

impl TranslateError {
    /// Quota, auth and rate errors all mean the account can't serve requests right now
    pub fn is_quota(&self) -> bool {
        matches!(
            self,
            TranslateError::QuotaExceeded
                | TranslateError::RateLimitExceeded
                | TranslateError::AuthenticationError
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_classification() {
        assert!(TranslateError::QuotaExceeded.is_quota());
        assert!(TranslateError::AuthenticationError.is_quota());
        assert!(TranslateError::RateLimitExceeded.is_quota());
        assert!(!TranslateError::ApiError("HTTP 500".into()).is_quota());
        assert!(!TranslateError::EmptyResponse.is_quota());
    }
}
