use async_trait::async_trait;
use serde_json::{Value, json};
use songngu_translator::{
    LanguageCode, PhraseRequest, PhraseTranslation, ProviderMetadata, TranslateError,
    Translation, Translator,
};

/// OpenAI chat completions used for both phrase meanings and the mirror document
#[derive(Clone)]
pub struct OpenAiTranslator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
    from: LanguageCode,
    to: LanguageCode,
}

impl OpenAiTranslator {
    pub fn new(api_key: String, api_url: String, model: String, from: &str, to: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_url,
            model,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    async fn chat(&self, system: &str, user: &str, temperature: f32) -> Result<String, TranslateError> {
        if self.api_key.is_empty() {
            return Err(TranslateError::AuthenticationError);
        }

        let body = json!({
            "model": self.model,
            "temperature": temperature,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_error(status.as_u16(), &text));
        }

        let json: Value = response.json().await.map_err(|e| {
            TranslateError::ApiError(format!("Failed to parse response: {}", e))
        })?;

        message_content(&json).ok_or(TranslateError::EmptyResponse)
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate_phrase(
        &self,
        request: PhraseRequest<'_>,
    ) -> Result<PhraseTranslation, TranslateError> {
        let system = phrase_prompt(&self.from, &self.to);
        let user = format!(
            "Word in text: {}\nLemma: {}\nParagraph: {}\nReturn only the {} translation.",
            request.phrase,
            request.lemma,
            request.paragraph,
            language_name(&self.to)
        );

        let reply = self.chat(&system, &user, 0.2).await?;
        let meaning = reply
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or(TranslateError::EmptyResponse)?;

        Ok(PhraseTranslation {
            meaning: meaning.to_string(),
            ..Default::default()
        })
    }

    async fn translate_document(&self, text: &str) -> Result<Translation, TranslateError> {
        let system = format!(
            "Translate the user's {} text into natural {}. Keep every paragraph break \
             (blank line) exactly where it is. Output only the translation.",
            language_name(&self.from),
            language_name(&self.to)
        );

        tracing::info!("Translating document ({} chars) with {}", text.chars().count(), self.model);
        let translated = self.chat(&system, text, 0.3).await?;

        Ok(Translation {
            text: translated,
            from: self.from.clone(),
            to: self.to.clone(),
            provider: "openai".to_string(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "OpenAI".to_string(),
            requires_api_key: true,
        }
    }
}

fn phrase_prompt(from: &str, to: &str) -> String {
    let (from, to) = (language_name(from), language_name(to));
    format!(
        "You translate vocabulary for learners. Translate the isolated {from} word or phrase \
         exactly as given into natural {to}. Use the paragraph only to determine the \
         appropriate sense. Always output a concise translation of one to three {to} words in \
         base form. Do not include words that are not part of the highlighted term."
    )
}

fn language_name(code: &str) -> &str {
    match code {
        "en" => "English",
        "vi" => "Vietnamese",
        "fr" => "French",
        "de" => "German",
        "ja" => "Japanese",
        other => other,
    }
}

/// First choice's message text, if any
pub fn message_content(json: &Value) -> Option<String> {
    json["choices"]
        .get(0)
        .and_then(|choice| choice["message"]["content"].as_str())
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

/// Map a failed response onto the error taxonomy; an exhausted quota beats the status code
pub fn classify_error(status: u16, body: &str) -> TranslateError {
    if body.contains("insufficient_quota") {
        return TranslateError::QuotaExceeded;
    }
    match status {
        401 | 403 => TranslateError::AuthenticationError,
        429 => TranslateError::RateLimitExceeded,
        _ => TranslateError::ApiError(format!("HTTP {}", status)),
    }
}
