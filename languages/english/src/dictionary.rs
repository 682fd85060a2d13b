use async_trait::async_trait;
use serde_json::Value;
use songngu_core::dictionary::{Dictionary, DictionaryHit, DictionaryMetadata, LookupError};

/// Definitions kept per lookup
const MAX_DEFINITIONS: usize = 5;

/// Client for the free dictionaryapi.dev English dictionary
#[derive(Clone)]
pub struct FreeDictionary {
    client: reqwest::Client,
    api_url: String,
}

impl FreeDictionary {
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }

    fn entry_url(&self, word: &str) -> Result<reqwest::Url, LookupError> {
        let mut url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| LookupError::Network(format!("Invalid dictionary URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| LookupError::Network("Dictionary URL cannot take a path".to_string()))?
            .pop_if_empty()
            .push(word);
        Ok(url)
    }
}

#[async_trait]
impl Dictionary for FreeDictionary {
    async fn lookup(&self, word: &str) -> Result<DictionaryHit, LookupError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(LookupError::NotFound(String::new()));
        }

        let url = self.entry_url(&word.to_lowercase())?;
        tracing::debug!("Dictionary lookup: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        if response.status() == 404 {
            return Err(LookupError::NotFound(word.to_string()));
        }

        if !response.status().is_success() {
            return Err(LookupError::Network(format!("HTTP {}", response.status())));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        let hit = parse_entries(&json);
        if hit.is_empty() {
            return Err(LookupError::NotFound(word.to_string()));
        }
        Ok(hit)
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: "Free Dictionary API".to_string(),
            language: "en".to_string(),
        }
    }
}

/// Phonetic, first part of speech and the leading definitions of a response body
pub fn parse_entries(json: &Value) -> DictionaryHit {
    let entries = json.as_array().map(Vec::as_slice).unwrap_or_default();

    let phonetic = entries
        .iter()
        .flat_map(|entry| {
            let main = entry["phonetic"].as_str();
            let alternatives = entry["phonetics"]
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|p| p["text"].as_str());
            main.into_iter().chain(alternatives)
        })
        .map(str::trim)
        .find(|p| !p.is_empty())
        .unwrap_or_default()
        .to_string();

    let meanings: Vec<&Value> = entries
        .iter()
        .flat_map(|entry| entry["meanings"].as_array().into_iter().flatten())
        .collect();

    let part_of_speech = meanings
        .iter()
        .filter_map(|m| m["partOfSpeech"].as_str())
        .find(|p| !p.is_empty())
        .unwrap_or_default()
        .to_string();

    let definitions = meanings
        .iter()
        .flat_map(|m| m["definitions"].as_array().into_iter().flatten())
        .filter_map(|d| d["definition"].as_str())
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .take(MAX_DEFINITIONS)
        .map(str::to_string)
        .collect();

    DictionaryHit {
        phonetic,
        part_of_speech,
        definitions,
    }
}
