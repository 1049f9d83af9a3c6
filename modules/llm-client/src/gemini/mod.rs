pub(crate) mod types;

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::schema::StructuredOutput;
use types::{Content, GenerateRequest, GenerateResponse, Part};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini generateContent client restricted to structured output.
///
/// Gemini has no strict json_schema response mode, so the schema is
/// embedded in the prompt and the reply is salvaged from markdown
/// fences or the outermost brace pair before typed deserialization.
/// A salvage or parse failure is an error at this boundary, handled
/// by callers exactly like a transport failure.
#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    model: String,
    http: reqwest::Client,
    base_url: String,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            http: reqwest::Client::new(),
            base_url: GEMINI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a typed structured response for `instructions` applied
    /// to a JSON `payload`.
    pub async fn extract<T: StructuredOutput>(
        &self,
        instructions: &str,
        payload: &serde_json::Value,
    ) -> Result<T> {
        let schema_text = serde_json::to_string_pretty(&T::strict_schema())?;
        let payload_text = serde_json::to_string_pretty(payload)?;
        let prompt = format!(
            "{instructions}\n\n\
             Input payload (JSON):\n{payload_text}\n\n\
             Output requirements:\n\
             - Return only valid JSON.\n\
             - Do not include markdown fences.\n\
             - Match this JSON schema exactly:\n{schema_text}\n"
        );

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        debug!(model = %self.model, output = %T::type_name(), "Gemini structured output request");

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self.http.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!("Gemini API error ({}): {}", status, error_text));
        }

        let body: GenerateResponse = response.json().await?;
        let text = body
            .candidates
            .into_iter()
            .flat_map(|candidate| candidate.content.map(|c| c.parts).unwrap_or_default())
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(anyhow!("Gemini returned no text content"));
        }

        let json_text = salvage_json(&text)
            .ok_or_else(|| anyhow!("Could not locate JSON in Gemini response"))?;

        serde_json::from_str(&json_text)
            .map_err(|e| anyhow!("Gemini response failed schema validation: {}", e))
    }
}

/// Pull a JSON object out of model text that may be wrapped in markdown
/// fences or surrounded by prose. Returns None when no object is found.
fn salvage_json(text: &str) -> Option<String> {
    let mut candidate = text.trim();

    if let Some((_, after)) = candidate.split_once("```json") {
        candidate = after;
    }
    if let Some((before, _)) = candidate.split_once("```") {
        candidate = before;
    }
    let candidate = candidate.trim();

    if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
        return Some(candidate.to_string());
    }

    let start = candidate.find('{')?;
    let end = candidate.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(candidate[start..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salvages_fenced_json() {
        let text = "Here you go:\n```json\n{\"a\": 1}\n```\nthanks";
        assert_eq!(salvage_json(text).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn salvages_bare_json() {
        assert_eq!(salvage_json("  {\"a\": 1} ").unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn salvages_json_embedded_in_prose() {
        let text = "The answer is {\"verdict\": \"Supported\"} as requested.";
        assert_eq!(
            salvage_json(text).unwrap(),
            "{\"verdict\": \"Supported\"}"
        );
    }

    #[test]
    fn rejects_text_without_object() {
        assert!(salvage_json("no json here").is_none());
    }
}
