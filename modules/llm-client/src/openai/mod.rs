pub(crate) mod types;

use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::schema::StructuredOutput;
use types::{
    ChatResponse, JsonSchemaFormat, ResponseFormat, StructuredRequest, WebSearchOptions,
    WireMessage,
};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat-completions client restricted to structured output.
#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    model: String,
    http: reqwest::Client,
    base_url: String,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            http: reqwest::Client::new(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Typed structured-output extraction. Returns an error when the
    /// API call fails or the response body does not deserialize into
    /// `T` — callers treat both the same way as a transport failure.
    pub async fn extract<T: StructuredOutput>(
        &self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<T> {
        self.extract_inner(system_prompt.into(), user_prompt.into(), None)
            .await
    }

    /// Structured output with the hosted web search tool enabled.
    /// `search_context_size` is "low", "medium" or "high". Search-enabled
    /// models reject an explicit temperature, so none is sent.
    pub async fn extract_with_web_search<T: StructuredOutput>(
        &self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        search_context_size: impl Into<String>,
    ) -> Result<T> {
        self.extract_inner(
            system_prompt.into(),
            user_prompt.into(),
            Some(WebSearchOptions {
                search_context_size: search_context_size.into(),
            }),
        )
        .await
    }

    async fn extract_inner<T: StructuredOutput>(
        &self,
        system_prompt: String,
        user_prompt: String,
        web_search_options: Option<WebSearchOptions>,
    ) -> Result<T> {
        let temperature = if web_search_options.is_none() {
            Some(0.0)
        } else {
            None
        };
        let request = StructuredRequest {
            model: self.model.clone(),
            messages: vec![
                WireMessage::system(system_prompt),
                WireMessage::user(user_prompt),
            ],
            temperature,
            web_search_options,
            response_format: ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: JsonSchemaFormat {
                    name: T::type_name(),
                    strict: true,
                    schema: T::strict_schema(),
                },
            },
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %request.model, output = %T::type_name(), "OpenAI structured output request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!("OpenAI API error ({}): {}", status, error_text));
        }

        let chat_response: ChatResponse = response.json().await?;
        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("No response content from OpenAI"))?;

        serde_json::from_str(&content)
            .map_err(|e| anyhow!("OpenAI response failed schema validation: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_defaults_to_public_endpoint() {
        let client = OpenAi::new("sk-test", "gpt-4.1-mini");
        assert_eq!(client.model(), "gpt-4.1-mini");
        assert_eq!(client.base_url, OPENAI_API_URL);
    }

    #[test]
    fn base_url_override() {
        let client = OpenAi::new("sk-test", "gpt-4.1-mini").with_base_url("http://localhost:9999");
        assert_eq!(client.base_url, "http://localhost:9999");
    }
}
