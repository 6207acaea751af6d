//! OpenAI Provider
//!
//! Calls `v1/chat/completions` with a bearer token.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use super::provider::{
    http_client, send_json, CompletionProvider, ProviderConfig, ProviderError, ProviderKind,
};

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Default, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    pub(crate) fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default()
    }
}

/// OpenAI chat completion provider.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    config: ProviderConfig,
    api_key: String,
}

impl OpenAiProvider {
    /// Create a provider. Fails when the config carries no API key.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config.require_api_key()?;
        let client = http_client()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub(crate) fn url(&self) -> Result<Url, ProviderError> {
        self.config.endpoint("v1/chat/completions")
    }

    pub(crate) fn request_body<'a>(&'a self, prompt: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_output_tokens,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.model))]
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = self
            .client
            .post(self.url()?)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt));

        let response: ChatCompletionResponse = send_json(request).await?;
        Ok(response.into_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let provider =
            OpenAiProvider::new(ProviderConfig::new(ProviderKind::OpenAi).with_api_key("k")).unwrap();
        let body = serde_json::to_value(provider.request_body("hello")).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["max_tokens"], 1500);
        assert_eq!(
            provider.url().unwrap().as_str(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_extracts_first_choice_content() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"a\":1}"}}]
        }))
        .unwrap();
        assert_eq!(response.into_text(), "{\"a\":1}");

        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert_eq!(response.into_text(), "");
    }
}
