//! OpenAI chat-completions answer synthesizer

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::DomainError;
use crate::domain::generation::AnswerSynthesizer;
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// OpenAI chat-completions synthesizer.
///
/// Sends the rendered prompt as a single user message and returns the first
/// choice's content verbatim.
#[derive(Debug)]
pub struct OpenAiSynthesizer<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl<C: HttpClientTrait> OpenAiSynthesizer<C> {
    /// Create a new synthesizer with the default model
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    /// Create a new synthesizer with custom base URL
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Set the chat model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<String, DomainError> {
        let response: OpenAiChatResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse chat response: {}", e))
        })?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| DomainError::provider("openai", "Chat response contained no choices"))
    }
}

#[async_trait]
impl<C: HttpClientTrait> AnswerSynthesizer for OpenAiSynthesizer<C> {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        let body = serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                {"role": "user", "content": prompt}
            ],
        });

        let response = self
            .client
            .post_json(&self.completions_url(), self.headers(), &body)
            .await?;

        self.parse_response(response)
    }

    fn synthesizer_name(&self) -> &'static str {
        "openai"
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChatChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChatChoice {
    message: OpenAiChatMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiChatMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    fn chat_response(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-123",
            "model": "gpt-4o-mini",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 50, "completion_tokens": 20, "total_tokens": 70}
        })
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice_text() {
        let client = MockHttpClient::new().with_response(chat_response("Refunds take 30 days."));
        let synthesizer = OpenAiSynthesizer::new(client, "sk-test");

        let answer = synthesizer.generate("a prompt").await.unwrap();

        assert_eq!(answer, "Refunds take 30 days.");
    }

    #[tokio::test]
    async fn test_request_shape() {
        let client = MockHttpClient::new().with_response(chat_response("ok"));
        let synthesizer = OpenAiSynthesizer::new(client, "sk-test")
            .with_model("gpt-4o-mini")
            .with_temperature(0.2);

        synthesizer.generate("the prompt").await.unwrap();

        let requests = synthesizer.client.requests();
        assert!(requests[0].url.ends_with("/v1/chat/completions"));

        let body = requests[0].body.as_ref().unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "the prompt");
    }

    #[tokio::test]
    async fn test_empty_choices_is_error() {
        let client = MockHttpClient::new().with_response(json!({"choices": []}));
        let synthesizer = OpenAiSynthesizer::new(client, "sk-test");

        assert!(synthesizer.generate("a prompt").await.is_err());
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let client = MockHttpClient::new().with_error("rate limited");
        let synthesizer = OpenAiSynthesizer::new(client, "sk-test");

        assert!(synthesizer.generate("a prompt").await.is_err());
    }
}
