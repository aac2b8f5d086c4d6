use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use super::{
    CompletionOptions, ProviderError, ProviderKind, Result, TextGenerationProvider, SYSTEM_PROMPT,
};
use crate::config::ProviderConfig;

/// A [`TextGenerationProvider`] using the OpenAI chat completions api.
#[derive(Clone, Debug)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self> {
        let kind = ProviderKind::OpenAi;
        let api_key = config
            .api_key()
            .ok_or(ProviderError::MissingCredential(kind))?;

        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            api_key: api_key.to_owned(),
            model: config.model(kind).to_owned(),
            base_url: config.base_url(kind).to_owned(),
        })
    }
}

#[async_trait]
impl TextGenerationProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String> {
        let uri = format!("{}/chat/completions", self.base_url);
        log::debug!("Sending completion request to {} ({})", uri, self.model);

        let body = ChatRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let resp = self
            .client
            .post(uri)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = serde_json::from_slice(&resp.bytes().await?)?;
        reply.into_text().ok_or(ProviderError::EmptyReply)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

impl ChatResponse {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{ChatRequest, ChatResponse, Message};

    #[test]
    fn test_chat_request_body() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: [
                Message {
                    role: "system",
                    content: "sys",
                },
                Message {
                    role: "user",
                    content: "prompt",
                },
            ],
            temperature: 0.25,
            max_tokens: 1000,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "prompt"},
                ],
                "temperature": 0.25,
                "max_tokens": 1000,
            })
        );
    }

    #[test]
    fn test_chat_response_text() {
        let reply: ChatResponse = serde_json::from_str(
            r#"{"id": "x", "choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"order\": []}"}}]}"#,
        )
        .unwrap();
        assert_eq!(reply.into_text().as_deref(), Some("{\"order\": []}"));

        let reply: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(reply.into_text(), None);

        let reply: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert_eq!(reply.into_text(), None);
    }
}
