use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    CompletionOptions, ProviderError, ProviderKind, Result, TextGenerationProvider, SYSTEM_PROMPT,
};
use crate::config::ProviderConfig;

const API_VERSION: &str = "2023-06-01";

/// A [`TextGenerationProvider`] using the Anthropic messages api.
#[derive(Clone, Debug)]
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self> {
        let kind = ProviderKind::Anthropic;
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
impl TextGenerationProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String> {
        let uri = format!("{}/messages", self.base_url);
        log::debug!("Sending message request to {} ({})", uri, self.model);

        let body = MessagesRequest {
            model: &self.model,
            system: SYSTEM_PROMPT,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let resp = self
            .client
            .post(uri)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
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

        let reply: MessagesResponse = serde_json::from_slice(&resp.bytes().await?)?;
        reply.into_text().ok_or(ProviderError::EmptyReply)
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    system: &'static str,
    messages: [Message<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

impl MessagesResponse {
    /// Concatenates all text blocks of the reply.
    fn into_text(self) -> Option<String> {
        let text: String = self
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Message, MessagesRequest, MessagesResponse, SYSTEM_PROMPT};

    #[test]
    fn test_messages_request_body() {
        let body = MessagesRequest {
            model: "claude-3-5-haiku-latest",
            system: SYSTEM_PROMPT,
            messages: [Message {
                role: "user",
                content: "prompt",
            }],
            temperature: 0.25,
            max_tokens: 512,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "model": "claude-3-5-haiku-latest",
                "system": SYSTEM_PROMPT,
                "messages": [
                    {"role": "user", "content": "prompt"},
                ],
                "temperature": 0.25,
                "max_tokens": 512,
            })
        );
    }

    #[test]
    fn test_messages_response_text() {
        let reply: MessagesResponse = serde_json::from_str(
            r#"{
                "id": "msg_1",
                "type": "message",
                "content": [
                    {"type": "text", "text": "Here is the order: "},
                    {"type": "text", "text": "{\"order\": [\"a\"]}"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(
            reply.into_text().as_deref(),
            Some("Here is the order: {\"order\": [\"a\"]}")
        );

        let reply: MessagesResponse =
            serde_json::from_str(r#"{"content": [{"type": "tool_use", "id": "t"}]}"#).unwrap();
        assert_eq!(reply.into_text(), None);
    }
}
