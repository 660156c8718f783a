use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{http_client, send_json, trim_base_url, UpstreamError};

const SERVICE: &str = "Chat completion";

/// A hosted chat model that answers one user message under a system prompt
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, system: &str, message: &str) -> Result<String, UpstreamError>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint
pub struct OpenAiChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(base_url: &str, api_key: Option<String>, model: &str) -> Result<Self, UpstreamError> {
        Ok(Self {
            http: http_client(SERVICE)?,
            base_url: trim_base_url(base_url),
            api_key,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl ChatCompletion for OpenAiChatClient {
    async fn complete(&self, system: &str, message: &str) -> Result<String, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingCredentials {
                service: SERVICE,
                setting: "CHAT_API_KEY",
            })?;

        let body = CompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
            temperature: 0.2,
        };

        debug!("Sending chat completion to model {}", self.model);
        let request = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body);
        let response: CompletionResponse = send_json(SERVICE, request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| UpstreamError::decode(SERVICE, "response contained no message content"))
    }
}
