use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use shared::{ChatRequest, ChatResponse};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::error::{DomainError, DomainResult};
use crate::upstream::ChatCompletion;

static JSON_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("valid regex"));

/// Parse the first fenced ```` ```json ```` block in a reply.
/// Returns None when there is no block or it is not valid JSON.
pub fn extract_json_block(reply: &str) -> Option<Value> {
    let captures = JSON_BLOCK.captures(reply)?;
    let block = captures.get(1)?.as_str();
    match serde_json::from_str(block) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Chat reply carried an unparseable JSON block: {}", e);
            None
        }
    }
}

/// Forwards user questions to the chat model under the configured system prompt
#[derive(Clone)]
pub struct ChatService {
    client: Arc<dyn ChatCompletion>,
    system_prompt: String,
}

impl ChatService {
    pub fn new(client: Arc<dyn ChatCompletion>, system_prompt: impl Into<String>) -> Self {
        Self {
            client,
            system_prompt: system_prompt.into(),
        }
    }

    pub async fn reply(&self, request: &ChatRequest) -> DomainResult<ChatResponse> {
        let message = request
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| DomainError::invalid("message", "Message is required"))?;

        info!("Forwarding chat message ({} chars)", message.len());
        let reply = self.client.complete(&self.system_prompt, message).await?;
        let structured = extract_json_block(&reply);

        Ok(ChatResponse { reply, structured })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::UpstreamError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct CannedChat {
        reply: String,
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ChatCompletion for CannedChat {
        async fn complete(&self, system: &str, message: &str) -> Result<String, UpstreamError> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), message.to_string()));
            Ok(self.reply.clone())
        }
    }

    fn canned(reply: &str) -> Arc<CannedChat> {
        Arc::new(CannedChat {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        })
    }

    #[test]
    fn test_extract_json_block() {
        let reply = "Here you go:\n```json\n{\"response\": [{\"Category\": \"Food\", \"Recommendation\": \"Cook at home\"}]}\n```\nGood luck!";
        assert_eq!(
            extract_json_block(reply),
            Some(json!({"response": [{"Category": "Food", "Recommendation": "Cook at home"}]}))
        );
    }

    #[test]
    fn test_extract_json_block_absent_or_broken() {
        assert_eq!(extract_json_block("No structure here."), None);
        assert_eq!(extract_json_block("```json\n{not json}\n```"), None);
    }

    #[tokio::test]
    async fn test_reply_sends_system_prompt_and_trimmed_message() {
        let chat = canned("Save more.\n```json\n{\"response\": []}\n```");
        let service = ChatService::new(chat.clone(), "You are a financial assistant.");

        let response = service
            .reply(&ChatRequest {
                message: Some("  How do I budget?  ".to_string()),
            })
            .await
            .unwrap();

        assert!(response.reply.starts_with("Save more."));
        assert_eq!(response.structured, Some(json!({"response": []})));
        let seen = chat.seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[(
                "You are a financial assistant.".to_string(),
                "How do I budget?".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let chat = canned("unused");
        let service = ChatService::new(chat.clone(), "prompt");

        let err = service.reply(&ChatRequest { message: Some("  ".to_string()) }).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(chat.seen.lock().unwrap().is_empty());
    }
}
