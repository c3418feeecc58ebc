use crate::config::ProviderConfig;
use crate::provider::{ProviderError, TextProvider};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};

static MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
static API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API.
pub struct ClaudeProvider {
    client: ClientWithMiddleware,
    api_key: Option<String>,
    model: String,
}

impl ClaudeProvider {
    pub fn new(client: ClientWithMiddleware, config: &ProviderConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

fn reply_text(raw: &str) -> Result<String, ProviderError> {
    let response: MessagesResponse =
        serde_json::from_str(raw).map_err(|err| ProviderError::Decode(err.to_string()))?;
    let text = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect::<String>();
    if text.trim().is_empty() {
        return Err(ProviderError::EmptyReply);
    }
    Ok(text)
}

#[async_trait]
impl TextProvider for ClaudeProvider {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::NotConfigured)?;
        let body = serde_json::to_vec(&MessagesRequest {
            model: &self.model,
            max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        })
        .map_err(|err| ProviderError::Decode(err.to_string()))?;
        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        if !status.is_success() {
            return Err(ProviderError::status(status, &raw));
        }
        reply_text(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_text_blocks() {
        let raw = r#"{"content":[{"type":"text","text":"{\"a\":"},{"type":"tool_use"},{"type":"text","text":"1}"}]}"#;
        assert_eq!(reply_text(raw).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn blank_reply_is_an_error() {
        let raw = r#"{"content":[{"type":"text","text":"  "}]}"#;
        assert!(matches!(reply_text(raw), Err(ProviderError::EmptyReply)));
    }
}
