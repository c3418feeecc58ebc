use crate::config::ProviderConfig;
use crate::provider::{ProviderError, TextProvider};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};

static COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI Chat Completions API.
pub struct OpenAiProvider {
    client: ClientWithMiddleware,
    api_key: Option<String>,
    model: String,
}

impl OpenAiProvider {
    pub fn new(client: ClientWithMiddleware, config: &ProviderConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

fn reply_text(raw: &str) -> Result<String, ProviderError> {
    let response: CompletionResponse =
        serde_json::from_str(raw).map_err(|err| ProviderError::Decode(err.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(ProviderError::EmptyReply)
}

#[async_trait]
impl TextProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::NotConfigured)?;
        let body = serde_json::to_vec(&CompletionRequest {
            model: &self.model,
            max_tokens,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        })
        .map_err(|err| ProviderError::Decode(err.to_string()))?;
        let response = self
            .client
            .post(COMPLETIONS_URL)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
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
    fn takes_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"{\"heroTitle\":\"x\"}"}}]}"#;
        assert_eq!(reply_text(raw).unwrap(), "{\"heroTitle\":\"x\"}");
    }

    #[test]
    fn missing_choices_is_empty_reply() {
        assert!(matches!(
            reply_text(r#"{"choices":[]}"#),
            Err(ProviderError::EmptyReply)
        ));
        assert!(matches!(reply_text("<html>"), Err(ProviderError::Decode(_))));
    }
}
