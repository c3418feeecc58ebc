use crate::config::{Config, ProviderKind};
use async_trait::async_trait;
use derive_more::{Display, Error};
use reqwest_middleware::ClientWithMiddleware;
use std::sync::Arc;

pub mod claude;
pub mod openai;

pub use claude::ClaudeProvider;
pub use openai::OpenAiProvider;

/// Longest provider error body kept in logs and error messages.
const ERROR_BODY_LIMIT: usize = 300;

#[derive(Debug, Display, Error)]
pub enum ProviderError {
    #[display("API key is not configured")]
    NotConfigured,
    #[error(ignore)]
    #[display("Transport error: {_0}")]
    Transport(String),
    #[display("API responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[display("API returned an empty reply")]
    EmptyReply,
    #[error(ignore)]
    #[display("Unable to decode API response: {_0}")]
    Decode(String),
}

impl ProviderError {
    pub(crate) fn status(status: reqwest::StatusCode, body: &str) -> Self {
        Self::Status {
            status: status.as_u16(),
            body: pagegen_types::truncate_chars(body.trim(), ERROR_BODY_LIMIT),
        }
    }
}

#[derive(Debug, Display)]
#[display("{provider}: {error}")]
pub struct ProviderFailure {
    pub provider: &'static str,
    pub error: ProviderError,
}

/// A generative text service taking a prompt and answering with free text.
#[async_trait]
pub trait TextProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_configured(&self) -> bool;

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub provider: &'static str,
    pub text: String,
}

/// Providers tried strictly in order; the first success wins.
#[derive(Clone)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn TextProvider>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn TextProvider>>) -> Self {
        Self { providers }
    }

    /// Chain in the configured attempt order: primary first, then the other.
    pub fn from_config(config: &Config, client: ClientWithMiddleware) -> Self {
        let providers = config
            .provider_order()
            .into_iter()
            .map(|kind| -> Arc<dyn TextProvider> {
                match kind {
                    ProviderKind::Claude => Arc::new(ClaudeProvider::new(client.clone(), &config.claude)),
                    ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(client.clone(), &config.openai)),
                }
            })
            .collect();
        Self::new(providers)
    }

    pub fn providers(&self) -> &[Arc<dyn TextProvider>] {
        &self.providers
    }

    /// Runs the attempts one after another. Returns every failure, in
    /// attempt order, when no provider produced an answer.
    pub async fn first_success(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<Answer, Vec<ProviderFailure>> {
        let mut failures = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let attempt = if provider.is_configured() {
                provider.complete(prompt, max_tokens).await
            } else {
                Err(ProviderError::NotConfigured)
            };
            match attempt {
                Ok(text) => {
                    if !failures.is_empty() {
                        log::info!(
                            "Provider {} answered after {} failed attempt(s)",
                            provider.name(),
                            failures.len()
                        );
                    }
                    return Ok(Answer {
                        provider: provider.name(),
                        text,
                    });
                }
                Err(error) => {
                    log::warn!("Provider {} failed: {error}", provider.name());
                    failures.push(ProviderFailure {
                        provider: provider.name(),
                        error,
                    });
                }
            }
        }
        Err(failures)
    }
}
