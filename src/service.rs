use crate::binder;
use crate::ingredient::{self, RowSource};
use crate::labelled;
use crate::prompt;
use crate::provider::{ProviderChain, ProviderFailure};
use crate::repair::{self, RepairStage};
use crate::seo;
use crate::template::PageTemplate;
use actix::prelude::*;
use derive_more::{Display, Error};
use itertools::Itertools;
use log_error::LogError;
use pagegen_types::{GeneratedContent, ProductRequest, SeoResult, ValidationError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Token budget for the narrow ingredient-table call.
pub const INGREDIENT_MAX_TOKENS: u32 = 1000;

#[derive(Debug, Display, Error)]
pub enum GenerationError {
    #[display("{_0}")]
    Validation(ValidationError),
    #[error(ignore)]
    #[display("No text provider is available ({})", _0.iter().join("; "))]
    ProviderUnavailable(Vec<ProviderFailure>),
    #[display("Unable to extract product data from text")]
    Unparseable,
}

impl From<ValidationError> for GenerationError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GeneratedPage {
    pub html: String,
    pub seo: SeoResult,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub providers: BTreeMap<&'static str, bool>,
    pub active_provider: Option<&'static str>,
    pub template: &'static str,
}

#[derive(Message)]
#[rtype(result = "Result<GeneratedPage, GenerationError>")]
pub struct Generate(pub ProductRequest);

#[derive(Message)]
#[rtype(result = "Result<ProductRequest, GenerationError>")]
pub struct ParseText(pub String);

#[derive(Message)]
#[rtype(result = "HealthStatus")]
pub struct Health;

pub struct GenerationService {
    chain: ProviderChain,
    template: Arc<PageTemplate>,
    max_tokens: u32,
}

impl GenerationService {
    pub fn new(chain: ProviderChain, template: Arc<PageTemplate>, max_tokens: u32) -> Self {
        Self {
            chain,
            template,
            max_tokens,
        }
    }
}

impl Actor for GenerationService {
    type Context = Context<Self>;
}

/// Decodes the provider reply, degrading to the fallback record when it
/// cannot be recovered.
pub fn content_from_reply(text: &str, request: &ProductRequest) -> GeneratedContent {
    let recovered = repair::recover_object(text)
        .log_error("Unable to recover provider reply")
        .and_then(|(object, stage)| {
            GeneratedContent::from_object(object)
                .log_error("Unable to decode generated content")
                .map(|content| (content, stage))
        });
    match recovered {
        Some((content, stage)) => {
            if stage == RepairStage::Lenient {
                log::info!("Provider reply needed lenient repair");
            }
            content
        }
        None => {
            log::warn!("Using fallback content for {}", request.product_name());
            GeneratedContent::fallback(request)
        }
    }
}

async fn generate(
    chain: ProviderChain,
    template: Arc<PageTemplate>,
    max_tokens: u32,
    request: ProductRequest,
) -> Result<GeneratedPage, GenerationError> {
    request.validate()?;
    let answer = chain
        .first_success(&prompt::build(&request), max_tokens)
        .await
        .map_err(GenerationError::ProviderUnavailable)?;
    log::info!("Content for {} generated by {}", request.product_name(), answer.provider);
    let mut content = content_from_reply(&answer.text, &request);

    if let Some(ingredients) = request.ingredients.as_deref() {
        if content.ingredient_table.trim().is_empty() {
            let (rows, source) =
                ingredient::synthesize(&chain, ingredients, INGREDIENT_MAX_TOKENS).await;
            match source {
                RowSource::Provider(name) => log::info!("Ingredient table built by {name}"),
                RowSource::Parser => log::info!("Ingredient table built by local parser"),
            }
            content.ingredient_table = ingredient::render_table(&rows);
        }
    }

    let html = binder::bind(&template, &content, &request);
    let seo = seo::synthesize(request.product_name(), request.category.as_deref());
    Ok(GeneratedPage { html, seo })
}

async fn parse_text(
    chain: ProviderChain,
    max_tokens: u32,
    text: String,
) -> Result<ProductRequest, GenerationError> {
    match chain.first_success(&prompt::parse(&text), max_tokens).await {
        Ok(answer) => {
            let parsed = repair::recover_object(&answer.text)
                .log_error("Unable to recover parse reply")
                .and_then(|(object, _)| {
                    serde_json::from_value::<ProductRequest>(serde_json::Value::Object(object))
                        .log_error("Unable to decode parsed product")
                })
                .filter(|request| request.validate().is_ok());
            if let Some(request) = parsed {
                return Ok(request);
            }
            log::warn!("Reply from {} had no product, reading labels", answer.provider);
        }
        Err(failures) => log::warn!(
            "No provider for parsing ({} attempt(s)), reading labels",
            failures.len()
        ),
    }
    let request = labelled::extract(&text);
    match request.validate() {
        Ok(()) => Ok(request),
        Err(_) => Err(GenerationError::Unparseable),
    }
}

impl Handler<Generate> for GenerationService {
    type Result = ResponseActFuture<Self, Result<GeneratedPage, GenerationError>>;

    fn handle(&mut self, Generate(request): Generate, _: &mut Self::Context) -> Self::Result {
        let chain = self.chain.clone();
        let template = self.template.clone();
        let max_tokens = self.max_tokens;
        Box::pin(generate(chain, template, max_tokens, request).into_actor(self))
    }
}

impl Handler<ParseText> for GenerationService {
    type Result = ResponseActFuture<Self, Result<ProductRequest, GenerationError>>;

    fn handle(&mut self, ParseText(text): ParseText, _: &mut Self::Context) -> Self::Result {
        let chain = self.chain.clone();
        let max_tokens = self.max_tokens;
        Box::pin(parse_text(chain, max_tokens, text).into_actor(self))
    }
}

impl Handler<Health> for GenerationService {
    type Result = MessageResult<Health>;

    fn handle(&mut self, _: Health, _: &mut Self::Context) -> Self::Result {
        let providers = self
            .chain
            .providers()
            .iter()
            .map(|p| (p.name(), p.is_configured()))
            .collect();
        MessageResult(HealthStatus {
            status: "ok",
            providers,
            active_provider: self.chain.providers().first().map(|p| p.name()),
            template: if self.template.is_loaded() {
                "loaded"
            } else {
                "unloaded"
            },
        })
    }
}
