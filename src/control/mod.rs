use crate::service::{GenerationError, GenerationService, Generate, Health, ParseText};
use actix::prelude::*;
use actix_web::{
    get,
    http::StatusCode,
    post,
    web::{Data, Json, JsonConfig},
    HttpResponse,
};
use derive_more::{Display, Error};
use pagegen_types::ProductRequest;
use serde::Deserialize;
use serde_json::json;

pub type Response = Result<HttpResponse, ControllerError>;

pub const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

#[derive(Debug, Display, Error)]
pub enum ControllerError {
    #[display("{msg}")]
    InvalidInput { field: String, msg: String },
    #[display("{_0}")]
    Generation(GenerationError),
    #[error(ignore)]
    InternalServerError(anyhow::Error),
}

impl From<GenerationError> for ControllerError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Validation(err) => Self::InvalidInput {
                field: err.field.to_string(),
                msg: err.msg,
            },
            err => Self::Generation(err),
        }
    }
}

impl From<anyhow::Error> for ControllerError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalServerError(err)
    }
}

impl From<actix::MailboxError> for ControllerError {
    fn from(err: actix::MailboxError) -> Self {
        Self::InternalServerError(err.into())
    }
}

impl actix_web::error::ResponseError for ControllerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::Generation(_) | Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        log::warn!("{self:?}");
        let error = match self {
            Self::InternalServerError(err) => format!("{err:#}"),
            err => err.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": error,
        }))
    }
}

/// Body extractor config answering malformed JSON in the API error shape.
pub fn json_config() -> JsonConfig {
    JsonConfig::default()
        .limit(MAX_BODY_SIZE)
        .error_handler(|err, _req| {
            ControllerError::InvalidInput {
                field: "body".to_string(),
                msg: format!("잘못된 요청 형식입니다: {err}"),
            }
            .into()
        })
}

#[post("/api/generate")]
pub async fn generate(
    service: Data<Addr<GenerationService>>,
    Json(request): Json<ProductRequest>,
) -> Response {
    let page = service.send(Generate(request)).await??;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "html": page.html,
        "seo": page.seo,
    })))
}

#[derive(Deserialize)]
pub struct ParseInput {
    #[serde(default)]
    text: String,
}

#[post("/api/parse")]
pub async fn parse(
    service: Data<Addr<GenerationService>>,
    Json(input): Json<ParseInput>,
) -> Response {
    if input.text.trim().is_empty() {
        return Err(ControllerError::InvalidInput {
            field: "text".to_string(),
            msg: "텍스트를 입력해주세요.".to_string(),
        });
    }
    let data = service.send(ParseText(input.text)).await??;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": data,
    })))
}

#[get("/api/health")]
pub async fn health(service: Data<Addr<GenerationService>>) -> Response {
    let status = service.send(Health).await?;
    Ok(HttpResponse::Ok().json(status))
}
