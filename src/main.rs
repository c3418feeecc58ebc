use actix::prelude::*;
use actix_web::middleware::TrailingSlash;
use actix_web::{middleware::DefaultHeaders, web::Data, App, HttpServer};
use anyhow::Context as AnyhowContext;
use pagegen::config::Config;
use pagegen::control;
use pagegen::provider::ProviderChain;
use pagegen::service::GenerationService;
use pagegen::template::PageTemplate;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest_middleware::ClientBuilder;
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use std::env;
use std::sync::Arc;
use std::time::Duration;

#[actix_web::main]
async fn main() -> Result<(), anyhow::Error> {
    if let Err(env::VarError::NotPresent) = env::var("RUST_LOG") {
        env::set_var("RUST_LOG", "INFO");
    }
    pretty_env_logger::formatted_timed_builder()
        .parse_default_env()
        .init();

    match std::fs::File::open(".env") {
        Ok(_) => envmnt::load_file(".env")?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            std::fs::File::create(".env")?;
            envmnt::load_file(".env")?;
        }
        Err(err) => {
            return Err(anyhow::anyhow!("Unable to open .env file: {err}"));
        }
    }

    let config = Config::from_env();
    log::info!(
        "Primary provider: {} (claude key: {}, openai key: {})",
        config.primary,
        config.claude.api_key.is_some(),
        config.openai.api_key.is_some()
    );

    let template = Arc::new(PageTemplate::load(&config.template_path).await);

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let client = reqwest::ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(90))
        .use_rustls_tls()
        .default_headers(headers)
        .build()
        .context("Unable to build HTTP client")?;
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.http_retries);
    let client = ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

    let chain = ProviderChain::from_config(&config, client);
    let generation_service = GenerationService::new(chain, template, config.max_tokens).start();

    let port = config.port;
    log::info!("Listening on 0.0.0.0:{port}");
    HttpServer::new(move || {
        App::new()
            .app_data(control::json_config())
            .wrap(
                DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
                    .add(("Access-Control-Allow-Headers", "*")),
            )
            .wrap(actix_web::middleware::Compress::default())
            .wrap(actix_web::middleware::NormalizePath::new(
                TrailingSlash::Trim,
            ))
            .app_data(Data::new(generation_service.clone()))
            .service(control::generate)
            .service(control::parse)
            .service(control::health)
    })
    .bind(("0.0.0.0", port))
    .with_context(|| format!("Failed to bind server to 0.0.0.0:{port}. Is the port already in use?"))?
    .run()
    .await?;
    Ok(())
}
