use std::env;

use axum::Router;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use confab::config;
use confab::modules;
use confab::services::{llm, summarizer::Summarizer};
use confab::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let db = config::database::connect().await;
    let redis = config::redis::connect().await;

    let summarizer_config = config::summarizer::SummarizerConfig::from_env()?;
    tracing::info!(provider = %summarizer_config.provider, model = %summarizer_config.model, "summarizer configured");

    let model = llm::from_config(&summarizer_config);
    let summarizer = Summarizer::new(db.clone(), redis.clone(), model);

    let state = AppState { db, redis, summarizer };

    let app = Router::new()
        .merge(modules::agents::routes::routes())
        .merge(modules::meetings::routes::routes())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
