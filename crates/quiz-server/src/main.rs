mod catalog;
mod config;
mod descriptions;
mod error;
mod model;
mod narrative;
mod rate_limit;
mod scoring;
mod server;
mod storage;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use quiz_common::gemini::{GeminiClient, GeminiClientConfig};
use quiz_common::redis::RedisCache;

use catalog::QuestionCatalog;
use config::Config;
use descriptions::DescriptionTable;
use error::AppError;
use narrative::NarrativeService;
use rate_limit::RateLimiter;
use server::AppState;
use storage::ResultStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("starting quiz server");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        redis = config.redis_url.is_some(),
        result_ttl_secs = config.result_ttl_secs,
        "configuration loaded"
    );

    // 2. Connect to Redis (optional — graceful degradation if unavailable)
    let redis = RedisCache::new(config.redis_url.as_deref());
    if redis.is_available().await {
        info!("redis connected, results persist across restarts");
    } else {
        info!("redis unavailable, results kept in memory only");
    }

    // 3. Build the Gemini client and narrative rate limiter
    let gemini = GeminiClient::new(GeminiClientConfig::from_env())
        .map_err(|e| AppError::Common(e.into()))?;
    if gemini.is_configured() {
        info!(model = %gemini.config().model, "gemini client ready");
    } else {
        warn!("no gemini API key set, every analysis will use the canned narrative");
    }
    let limiter = RateLimiter::from_env();
    if limiter.is_some() {
        info!("narrative rate limiting enabled");
    }

    // 4. Build the static catalog and description tables
    let catalog = Arc::new(QuestionCatalog::standard());
    let descriptions = Arc::new(DescriptionTable::standard());
    info!(
        questions = catalog.len(),
        categories = catalog.category_count(),
        "question catalog loaded"
    );

    // 5. Assemble state and serve
    let state = AppState {
        catalog,
        descriptions,
        narrative: Arc::new(NarrativeService::new(gemini, limiter)),
        store: Arc::new(ResultStore::new(redis, config.result_ttl_secs)),
    };
    let router = server::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router).await?;

    Ok(())
}
