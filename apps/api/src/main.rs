mod config;
mod errors;
mod guard;
mod layout;
mod llm_client;
mod models;
mod qa;
mod ratelimit;
mod render;
mod routes;
mod state;
mod tailoring;
mod theme;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::ratelimit::{InMemoryStore, RateLimitStore, RateLimiter, RedisStore};
use crate::routes::build_router;
use crate::state::AppState;
use crate::tailoring::oracle::LlmTailoringOracle;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting truthlock v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let store = build_rate_limit_store(&config).await;
    let rate_limiter = RateLimiter::new(
        store,
        config.rate_limit_max_requests,
        Duration::from_secs(config.rate_limit_window_secs),
    );
    info!(
        "Rate limit: {} requests per {}s",
        config.rate_limit_max_requests, config.rate_limit_window_secs
    );
    info!("Default theme preset: {}", config.default_preset);

    let state = AppState {
        config: config.clone(),
        oracle: Arc::new(LlmTailoringOracle(llm)),
        rate_limiter,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Redis when configured and reachable, otherwise the per-instance map.
async fn build_rate_limit_store(config: &Config) -> Arc<dyn RateLimitStore> {
    match &config.redis_url {
        Some(url) => match RedisStore::connect(url).await {
            Ok(store) => {
                info!("Rate limit store: Redis");
                Arc::new(store)
            }
            Err(e) => {
                warn!("Redis unavailable ({e}); falling back to in-memory rate limiting");
                Arc::new(InMemoryStore::default())
            }
        },
        None => {
            info!("Rate limit store: in-memory");
            Arc::new(InMemoryStore::default())
        }
    }
}
