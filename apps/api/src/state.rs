use std::sync::Arc;

use crate::config::Config;
use crate::ratelimit::RateLimiter;
use crate::tailoring::oracle::TailoringOracle;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable rewrite backend. Default: `LlmTailoringOracle`.
    pub oracle: Arc<dyn TailoringOracle>,
    /// Guards `/api/v1/tailor`. Store is Redis when `REDIS_URL` is set.
    pub rate_limiter: RateLimiter,
}
