//! Fixed-window rate limiting for the tailoring endpoint.
//!
//! Counters live behind `RateLimitStore` so the limiter works the same over
//! the per-instance map and over Redis.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Current count for `key`, if it exists and has not expired.
    async fn get(&self, key: &str) -> Result<Option<u64>, RateLimitError>;
    /// Increments `key`, creating it at 1, and returns the new count.
    async fn incr(&self, key: &str) -> Result<u64, RateLimitError>;
    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), RateLimitError>;
}

#[derive(Debug, Clone, Copy)]
struct Counter {
    count: u64,
    expires_at: Option<DateTime<Utc>>,
}

impl Counter {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |t| now < t)
    }
}

/// Per-instance store. Counters are not shared across replicas.
#[derive(Default)]
pub struct InMemoryStore {
    counters: Mutex<HashMap<String, Counter>>,
}

#[async_trait]
impl RateLimitStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<u64>, RateLimitError> {
        let now = Utc::now();
        let counters = self.counters.lock().await;
        Ok(counters
            .get(key)
            .filter(|c| c.is_live(now))
            .map(|c| c.count))
    }

    async fn incr(&self, key: &str) -> Result<u64, RateLimitError> {
        let now = Utc::now();
        let mut counters = self.counters.lock().await;
        // Drop expired windows while the lock is held anyway.
        counters.retain(|_, c| c.is_live(now));
        let counter = counters.entry(key.to_string()).or_insert(Counter {
            count: 0,
            expires_at: None,
        });
        counter.count += 1;
        Ok(counter.count)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), RateLimitError> {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::weeks(52));
        let mut counters = self.counters.lock().await;
        if let Some(counter) = counters.get_mut(key) {
            counter.expires_at = Utc::now().checked_add_signed(ttl);
        }
        Ok(())
    }
}

/// Shared store over Redis INCR/EXPIRE.
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self, RateLimitError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl RateLimitStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<u64>, RateLimitError> {
        let mut conn = self.conn.clone();
        let count: Option<u64> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(count)
    }

    async fn incr(&self, key: &str) -> Result<u64, RateLimitError> {
        let mut conn = self.conn.clone();
        let count: u64 = redis::cmd("INCR").arg(key).query_async(&mut conn).await?;
        Ok(count)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), RateLimitError> {
        let mut conn = self.conn.clone();
        let _: i64 = redis::cmd("EXPIRE")
            .arg(key)
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u64,
    pub remaining: u64,
}

/// Fixed window of `max_requests` per `window`, keyed by client.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    max_requests: u64,
    window: Duration,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, max_requests: u64, window: Duration) -> Self {
        Self {
            store,
            max_requests,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub async fn check(&self, client: &str) -> Result<RateDecision, RateLimitError> {
        let key = format!("ratelimit:tailor:{client}");

        if let Some(count) = self.store.get(&key).await? {
            if count >= self.max_requests {
                warn!(client, count, "rate limit exceeded");
                return Ok(RateDecision {
                    allowed: false,
                    limit: self.max_requests,
                    remaining: 0,
                });
            }
        }

        let count = self.store.incr(&key).await?;
        if count == 1 {
            self.store.expire(&key, self.window).await?;
        }
        debug!(client, count, "rate limit counted");

        Ok(RateDecision {
            allowed: count <= self.max_requests,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u64, window: Duration) -> RateLimiter {
        RateLimiter::new(Arc::new(InMemoryStore::default()), max, window)
    }

    #[tokio::test]
    async fn test_allows_up_to_limit_then_blocks() {
        let limiter = limiter(3, Duration::from_secs(60));
        for expected_remaining in [2, 1, 0] {
            let d = limiter.check("10.0.0.1").await.unwrap();
            assert!(d.allowed);
            assert_eq!(d.remaining, expected_remaining);
        }
        let d = limiter.check("10.0.0.1").await.unwrap();
        assert!(!d.allowed);
        assert_eq!(d.remaining, 0);
    }

    #[tokio::test]
    async fn test_clients_are_counted_separately() {
        let limiter = limiter(1, Duration::from_secs(60));
        assert!(limiter.check("a").await.unwrap().allowed);
        assert!(!limiter.check("a").await.unwrap().allowed);
        assert!(limiter.check("b").await.unwrap().allowed);
    }

    #[tokio::test]
    async fn test_window_expiry_resets_count() {
        let limiter = limiter(1, Duration::from_millis(50));
        assert!(limiter.check("a").await.unwrap().allowed);
        assert!(!limiter.check("a").await.unwrap().allowed);
        std::thread::sleep(Duration::from_millis(80));
        assert!(limiter.check("a").await.unwrap().allowed);
    }

    #[tokio::test]
    async fn test_in_memory_store_operations() {
        let store = InMemoryStore::default();
        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(store.incr("k").await.unwrap(), 1);
        assert_eq!(store.incr("k").await.unwrap(), 2);
        store.expire("k", Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(2));
    }
}
