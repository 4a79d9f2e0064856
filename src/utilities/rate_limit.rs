use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, SecondsFormat, Utc};
use redis::AsyncCommands;
use serde_json::json;
use tracing::warn;

use crate::{
    services::redis::Redis,
    utilities::{errors::AppError, identity::client_identifier},
};

/// Fixed-window limits per endpoint class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window_ms: i64,
    pub max_requests: u32,
}

/// Moderate limits for read operations.
pub const READ: RateLimitConfig = RateLimitConfig {
    window_ms: 60 * 1000,
    max_requests: 60,
};

/// Strict limits for write operations.
pub const WRITE: RateLimitConfig = RateLimitConfig {
    window_ms: 60 * 1000,
    max_requests: 10,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitOutcome {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

#[derive(Debug)]
pub struct WindowEntry {
    count: u32,
    reset_at_ms: i64,
}

/// Counter keyed by (identity, window) with atomic increment-and-check.
/// The in-memory store is per-process and resets on restart; the Redis
/// store is shared across instances.
#[derive(Clone)]
pub enum RateLimiter {
    Memory(Arc<Mutex<HashMap<String, WindowEntry>>>),
    Redis(Redis),
}

impl RateLimiter {
    pub fn in_memory() -> Self {
        Self::Memory(Arc::new(Mutex::new(HashMap::new())))
    }

    pub fn redis(redis: Redis) -> Self {
        Self::Redis(redis)
    }

    pub async fn check(
        &self,
        identifier: &str,
        config: RateLimitConfig,
    ) -> Result<RateLimitOutcome, AppError> {
        match self {
            Self::Memory(store) => Ok(check_in_memory(store, identifier, config)),
            Self::Redis(redis) => check_in_redis(redis, identifier, config).await,
        }
    }

    /// Purge expired windows from the in-memory store every 5 minutes.
    /// No-op for the Redis store, where keys expire on their own.
    pub fn spawn_purge_task(&self) {
        let Self::Memory(store) = self else {
            return;
        };

        let store = Arc::clone(store);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(5 * 60));
            loop {
                interval.tick().await;
                let now = Utc::now().timestamp_millis();
                store
                    .lock()
                    .expect("rate limit store lock poisoned")
                    .retain(|_, entry| entry.reset_at_ms >= now);
            }
        });
    }
}

fn check_in_memory(
    store: &Mutex<HashMap<String, WindowEntry>>,
    identifier: &str,
    config: RateLimitConfig,
) -> RateLimitOutcome {
    let now = Utc::now().timestamp_millis();
    let key = format!("{}:{}", identifier, config.window_ms);
    let mut store = store.lock().expect("rate limit store lock poisoned");

    let entry = store.entry(key).or_insert(WindowEntry {
        count: 0,
        reset_at_ms: now + config.window_ms,
    });

    if entry.reset_at_ms < now {
        entry.count = 0;
        entry.reset_at_ms = now + config.window_ms;
    }

    entry.count += 1;

    outcome_for(entry.count, entry.reset_at_ms, config)
}

async fn check_in_redis(
    redis: &Redis,
    identifier: &str,
    config: RateLimitConfig,
) -> Result<RateLimitOutcome, AppError> {
    let key = format!("ratelimit:{}:{}", identifier, config.window_ms);
    let mut conn = redis.connection.clone();

    let count: i64 = conn.incr(&key, 1i64).await?;
    if count == 1 {
        let _: bool = conn.pexpire(&key, config.window_ms).await?;
    }

    let ttl_ms: i64 = conn.pttl(&key).await?;
    let now = Utc::now().timestamp_millis();
    let reset_at_ms = if ttl_ms > 0 {
        now + ttl_ms
    } else {
        now + config.window_ms
    };

    Ok(outcome_for(count.min(u32::MAX as i64) as u32, reset_at_ms, config))
}

fn outcome_for(count: u32, reset_at_ms: i64, config: RateLimitConfig) -> RateLimitOutcome {
    let allowed = count <= config.max_requests;
    RateLimitOutcome {
        allowed,
        remaining: if allowed {
            config.max_requests - count
        } else {
            0
        },
        reset_at_ms,
    }
}

/// Rate-limit middleware. Reads run under the READ window, every other
/// method under WRITE. Overflow yields 429 with `Retry-After`; handled
/// requests get `X-RateLimit-*` headers appended to the response. A failing
/// limiter backend fails open and is logged.
pub async fn enforce(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let config = if request.method() == Method::GET {
        READ
    } else {
        WRITE
    };
    let identifier = client_identifier(request.headers());

    let outcome = match limiter.check(&identifier, config).await {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!("Rate limit store error, failing open: {err}");
            return next.run(request).await;
        }
    };

    if !outcome.allowed {
        let now = Utc::now().timestamp_millis();
        let retry_after_secs = ((outcome.reset_at_ms - now).max(0) + 999) / 1000;

        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Too many requests",
                "message": "Rate limit exceeded. Please try again later.",
            })),
        )
            .into_response();

        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
            headers.insert(header::RETRY_AFTER, value);
        }
        apply_rate_limit_headers(&mut response, config, &outcome);
        return response;
    }

    let mut response = next.run(request).await;
    apply_rate_limit_headers(&mut response, config, &outcome);
    response
}

fn apply_rate_limit_headers(
    response: &mut Response,
    config: RateLimitConfig,
    outcome: &RateLimitOutcome,
) {
    let reset = DateTime::<Utc>::from_timestamp_millis(outcome.reset_at_ms)
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Millis, true);

    let headers = response.headers_mut();
    for (name, value) in [
        ("x-ratelimit-limit", config.max_requests.to_string()),
        ("x-ratelimit-remaining", outcome.remaining.to_string()),
        ("x-ratelimit-reset", reset),
    ] {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(name, value);
        }
    }
}
