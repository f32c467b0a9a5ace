//! Per-client fixed-window rate limiting for the API

use std::{
    net::{IpAddr, SocketAddr},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Json, Router,
};
use clap::Parser;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::errors::ApiError;

const API_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";
const CONTACT_LIMIT_MESSAGE: &str = "Too many contact form submissions, please try again later.";

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Rate limiting tiers
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct RateLimitConfig {
    /// Requests allowed per client across the whole API within a window
    #[arg(long, env = "API_RATE_LIMIT_MAX", default_value = "100")]
    pub api_max: u32,

    /// Length of the API-wide window in seconds
    #[arg(long, env = "API_RATE_LIMIT_WINDOW_SECS", default_value = "900")]
    pub api_window_secs: u64,

    /// Contact form submissions allowed per client within a window
    #[arg(long, env = "CONTACT_RATE_LIMIT_MAX", default_value = "5")]
    pub contact_max: u32,

    /// Length of the contact form window in seconds
    #[arg(long, env = "CONTACT_RATE_LIMIT_WINDOW_SECS", default_value = "900")]
    pub contact_window_secs: u64,

    /// Number of reverse proxies in front of the server; each appends one
    /// `X-Forwarded-For` entry. Zero ignores the header entirely.
    #[arg(long, env = "TRUST_PROXY_HOPS", default_value = "1")]
    pub trusted_proxy_hops: usize,
}

impl RateLimitConfig {
    /// The API-wide tier
    pub fn api(&self) -> RateLimit {
        RateLimit::new(self.api_max, self.api_window_secs)
    }

    /// The contact form tier
    pub fn contact(&self) -> RateLimit {
        RateLimit::new(self.contact_max, self.contact_window_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            api_max: 100,
            api_window_secs: 900,
            contact_max: 5,
            contact_window_secs: 900,
            trusted_proxy_hops: 1,
        }
    }
}

/// A quota of `max` requests per `window`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimit {
    /// The number of requests allowed within one window
    pub max: u32,

    /// The length of a window, counted from a client's first request in it
    pub window: Duration,
}

impl RateLimit {
    /// Create a new quota
    pub fn new(max: u32, window_secs: u64) -> Self {
        Self {
            max,
            window: Duration::from_secs(window_secs),
        }
    }
}

/// The body of a rejected request
#[derive(Debug, Serialize, Deserialize)]
pub struct TooManyRequestsResponse {
    /// Always false
    pub success: bool,

    /// Why the request was rejected
    pub message: String,

    /// Seconds until the next request will be accepted
    pub retry_after: u64,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

#[derive(Debug)]
struct Limiter {
    limit: RateLimit,
    message: &'static str,
    trusted_hops: usize,
    windows: DashMap<IpAddr, Window>,
    next_sweep: Mutex<Instant>,
}

/// A fixed-window request counter per client address
#[derive(Debug, Clone)]
pub struct RateLimiter {
    inner: Arc<Limiter>,
}

impl RateLimiter {
    /// Create a limiter that rejects with `message` once `limit` is used up
    pub fn new(limit: RateLimit, message: &'static str, trusted_hops: usize) -> Self {
        Self {
            inner: Arc::new(Limiter {
                limit,
                message,
                trusted_hops,
                windows: DashMap::new(),
                next_sweep: Mutex::new(Instant::now() + limit.window),
            }),
        }
    }

    /// The API-wide tier
    pub fn api(config: &RateLimitConfig) -> Self {
        Self::new(config.api(), API_LIMIT_MESSAGE, config.trusted_proxy_hops)
    }

    /// The contact form tier
    pub fn contact(config: &RateLimitConfig) -> Self {
        Self::new(
            config.contact(),
            CONTACT_LIMIT_MESSAGE,
            config.trusted_proxy_hops,
        )
    }

    /// Count a request from `client` at `now`.
    ///
    /// Returns the time left in the client's window when the quota is used up.
    pub fn check(&self, client: IpAddr, now: Instant) -> Result<(), Duration> {
        self.sweep(now);

        let limit = self.inner.limit;
        let mut window = self.inner.windows.entry(client).or_insert(Window {
            started: now,
            hits: 0,
        });

        if now.duration_since(window.started) >= limit.window {
            *window = Window {
                started: now,
                hits: 0,
            };
        }

        if window.hits >= limit.max {
            return Err(limit.window.saturating_sub(now.duration_since(window.started)));
        }

        window.hits += 1;

        Ok(())
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.inner.windows.len()
    }

    /// Drop windows that have ended, at most once per window length
    fn sweep(&self, now: Instant) {
        let Ok(mut next_sweep) = self.inner.next_sweep.lock() else {
            return;
        };

        if now < *next_sweep {
            return;
        }

        let window = self.inner.limit.window;
        self.inner
            .windows
            .retain(|_, entry| now.duration_since(entry.started) < window);

        *next_sweep = now + window;
    }

    fn rejection(&self, retry_after: Duration) -> Response {
        let retry_after = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);

        warn!(retry_after, "{}", self.inner.message);

        (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, retry_after.to_string())],
            Json(TooManyRequestsResponse {
                success: false,
                message: self.inner.message.to_string(),
                retry_after,
            }),
        )
            .into_response()
    }
}

/// The address a request originates from.
///
/// Each trusted proxy appends the address it received the request from to
/// `X-Forwarded-For`, so the client is the entry `trusted_hops` positions from
/// the right. Entries to the left of it are supplied by the client and ignored.
/// Without the header the peer address is used.
pub fn client_address(
    headers: &HeaderMap,
    peer: Option<IpAddr>,
    trusted_hops: usize,
) -> Option<IpAddr> {
    if trusted_hops == 0 {
        return peer;
    }

    let hops: Vec<&str> = headers
        .get_all(FORWARDED_FOR)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .collect();

    let hop = hops
        .len()
        .checked_sub(trusted_hops)
        .and_then(|index| hops.get(index))
        .or(hops.first());

    hop.and_then(|hop| hop.parse().ok()).or(peer)
}

async fn enforce(State(limiter): State<RateLimiter>, request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(address)| address.ip());

    let Some(client) = client_address(request.headers(), peer, limiter.inner.trusted_hops) else {
        error!("unable to determine client address for rate limiting");

        return ApiError::internal().into_response();
    };

    match limiter.check(client, Instant::now()) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => limiter.rejection(retry_after),
    }
}

/// Wrap `router` so every request counts against `limiter`
pub fn rate_limited<S>(router: Router<S>, limiter: RateLimiter) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(limiter, enforce))
}
