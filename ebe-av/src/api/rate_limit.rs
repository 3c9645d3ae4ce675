//! Per-client rate limiting for address validation
//!
//! Each client IP gets a quota of validation requests per period (12 per day
//! by default). Exhausted clients receive 429 until the quota replenishes.
//!
//! Clients are keyed on the hop appended by the reverse proxy, never on
//! hops the client can write itself.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use ebe_common::config::RateLimitConfig;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::AppState;

/// Client identifier used when neither a proxy header nor a peer address
/// is available
const FALLBACK_CLIENT_IP: &str = "127.0.0.1";

/// Keyed limiter over client IP addresses
pub struct ClientRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    trust_forwarded_for: bool,
}

impl ClientRateLimiter {
    /// Quota of `allowed_requests` per `period_secs`, replenished evenly
    pub fn new(config: &RateLimitConfig) -> ebe_common::Result<Self> {
        let invalid = || {
            ebe_common::Error::Config(format!(
                "invalid rate limit: {} requests per {}s",
                config.allowed_requests, config.period_secs
            ))
        };

        let burst = NonZeroU32::new(config.allowed_requests).ok_or_else(invalid)?;
        let replenish_interval = config.period() / config.allowed_requests;
        let quota = Quota::with_period(replenish_interval)
            .ok_or_else(invalid)?
            .allow_burst(burst);

        Ok(Self {
            limiter: RateLimiter::keyed(quota),
            trust_forwarded_for: config.trust_forwarded_for,
        })
    }

    /// Consume one request for the client; `false` if the quota is exhausted
    pub fn try_consume(&self, client: &str) -> bool {
        self.limiter.check_key(&client.to_string()).is_ok()
    }

    /// Key for a request from its headers and socket peer
    pub fn client_key(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        let forwarded = if self.trust_forwarded_for {
            proxy_client_ip(headers)
        } else {
            None
        };

        forwarded
            .or_else(|| peer.map(|addr| addr.ip().to_string()))
            .unwrap_or_else(|| FALLBACK_CLIENT_IP.to_string())
    }

    /// Drop clients whose quota has fully replenished
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Client IP as recorded by the reverse proxy: the last `x-forwarded-for`
/// hop, then `x-real-ip`
pub fn proxy_client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.rsplit(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
    };

    forwarded.or_else(real_ip).map(str::to_string)
}

/// Periodically prune idle clients so the limiter does not grow without
/// bound
pub fn spawn_pruning(limiter: Arc<ClientRateLimiter>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let before = limiter.tracked_clients();
            limiter.retain_recent();
            debug!(
                before,
                after = limiter.tracked_clients(),
                "Pruned rate limiter"
            );
        }
    })
}

/// Reject clients that have used up their validation quota
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = state.rate_limiter.client_key(request.headers(), peer);

    if !state.rate_limiter.try_consume(&client) {
        warn!(client = %client, "Rate limit exceeded");
        return Err(ApiError::TooManyRequests);
    }

    debug!(client = %client, "Rate limit check passed");
    Ok(next.run(request).await)
}
