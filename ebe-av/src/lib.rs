//! ebe-av library - Address Validation module
//!
//! Validates the addresses entered on the registration wizard's addresses
//! page against the Google Maps Address Validation API and reports, per
//! address form, why an address could not be confirmed as entered.

use axum::Router;
use chrono::{DateTime, Utc};
use ebe_common::config::RateLimitConfig;
use std::sync::Arc;

pub mod api;
pub mod error;
pub mod services;

use api::ClientRateLimiter;
use services::AddressValidator;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Backend that validates and classifies submitted addresses
    pub validator: Arc<dyn AddressValidator>,
    /// Per-client quota on address validation
    pub rate_limiter: Arc<ClientRateLimiter>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        validator: Arc<dyn AddressValidator>,
        rate_limit: &RateLimitConfig,
    ) -> ebe_common::Result<Self> {
        Ok(Self {
            validator,
            rate_limiter: Arc::new(ClientRateLimiter::new(rate_limit)?),
            started_at: Utc::now(),
        })
    }
}

/// Build application router
///
/// The validation route is rate limited; the health endpoint is not.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::post;
    use ebe_common::api::VALIDATE_ADDRESSES_PATH;
    use tower_http::trace::TraceLayer;

    let validation = Router::new()
        .route(VALIDATE_ADDRESSES_PATH, post(api::validate_addresses))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::rate_limit_middleware,
        ));

    Router::new()
        .merge(validation)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
