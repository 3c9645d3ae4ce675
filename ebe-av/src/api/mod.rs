//! HTTP API handlers for ebe-av

pub mod health;
pub mod rate_limit;
pub mod validate_addresses;

pub use health::health_routes;
pub use rate_limit::{rate_limit_middleware, spawn_pruning, ClientRateLimiter};
pub use validate_addresses::validate_addresses;
