//! Rate Limiting Middleware using GCRA Algorithm
//!
//! Limits prediction requests per client IP with tower_governor. Requires the
//! service to run with `into_make_service_with_connect_info::<SocketAddr>()`.

use crate::error::StartupError;
use governor::middleware::StateInformationMiddleware;
use serde::Deserialize;
use std::sync::Arc;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;

/// Governor config with X-RateLimit-* headers enabled
pub type DefaultGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Apply the limiter to the prediction route
    pub enabled: bool,
    /// Seconds to replenish one request
    pub per_second: u64,
    /// Burst size (max requests that can be made immediately)
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 1,
            burst_size: 20,
        }
    }
}

/// Build the governor config for `GovernorLayer`
pub fn create_governor_config(config: &RateLimitConfig) -> Result<Arc<DefaultGovernorConfig>, StartupError> {
    GovernorConfigBuilder::default()
        .per_second(config.per_second)
        .burst_size(config.burst_size)
        .use_headers()
        .finish()
        .map(Arc::new)
        .ok_or_else(|| {
            StartupError::RateLimit(format!(
                "per_second {} and burst_size {} must both be non-zero",
                config.per_second, config.burst_size
            ))
        })
}
