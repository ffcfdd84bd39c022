//! Application state for the usage value API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::calculation::MethodRegistry;
use crate::config::ConfigLoader;
use crate::error::EngineResult;

use super::rate_limit::{FixedWindowRateLimiter, RateLimitSettings};

/// Shared application state.
///
/// Holds the method registry, built once at startup and read-only
/// afterwards, and the per-client rate limiter.
#[derive(Clone)]
pub struct AppState {
    /// The registered calculation methods.
    registry: Arc<MethodRegistry>,
    /// The rate limiter shared by all requests.
    rate_limiter: Arc<FixedWindowRateLimiter>,
}

impl AppState {
    /// Creates a new application state with default rate limiting.
    pub fn new(registry: MethodRegistry) -> Self {
        Self::with_rate_limit(registry, RateLimitSettings::default())
    }

    /// Creates a new application state with the given rate limit settings.
    pub fn with_rate_limit(registry: MethodRegistry, rate_limit: RateLimitSettings) -> Self {
        Self {
            registry: Arc::new(registry),
            rate_limiter: Arc::new(FixedWindowRateLimiter::new(rate_limit)),
        }
    }

    /// Builds the registry from loaded configuration.
    pub fn from_loader(loader: &ConfigLoader, rate_limit: RateLimitSettings) -> EngineResult<Self> {
        let registry = MethodRegistry::from_config(loader.config())?;
        Ok(Self::with_rate_limit(registry, rate_limit))
    }

    /// Returns the method registry.
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Returns the rate limiter.
    pub fn rate_limiter(&self) -> &FixedWindowRateLimiter {
        &self.rate_limiter
    }
}
