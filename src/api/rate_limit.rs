//! Per-client fixed-window rate limiting.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use super::correlation::CorrelationId;
use super::response::RateLimitedResponse;
use super::state::AppState;

/// Partition key used when the peer address is unknown.
const UNKNOWN_CLIENT: &str = "unknown";

/// Windows older than this many window lengths are dropped when pruning.
const STALE_WINDOWS: u32 = 4;

/// Stale windows are only swept once this many clients are tracked.
const PRUNE_THRESHOLD: usize = 1024;

/// Rate limit configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    /// Requests allowed per client per window. Zero disables limiting.
    pub permits: u32,
    /// The length of one window.
    pub window: Duration,
}

impl RateLimitSettings {
    /// Settings that never reject a request.
    pub fn disabled() -> Self {
        Self {
            permits: 0,
            window: Duration::from_secs(10),
        }
    }

    /// Returns true if limiting is switched off.
    pub fn is_disabled(&self) -> bool {
        self.permits == 0
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            permits: 10,
            window: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    used: u32,
}

#[derive(Debug, Default)]
struct WindowTable {
    clients: HashMap<String, Window>,
    next_prune: Option<Instant>,
}

impl WindowTable {
    /// Drops stale windows, at most once per window length and only when
    /// the table has grown past `PRUNE_THRESHOLD`.
    fn prune(&mut self, now: Instant, window_len: Duration) {
        if self.clients.len() < PRUNE_THRESHOLD {
            return;
        }
        if self.next_prune.is_some_and(|at| now < at) {
            return;
        }

        self.clients
            .retain(|_, w| now.duration_since(w.started) < window_len * STALE_WINDOWS);
        self.next_prune = Some(now + window_len);
    }
}

/// A fixed-window counter per client key.
#[derive(Debug)]
pub struct FixedWindowRateLimiter {
    settings: RateLimitSettings,
    windows: Mutex<WindowTable>,
}

impl FixedWindowRateLimiter {
    /// Creates a limiter with the given settings.
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            settings,
            windows: Mutex::new(WindowTable::default()),
        }
    }

    /// Returns the limiter settings.
    pub fn settings(&self) -> RateLimitSettings {
        self.settings
    }

    /// Returns the number of clients with a tracked window.
    pub fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clients
            .len()
    }

    /// Takes one permit for `key`, returning false if the window is exhausted.
    pub fn try_acquire(&self, key: &str) -> bool {
        self.try_acquire_at(key, Instant::now())
    }

    /// Takes one permit for `key` as of `now`.
    pub fn try_acquire_at(&self, key: &str, now: Instant) -> bool {
        if self.settings.is_disabled() {
            return true;
        }

        let window_len = self.settings.window;
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        windows.prune(now, window_len);

        let window = windows.clients.entry(key.to_string()).or_insert(Window {
            started: now,
            used: 0,
        });

        if now.duration_since(window.started) >= window_len {
            *window = Window {
                started: now,
                used: 0,
            };
        }

        if window.used < self.settings.permits {
            window.used += 1;
            true
        } else {
            false
        }
    }
}

/// Returns the client partition key for a request.
fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Middleware rejecting clients that exceed their window with 429.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let limiter = state.rate_limiter();
    let key = client_key(&request);

    if limiter.try_acquire(&key) {
        return next.run(request).await;
    }

    let correlation_id = request
        .extensions()
        .get::<CorrelationId>()
        .copied()
        .unwrap_or_else(|| CorrelationId::from_headers(request.headers()));

    warn!(
        correlation_id = %correlation_id,
        client = %key,
        path = %request.uri().path(),
        "Rate limit exceeded"
    );

    let retry_after = limiter.settings().window.as_secs().max(1);

    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, retry_after.to_string())],
        Json(RateLimitedResponse::new(correlation_id)),
    )
        .into_response()
}
