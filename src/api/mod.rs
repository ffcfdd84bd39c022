//! HTTP API module for the usage value service.
//!
//! This module provides the REST endpoints, the correlation id and rate
//! limiting middleware, panic recovery, and the problem details error
//! envelope.

mod correlation;
mod handlers;
mod rate_limit;
mod recovery;
mod request;
mod response;
mod state;

pub use correlation::{
    current_request, propagate_correlation_id, CorrelationId, CORRELATION_ID_HEADER,
};
pub use handlers::create_router;
pub use rate_limit::{enforce_rate_limit, FixedWindowRateLimiter, RateLimitSettings};
pub use recovery::handle_panic;
pub use request::{CalculationRequestBody, ValidationErrors, MAX_AGE};
pub use response::{
    CalculationApiResponse, HealthEntry, HealthReport, HealthStatusResponse, ProblemDetails,
    RateLimitedResponse, PROBLEM_JSON,
};
pub use state::AppState;
