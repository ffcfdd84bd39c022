//! Correlation id propagation.
//!
//! Every request carries a correlation id: the UUID from the inbound
//! `X-Correlation-Id` header, or a fresh v4 UUID when the header is absent
//! or unparsable. The id is stored in the request extensions and written
//! back on every response. While the request is served, the id and path are
//! also available to code that has no access to the request, such as the
//! panic handler.

use std::convert::Infallible;
use std::fmt;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// The header carrying the correlation id, in both directions.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

tokio::task_local! {
    static REQUEST_SCOPE: RequestScope;
}

#[derive(Debug, Clone)]
struct RequestScope {
    correlation_id: CorrelationId,
    path: String,
}

/// Returns the correlation id and path of the request being served by the
/// current task, or `None` outside the correlation middleware.
pub fn current_request() -> Option<(CorrelationId, String)> {
    REQUEST_SCOPE
        .try_with(|scope| (scope.correlation_id, scope.path.clone()))
        .ok()
}

/// The correlation id of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationId(pub Uuid);

impl CorrelationId {
    /// Reads the id from `headers`, generating a new one if none is usable.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .map(Self)
            .unwrap_or_else(|| Self(Uuid::new_v4()))
    }

    /// Returns the id as a UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Middleware that assigns the correlation id and echoes it in the response.
pub async fn propagate_correlation_id(mut request: Request, next: Next) -> Response {
    let correlation_id = CorrelationId::from_headers(request.headers());
    request.extensions_mut().insert(correlation_id);

    let scope = RequestScope {
        correlation_id,
        path: request.uri().path().to_string(),
    };
    let mut response = REQUEST_SCOPE.scope(scope, next.run(request)).await;

    if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }

    response
}

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CorrelationId>()
            .copied()
            .unwrap_or_else(|| CorrelationId::from_headers(&parts.headers)))
    }
}
