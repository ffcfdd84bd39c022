//! Last-resort handling of panics raised while serving a request.
//!
//! Installed through `tower_http::catch_panic::CatchPanicLayer` inside the
//! correlation layer, so the 500 response still carries the request's
//! correlation id.

use std::any::Any;

use axum::response::{IntoResponse, Response};
use tracing::error;
use uuid::Uuid;

use super::correlation::{current_request, CorrelationId};
use super::response::ProblemDetails;

/// Logs the panic and answers with a generic 500 problem.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let (correlation_id, path) =
        current_request().unwrap_or_else(|| (CorrelationId(Uuid::new_v4()), String::new()));

    error!(
        correlation_id = %correlation_id,
        path = %path,
        panic = panic_message(payload.as_ref()),
        "Unhandled error while serving request"
    );

    ProblemDetails::unexpected(path, correlation_id).into_response()
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};

    #[test]
    fn test_panic_message_from_str_and_string() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(format!("boom {}", 42));
        assert_eq!(panic_message(payload.as_ref()), "boom 42");

        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }

    #[tokio::test]
    async fn test_handle_panic_returns_generic_problem() {
        let response = handle_panic(Box::new("secret internals"));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("GEN-500"));
        assert!(!text.contains("secret"));
    }
}
