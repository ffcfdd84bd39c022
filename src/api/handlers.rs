//! HTTP request handlers for the usage value API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::Uri,
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{info, warn};

use crate::models::CalculationRequest;

use super::correlation::{propagate_correlation_id, CorrelationId};
use super::rate_limit::enforce_rate_limit;
use super::recovery::handle_panic;
use super::request::CalculationRequestBody;
use super::response::{
    CalculationApiResponse, HealthEntry, HealthReport, HealthStatusResponse, ProblemDetails,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
///
/// The correlation id layer is outermost so that rate-limited, unmatched
/// and panicking requests also carry the header. Panics are turned into a
/// generic 500 problem by the innermost layer.
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/api/calculate", post(calculate_handler))
        .route("/api/health", get(health_status_handler))
        .route("/health", get(health_report_handler));

    #[cfg(debug_assertions)]
    let router = router.route("/api/calculate/throw", get(throw_handler));

    router
        .fallback(not_found_handler)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn_with_state(state.clone(), enforce_rate_limit))
        .layer(from_fn(propagate_correlation_id))
        .with_state(state)
}

/// Handler for POST /api/calculate.
///
/// Validates the request, resolves the factor method and returns the
/// calculated usage value.
async fn calculate_handler(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    uri: Uri,
    payload: Result<Json<CalculationRequestBody>, JsonRejection>,
) -> Response {
    let path = uri.path();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            let detail = rejection.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %detail,
                "Malformed request body"
            );
            return ProblemDetails::malformed_body(detail, path, correlation_id).into_response();
        }
    };

    let request: CalculationRequest = match body.into_request() {
        Ok(request) => request,
        Err(errors) => {
            warn!(
                correlation_id = %correlation_id,
                fields = ?errors.keys().collect::<Vec<_>>(),
                "Request validation failed"
            );
            return ProblemDetails::validation(errors, path, correlation_id).into_response();
        }
    };

    let start_time = Instant::now();
    let outcome = state
        .registry()
        .resolve(&request.method_name, correlation_id.as_uuid())
        .and_then(|method| method.calculate(&request, correlation_id.as_uuid()));

    match outcome {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                method = %request.method_name,
                usage_value = %result.usage_value,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            Json(CalculationApiResponse::new(correlation_id, result)).into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            ProblemDetails::from_engine_error(&err, path, correlation_id).into_response()
        }
    }
}

/// Handler for GET /api/health.
async fn health_status_handler() -> Json<HealthStatusResponse> {
    Json(HealthStatusResponse::healthy())
}

/// Handler for GET /health.
///
/// Reports one entry per registered factor method.
async fn health_report_handler(State(state): State<AppState>) -> Json<HealthReport> {
    let registry = state.registry();
    let mut results: Vec<HealthEntry> = registry
        .methods()
        .map(|method| HealthEntry {
            key: method.name().to_string(),
            status: "Healthy".to_string(),
            description: match method.active_version() {
                Some(version) => format!("Factor table version {}", version),
                None => "No versioned factor table".to_string(),
            },
        })
        .collect();
    results.sort_by(|a, b| a.key.cmp(&b.key));

    let status = if registry.is_empty() {
        "Unhealthy"
    } else {
        "Healthy"
    };

    Json(HealthReport {
        status: status.to_string(),
        results,
    })
}

/// Handler for GET /api/calculate/throw, compiled into debug builds only.
///
/// Panics so that the unexpected-failure path can be exercised end to end.
#[cfg(debug_assertions)]
async fn throw_handler() -> Response {
    panic!("Test exception for error handling");
}

/// Fallback for paths that match no route.
async fn not_found_handler(correlation_id: CorrelationId, uri: Uri) -> Response {
    warn!(
        correlation_id = %correlation_id,
        path = %uri.path(),
        "No endpoint found"
    );
    ProblemDetails::not_found(uri.path(), correlation_id).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::correlation::CORRELATION_ID_HEADER;
    use crate::api::rate_limit::RateLimitSettings;
    use crate::calculation::MethodRegistry;
    use crate::config::ConfigLoader;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    fn create_test_state() -> AppState {
        let loader = ConfigLoader::load("./config").expect("Failed to load config");
        let registry = MethodRegistry::from_config(loader.config()).unwrap();
        AppState::with_rate_limit(registry, RateLimitSettings::disabled())
    }

    fn calculate_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/calculate")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_valid_request_returns_200() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(calculate_request(
                r#"{"assetValue":1000,"age":30,"sex":"male","factorMethod":"EenLeven"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let json = body_json(response).await;
        assert_eq!(json["response"]["assetValue"].to_string(), "1000");
        assert_eq!(json["response"]["usedFactor"].to_string(), "19");
        assert_eq!(json["response"]["usageValue"].to_string(), "760");
        assert!(json["correlationId"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(calculate_request("{ invalid json }"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );

        let json = body_json(response).await;
        assert_eq!(json["errorCode"], "VAL-002");
        assert_eq!(json["instance"], "/api/calculate");
    }

    #[tokio::test]
    async fn test_validation_failure_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(calculate_request(
                r#"{"assetValue":-5,"age":200,"sex":"","factorMethod":""}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["errorCode"], "VAL-001");
        assert_eq!(json["title"], "Validation failed for the request.");
        for field in ["assetValue", "age", "sex", "factorMethod"] {
            assert!(json["errors"][field].is_array(), "missing errors for {}", field);
        }
    }

    #[tokio::test]
    async fn test_unknown_method_returns_calculation_error() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(calculate_request(
                r#"{"assetValue":1000,"age":30,"sex":"male","factorMethod":"TweeLevens"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["errorCode"], "CALC-001");
        assert_eq!(json["title"], "Calculation error");
        assert_eq!(json["detail"], "Unknown factor method: TweeLevens");
    }

    #[tokio::test]
    async fn test_correlation_id_is_echoed() {
        let router = create_router(create_test_state());
        let id = Uuid::new_v4();

        let mut request = calculate_request(
            r#"{"assetValue":1000,"age":30,"sex":"male","factorMethod":"EenLeven"}"#,
        );
        request
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, id.to_string().parse().unwrap());

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get(CORRELATION_ID_HEADER).unwrap(),
            id.to_string().as_str()
        );
        let json = body_json(response).await;
        assert_eq!(json["correlationId"], id.to_string());
    }

    #[tokio::test]
    async fn test_unknown_path_returns_404() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key(CORRELATION_ID_HEADER));

        let json = body_json(response).await;
        assert_eq!(json["title"], "Resource Not Found");
        assert_eq!(json["instance"], "/nope");
    }

    #[tokio::test]
    async fn test_health_report_lists_methods() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "Healthy");
        assert_eq!(json["results"][0]["key"], "EenLeven");
        assert_eq!(json["results"][0]["description"], "Factor table version 2024");
    }

    #[cfg(debug_assertions)]
    #[tokio::test]
    async fn test_throw_panic_is_caught_as_generic_500() {
        let router = create_router(create_test_state());
        let id = Uuid::new_v4();

        let request = Request::builder()
            .uri("/api/calculate/throw")
            .header(CORRELATION_ID_HEADER, id.to_string())
            .body(Body::empty())
            .unwrap();

        // the panic must not escape the router and abort the task
        let response = tokio::spawn(router.oneshot(request))
            .await
            .expect("panic escaped the router")
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );
        assert_eq!(
            response.headers().get(CORRELATION_ID_HEADER).unwrap(),
            id.to_string().as_str()
        );

        let json = body_json(response).await;
        assert_eq!(json["title"], "An unexpected error occurred.");
        assert_eq!(json["errorCode"], "GEN-500");
        assert_eq!(json["correlationId"], id.to_string());
        assert_eq!(json["instance"], "/api/calculate/throw");
        assert!(json.get("detail").is_none());
    }
}
