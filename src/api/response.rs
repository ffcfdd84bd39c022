//! Response types for the usage value API.
//!
//! Successful calculations are wrapped in [`CalculationApiResponse`]. Every
//! failure is reported as an RFC 7807 problem details document.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::CalculationResult;

use super::correlation::CorrelationId;
use super::request::ValidationErrors;

/// Content type of problem details bodies.
pub const PROBLEM_JSON: &str = "application/problem+json";

/// Error code for request validation failures.
pub const VALIDATION_ERROR_CODE: &str = "VAL-001";
/// Error code for request bodies that are not valid JSON.
pub const MALFORMED_BODY_ERROR_CODE: &str = "VAL-002";
/// Error code for business-rule calculation failures.
pub const CALCULATION_ERROR_CODE: &str = "CALC-001";
/// Error code for unexpected failures.
pub const UNEXPECTED_ERROR_CODE: &str = "GEN-500";
/// Error code for unknown endpoints.
pub const NOT_FOUND_ERROR_CODE: &str = "NF-404";

/// Successful calculation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationApiResponse {
    /// The correlation id of the request.
    pub correlation_id: String,
    /// The calculation result.
    pub response: CalculationResult,
}

impl CalculationApiResponse {
    /// Wraps a result with the request's correlation id.
    pub fn new(correlation_id: CorrelationId, response: CalculationResult) -> Self {
        Self {
            correlation_id: correlation_id.to_string(),
            response,
        }
    }
}

/// An RFC 7807 problem details document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    /// Short summary of the problem type.
    pub title: String,
    /// The HTTP status code.
    pub status: u16,
    /// Explanation specific to this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// The request path that produced the problem.
    pub instance: String,
    /// When the problem was produced.
    pub timestamp: DateTime<Utc>,
    /// The correlation id of the request.
    pub correlation_id: String,
    /// Machine-readable error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Validation messages grouped by field.
    #[serde(default, skip_serializing_if = "ValidationErrors::is_empty")]
    pub errors: ValidationErrors,
}

impl ProblemDetails {
    /// Creates a problem with the given status and title.
    pub fn new(
        status: StatusCode,
        title: impl Into<String>,
        instance: impl Into<String>,
        correlation_id: CorrelationId,
    ) -> Self {
        Self {
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: instance.into(),
            timestamp: Utc::now(),
            correlation_id: correlation_id.to_string(),
            error_code: None,
            errors: ValidationErrors::new(),
        }
    }

    /// Sets the occurrence-specific detail.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Sets the error code.
    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    /// Sets the grouped validation messages.
    pub fn with_errors(mut self, errors: ValidationErrors) -> Self {
        self.errors = errors;
        self
    }

    /// 400 for a request that failed validation.
    pub fn validation(
        errors: ValidationErrors,
        instance: impl Into<String>,
        correlation_id: CorrelationId,
    ) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Validation failed for the request.",
            instance,
            correlation_id,
        )
        .with_error_code(VALIDATION_ERROR_CODE)
        .with_errors(errors)
    }

    /// 400 for a body that could not be read as JSON.
    pub fn malformed_body(
        detail: impl Into<String>,
        instance: impl Into<String>,
        correlation_id: CorrelationId,
    ) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Malformed request body.",
            instance,
            correlation_id,
        )
        .with_detail(detail)
        .with_error_code(MALFORMED_BODY_ERROR_CODE)
    }

    /// 404 for a path no route matches.
    pub fn not_found(path: &str, correlation_id: CorrelationId) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "Resource Not Found",
            path,
            correlation_id,
        )
        .with_detail(format!("No endpoint found for path {}", path))
        .with_error_code(NOT_FOUND_ERROR_CODE)
    }

    /// Maps an engine error to a problem.
    ///
    /// Business-rule failures become 400 with the error message as detail.
    /// Anything else becomes a 500 that does not expose internal detail.
    pub fn from_engine_error(
        error: &EngineError,
        instance: impl Into<String>,
        correlation_id: CorrelationId,
    ) -> Self {
        if error.is_client_error() {
            Self::new(
                StatusCode::BAD_REQUEST,
                "Calculation error",
                instance,
                correlation_id,
            )
            .with_detail(error.to_string())
            .with_error_code(CALCULATION_ERROR_CODE)
        } else {
            Self::unexpected(instance, correlation_id)
        }
    }

    /// 500 for a server fault. Carries no internal detail.
    pub fn unexpected(instance: impl Into<String>, correlation_id: CorrelationId) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An unexpected error occurred.",
            instance,
            correlation_id,
        )
        .with_error_code(UNEXPECTED_ERROR_CODE)
    }

    /// Returns the HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self)).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
        response
    }
}

/// Body of a 429 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitedResponse {
    /// Human-readable message.
    pub error: String,
    /// The correlation id of the rejected request.
    pub correlation_id: String,
}

impl RateLimitedResponse {
    /// Creates the standard rejection body.
    pub fn new(correlation_id: CorrelationId) -> Self {
        Self {
            error: "Too many requests. Please wait and try again.".to_string(),
            correlation_id: correlation_id.to_string(),
        }
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatusResponse {
    /// Always "Healthy" while the process serves requests.
    pub status: String,
    /// When the status was produced.
    pub timestamp: DateTime<Utc>,
}

impl HealthStatusResponse {
    /// A healthy status stamped now.
    pub fn healthy() -> Self {
        Self {
            status: "Healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// One entry of the health-check report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthEntry {
    /// The checked component.
    pub key: String,
    /// The component status.
    pub status: String,
    /// Additional information about the component.
    pub description: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// The aggregate status.
    pub status: String,
    /// Per-component results.
    pub results: Vec<HealthEntry>,
}
