//! Mapping from the core error taxonomy to HTTP responses

use actix_web::HttpResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::ValidationErrors;

use sf_core::errors::SmsError;

/// Error body returned by every route
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// When the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ApiError {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Convert a service error into its HTTP response
pub fn error_response(err: &SmsError) -> HttpResponse {
    let (code, mut builder) = match err {
        SmsError::Validation { .. } => ("VALIDATION_ERROR", HttpResponse::BadRequest()),
        SmsError::Auth { .. } => ("GATEWAY_AUTH_FAILED", HttpResponse::BadGateway()),
        SmsError::Transport { .. } => ("GATEWAY_UNREACHABLE", HttpResponse::BadGateway()),
        SmsError::Rejected { .. } => ("GATEWAY_REJECTED", HttpResponse::BadGateway()),
        SmsError::Storage { .. } => ("STORAGE_ERROR", HttpResponse::InternalServerError()),
        SmsError::Config { .. } => ("CONFIGURATION_ERROR", HttpResponse::InternalServerError()),
    };
    builder.json(ApiError::new(code, err.to_string()))
}

/// 400 response for DTO validation failures
pub fn validation_failure(errors: &ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiError::new("VALIDATION_ERROR", errors.to_string()))
}

/// 400 response for request-shape problems the DTO cannot express
pub fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiError::new("VALIDATION_ERROR", message))
}
