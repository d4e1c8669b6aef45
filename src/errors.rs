use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::dto::product::missing_field_message;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// A single constraint violation on a request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Name of the offending field
    #[schema(example = "name")]
    pub field: String,
    /// What was wrong with it
    #[schema(example = "must not be blank")]
    pub message: String,
}

/// Error body returned for every failure except "product not found"
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Bad Request",
    "message": "Validation failed",
    "errors": [{"field": "name", "message": "must not be blank"}],
    "request_id": "req-abc123xyz",
    "timestamp": "2024-12-09T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Bad Request", "Internal Server Error")
    #[schema(example = "Bad Request")]
    pub error: String,
    /// Human-readable error description
    #[schema(example = "Validation failed")]
    pub message: String,
    /// Per-field validation errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    /// Unique request identifier for support and debugging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "req-abc123xyz")]
    pub request_id: Option<String>,
    /// ISO 8601 timestamp when error occurred
    #[schema(example = "2024-12-09T10:30:00.000Z")]
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(status: StatusCode, message: String, errors: Option<Vec<FieldError>>) -> Self {
        Self {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            errors,
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Storage failures return a generic message to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorResponse::new(status, self.response_message(), None);
        (status, Json(body)).into_response()
    }
}

/// API Error type for HTTP responses
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Service error: {0}")]
    ServiceError(#[from] ServiceError),

    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
        field_errors: Vec<FieldError>,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        ApiError::ServiceError(ServiceError::DatabaseError(err))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::ValidationError {
            message: "Validation failed".to_string(),
            field_errors: field_errors(&errors),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Flattens validator output into a stable, field-sorted list
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .errors()
        .iter()
        .flat_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(errs) => errs
                .iter()
                .map(|err| FieldError {
                    field: field.to_string(),
                    message: match &err.message {
                        Some(message) => message.to_string(),
                        None if err.code == "required" => {
                            missing_field_message(field).to_string()
                        }
                        None => err.code.to_string(),
                    },
                })
                .collect::<Vec<_>>(),
            _ => vec![FieldError {
                field: field.to_string(),
                message: "invalid".to_string(),
            }],
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            // Delegate to ServiceError's unified status/message methods
            ApiError::ServiceError(service_error) => return service_error.into_response(),
            ApiError::ValidationError {
                message,
                field_errors,
            } => (StatusCode::BAD_REQUEST, message, Some(field_errors)),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
        };

        (status, Json(ErrorResponse::new(status, message, errors))).into_response()
    }
}
