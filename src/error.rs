use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::ValidationErrors;

/// Terminal request errors. Every variant renders as a `{"message": ...}`
/// JSON body with the mapped status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Binding or validation failure, or a duplicate unique key.
    #[error("{0}")]
    BadRequest(String),
    /// No row matched the requested id.
    #[error("{0}")]
    NotFound(String),
    /// The backing store refused or failed the operation.
    #[error("{0}")]
    Unavailable(String),
    /// Server-side processing failure, e.g. password hashing.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Collapse field-level validation failures into one stable message.
    pub fn from_validation(errors: ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut messages: Vec<String> = field_errors
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    err.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"))
                })
            })
            .collect();
        messages.sort();
        ApiError::BadRequest(messages.join("; "))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
