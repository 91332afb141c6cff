//! API error responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error types exposed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    NotFoundError,
    ServerError,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                },
            },
        }
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiErrorType::InvalidRequestError,
            message,
        )
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorType::ServerError,
            message,
        )
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match &error {
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::NotFound { message } => Self::not_found(message),
            _ => Self::internal(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let api_error: ApiError = DomainError::validation("query must not be empty").into();

        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            api_error.response.error.error_type,
            ApiErrorType::InvalidRequestError
        );
    }

    #[test]
    fn test_provider_maps_to_server_error() {
        let api_error: ApiError = DomainError::provider("qdrant", "unreachable").into();

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.response.error.error_type, ApiErrorType::ServerError);
    }

    #[test]
    fn test_error_body_wire_format() {
        let api_error = ApiError::bad_request("bad input");
        let body = serde_json::to_value(&api_error.response).unwrap();

        assert_eq!(body["error"]["message"], "bad input");
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }
}
