//! HTTP error responses.
//!
//! Every failure leaves the service as `{"error": <message>, "code": <CODE>}`
//! with the status taken from the [`ErrorCode`]. Storage failures never leak
//! their details; they are logged and replaced by a per-operation message.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::warehouse::MapError;

/// Error categories returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation (400)
    /// Body could not be read as JSON
    ValidationFailed,
    /// Required field absent or blank
    MissingField,
    /// Field present but unusable
    InvalidInput,

    // Not found (404)
    MapNotFound,
    EntityNotFound,

    // Conflict (409)
    MapAlreadyExists,
    Conflict,

    // Server (500)
    DatabaseError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed | ErrorCode::MissingField | ErrorCode::InvalidInput => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::MapNotFound | ErrorCode::EntityNotFound => StatusCode::NOT_FOUND,
            ErrorCode::MapAlreadyExists | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn for_map_error(err: &MapError) -> Self {
        match err {
            MapError::DuplicateName { .. } => ErrorCode::MapAlreadyExists,
            MapError::MapNotFound { .. } | MapError::NoMatches { .. } => ErrorCode::MapNotFound,
            e if e.is_conflict() => ErrorCode::Conflict,
            e if e.is_not_found() => ErrorCode::EntityNotFound,
            e if e.is_missing_field() => ErrorCode::MissingField,
            _ => ErrorCode::InvalidInput,
        }
    }
}

/// Wire form of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: ErrorCode,
}

/// An error ready to be turned into an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    /// Translate a library error raised while handling `operation`.
    ///
    /// Caller mistakes keep their own message. Anything else is logged with
    /// its full cause chain and reported as `internal_message`.
    pub fn from_warehouse(err: Error, operation: &str, internal_message: &str) -> Self {
        match err {
            Error::Map(map_err) => {
                let code = ErrorCode::for_map_error(&map_err);
                tracing::warn!(operation, code = ?code, error = %map_err, "Request rejected");
                Self::new(code, map_err.to_string())
            }
            Error::Backend(backend_err) => {
                tracing::error!(operation, error = ?backend_err, "Storage failure");
                Self::new(ErrorCode::DatabaseError, internal_message)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "Rejected request body");
        ApiError::new(
            ErrorCode::ValidationFailed,
            "Corpo da requisição inválido: JSON esperado.",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            code: self.code,
        };
        (self.code.status_code(), Json(body)).into_response()
    }
}
