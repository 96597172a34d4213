use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::agenda::AgendaError;

/// A specialized `Result` type for dashboard handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Unified error type for the HTTP layer.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    FilterNotValid(String),
    InvalidPayload(String),
    DatabaseError(sqlx::Error),
    IoError(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "Not found: {what}"),
            Self::FilterNotValid(details) => write!(f, "The filter is invalid: {details}"),
            Self::InvalidPayload(details) => write!(f, "The request payload is invalid: {details}"),
            Self::DatabaseError(e) => write!(f, "A database error occurred: {e}"),
            Self::IoError(e) => write!(f, "An I/O error occurred: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DatabaseError(e) => Some(e),
            Self::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl AppError {
    /// Status code and stable type name used in the JSON body.
    pub fn kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            Self::FilterNotValid(_) => (StatusCode::BAD_REQUEST, "FilterNotValid"),
            Self::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "InvalidPayload"),
            Self::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            Self::IoError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IoError"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.kind();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = axum::Json(json!({
            "status": "error",
            "error": { "type": error_type, "message": self.to_string() }
        }));
        (status, body).into_response()
    }
}

// Implement `From` conversions to allow the `?` operator to work seamlessly.
impl From<AgendaError> for AppError {
    fn from(err: AgendaError) -> Self {
        match err {
            AgendaError::FilterNotValid(raw) => {
                AppError::FilterNotValid(format!("agenda id should be an integer, not '{raw}'"))
            }
            AgendaError::InvalidItem(msg) => AppError::InvalidPayload(msg),
            AgendaError::Database(e) => AppError::DatabaseError(e),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err)
    }
}
