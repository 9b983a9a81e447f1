//! Typed errors for the content API
//!
//! Every CRUD failure is one of four kinds:
//!
//! - [`ApiError::Validation`]: malformed or missing input (400)
//! - [`ApiError::NotFound`]: no document with the given id (404)
//! - [`ApiError::InvalidId`]: the id is not a well-formed reference (400)
//! - [`ApiError::Storage`]: unexpected persistence failure (500)
//!
//! All of them render as `{"error": "...", "details": "..."}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Failures raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend rejected or failed the operation
    #[error("{operation} failed: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },

    /// A stored document could not be converted to or from its wire form
    #[error("failed to convert document: {0}")]
    Serialization(String),

    /// A lock protecting in-process state was poisoned
    #[error("storage lock poisoned: {0}")]
    Lock(String),
}

impl StorageError {
    pub fn backend(operation: &'static str, err: impl std::fmt::Display) -> Self {
        StorageError::Backend {
            operation,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// The error type returned by every CRUD handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("'{0}' is not a valid id")]
    InvalidId(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short error label placed in the `error` field
    pub fn label(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "Validation failed",
            ApiError::NotFound { .. } => "Not found",
            ApiError::InvalidId(_) => "Invalid id",
            ApiError::Storage(_) => "Storage error",
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.label().to_string(),
            details: Some(self.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage(err) = &self {
            tracing::error!(error = %err, "Storage error");
        }
        (self.status_code(), Json(self.to_body())).into_response()
    }
}

/// Result type alias for handlers
pub type ApiResult<T> = Result<T, ApiError>;
