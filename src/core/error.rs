//! Typed error handling for restkit
//!
//! Every error knows its HTTP status and a stable error code, and renders
//! itself through the response envelopes in [`crate::core::response`].
//!
//! # Error Categories
//!
//! - [`ValidationError`]: payload could not be decoded or failed field rules
//! - [`EntityError`]: resource lookups and mutations
//! - [`RequestError`]: unmatched routes and auth failures
//! - [`StorageError`]: data-access collaborators
//! - [`ConfigError`]: configuration parsing and validation
//!
//! # Example
//!
//! ```rust,ignore
//! async fn show(id: String) -> ApiResult<Response> {
//!     let account = repo.find(&id).await?.ok_or_else(|| EntityError::NotFound {
//!         resource: "account".to_string(),
//!         id: id.clone(),
//!     })?;
//!     Ok(Reply::success("success", account))
//! }
//! ```

use crate::core::response::{ErrorResponse, FormErrorResponse};
use crate::core::validation::FieldErrors;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Message attached to form-error envelopes produced by a failed extractor
pub const VALIDATION_FAILED_MESSAGE: &str = "validation failed";

/// The main error type for restkit
#[derive(Debug, Error)]
pub enum ApiError {
    /// Payload decoding or field validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Resource lookup and mutation errors
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Data-access errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Entity(e) => e.status_code(),
            ApiError::Request(e) => e.status_code(),
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(e) => e.error_code(),
            ApiError::Entity(e) => e.error_code(),
            ApiError::Request(e) => e.error_code(),
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::Config(_) => "CONFIG_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Short human summary used as the envelope message
    pub fn summary(&self) -> String {
        match self {
            ApiError::Validation(_) => VALIDATION_FAILED_MESSAGE.to_string(),
            _ => self
                .status_code()
                .canonical_reason()
                .unwrap_or("error")
                .to_lowercase(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Validation(err) => {
                let body = FormErrorResponse {
                    errors: err.errors(),
                    message: VALIDATION_FAILED_MESSAGE.to_string(),
                };
                (status, Json(body)).into_response()
            }
            other => {
                let body = ErrorResponse {
                    message: other.summary(),
                    error: other.to_string(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors produced by the validator
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The payload could not be decoded into the target's shape
    #[error("Invalid payload: {message}")]
    Decode { message: String },

    /// One or more fields failed their rules
    #[error("Validation failed for: {}", .0.fields().join(", "))]
    Fields(FieldErrors),
}

impl ValidationError {
    pub fn decode(err: impl std::fmt::Display) -> Self {
        ValidationError::Decode {
            message: err.to_string(),
        }
    }

    /// The error bag exposed to clients
    ///
    /// Decode failures carry no field context and are reported under the
    /// `"error"` sentinel key.
    pub fn errors(&self) -> FieldErrors {
        match self {
            ValidationError::Decode { message } => FieldErrors::decode(message.clone()),
            ValidationError::Fields(bag) => bag.clone(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::Decode { .. } => "INVALID_PAYLOAD",
            ValidationError::Fields(_) => "VALIDATION_ERROR",
        }
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to resource operations
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: String, id: String },

    #[error("{resource} with id '{id}' already exists")]
    AlreadyExists { resource: String, id: String },

    #[error("Failed to {operation} {resource}: {message}")]
    OperationFailed {
        resource: String,
        operation: String,
        message: String,
    },
}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::CONFLICT,
            EntityError::OperationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
            EntityError::OperationFailed { .. } => "ENTITY_OPERATION_FAILED",
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("endpoint not found")]
    RouteNotFound { path: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::RouteNotFound { .. } => "ROUTE_NOT_FOUND",
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by data-access collaborators
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("IO error: {message}")]
    IoError { message: String },
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Validation(ValidationError::Decode {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ApiError {
    fn from(err: serde_yaml::Error) -> Self {
        ApiError::Config(err.into())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Config(err.into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<EntityError>() {
            Ok(entity) => return ApiError::Entity(entity),
            Err(err) => err,
        };
        match err.downcast::<StorageError>() {
            Ok(storage) => ApiError::Storage(storage),
            Err(err) => ApiError::Internal(err.to_string()),
        }
    }
}

/// A specialized Result type for restkit operations
pub type ApiResult<T> = Result<T, ApiError>;
