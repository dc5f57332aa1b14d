//! Response envelopes
//!
//! Every JSON answer is wrapped in one of three shapes so front ends can
//! branch on the presence of `data`, `error` or `errors`:
//!
//! - success: `{ "data": ..., "message": "..." }`
//! - error: `{ "message": "...", "error": "..." }`
//! - form error: `{ "errors": { "field": "message" }, "message": "..." }`

use crate::core::validation::FieldErrors;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt::Display;

/// Successful API response with a message and data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub data: T,
    pub message: String,
}

/// Failed API response with a message and an error string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error: String,
}

/// Failed API response carrying per-field validation messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormErrorResponse {
    pub errors: FieldErrors,
    pub message: String,
}

impl FormErrorResponse {
    /// Field names present in the error bag
    pub fn fields(&self) -> Vec<&str> {
        self.errors.fields()
    }

    /// True when every given field has an error
    pub fn contains(&self, fields: &[&str]) -> bool {
        self.errors.contains_all(fields)
    }
}

/// Builders for enveloped responses
///
/// # Example
///
/// ```rust,ignore
/// async fn store(Validated(req): Validated<AccountStoreRequest>) -> Response {
///     match repo.create(req.into()).await {
///         Ok(account) => Reply::success("success", account),
///         Err(e) => Reply::error("creating account", e),
///     }
/// }
/// ```
pub struct Reply;

impl Reply {
    /// 200 with the data wrapped in a success envelope
    ///
    /// A payload that serializes to `null` is sent as `{}` so clients never
    /// see a null `data` field.
    pub fn success<T: Serialize>(message: impl Into<String>, data: T) -> Response {
        let data = match serde_json::to_value(data) {
            Ok(Value::Null) => json!({}),
            Ok(value) => value,
            Err(e) => {
                return Self::with_status(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "serializing response",
                    e,
                );
            }
        };

        (
            StatusCode::OK,
            Json(SuccessResponse {
                data,
                message: message.into(),
            }),
        )
            .into_response()
    }

    /// 422 with an error envelope
    pub fn error(message: impl Into<String>, err: impl Display) -> Response {
        Self::with_status(StatusCode::UNPROCESSABLE_ENTITY, message, err)
    }

    /// 422 with a form error envelope, for UI feedback
    pub fn form_error(message: impl Into<String>, errors: FieldErrors) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FormErrorResponse {
                errors,
                message: message.into(),
            }),
        )
            .into_response()
    }

    pub fn unauthorized(message: impl Into<String>, err: impl Display) -> Response {
        Self::with_status(StatusCode::UNAUTHORIZED, message, err)
    }

    pub fn bad_request(message: impl Into<String>, err: impl Display) -> Response {
        Self::with_status(StatusCode::BAD_REQUEST, message, err)
    }

    pub fn not_found(message: impl Into<String>, err: impl Display) -> Response {
        Self::with_status(StatusCode::NOT_FOUND, message, err)
    }

    /// Error envelope with an arbitrary status code
    pub fn with_status(
        status: StatusCode,
        message: impl Into<String>,
        err: impl Display,
    ) -> Response {
        (
            status,
            Json(ErrorResponse {
                message: message.into(),
                error: err.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        let response = Reply::success("success", vec![1, 2, 3]);
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_error_helpers_status_codes() {
        assert_eq!(
            Reply::error("creating", "boom").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Reply::unauthorized("login", "bad token").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Reply::bad_request("parse", "bad id").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Reply::not_found("lookup", "missing").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Reply::form_error("creating", FieldErrors::new()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_form_error_response_helpers() {
        let res = FormErrorResponse {
            errors: [("username", "x"), ("password", "y")].into_iter().collect(),
            message: "creating account".to_string(),
        };
        assert!(res.contains(&["username", "password"]));
        assert!(!res.contains(&["email"]));
        assert_eq!(res.fields(), vec!["username", "password"]);
    }

    #[test]
    fn test_success_envelope_shape() {
        let body = SuccessResponse {
            data: json!({"id": 1}),
            message: "success".to_string(),
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"data": {"id": 1}, "message": "success"})
        );
    }
}
