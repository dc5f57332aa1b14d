//! Axum extractor for validated request payloads

use super::schema::Validate;
use super::validator::Validator;
use crate::core::error::{ApiError, ValidationError};
use axum::{
    Form,
    body::Bytes,
    extract::{FromRef, FromRequest, Request},
    http::header::CONTENT_TYPE,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Axum extractor that populates `T` from the body and checks its schema
///
/// JSON bodies are decoded directly. Url-encoded form bodies are decoded
/// through [`axum::Form`] and then checked. Failures reject with
/// [`ApiError::Validation`], which renders as a 422 form-error envelope.
///
/// The router state must expose a [`Validator`] through [`FromRef`].
///
/// # Usage
///
/// ```rust,ignore
/// async fn store(Validated(req): Validated<AccountStoreRequest>) -> Response {
///     // req passed every rule
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    Validator: FromRef<S>,
    T: Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let validator = Validator::from_ref(state);
        let path = req.uri().path().to_string();

        let result = if is_form(&req) {
            match Form::<T>::from_request(req, state).await {
                Ok(Form(target)) => validator.check(&target).map(|_| target),
                Err(e) => Err(ValidationError::decode(e.body_text())),
            }
        } else {
            match Bytes::from_request(req, state).await {
                Ok(body) => validator.validate_json::<T>(&body),
                Err(e) => Err(ValidationError::decode(e.body_text())),
            }
        };

        result.map(Validated).map_err(|err| {
            tracing::debug!(%path, error = %err, "request payload rejected");
            err.into()
        })
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE))
}
