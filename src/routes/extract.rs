//! Extractors whose rejections use the `AppError` body instead of axum's
//! plain-text responses.

use crate::error::AppError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

/// JSON request body; a missing, mistyped or unparsable field is a
/// `VALIDATION_ERROR` naming the field.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        Ok(Self(value))
    }
}

/// Path parameter `{id}`.
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection)?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let text = rejection.body_text();
    log::debug!("rejected JSON body: {}", text);
    match rejected_field(&text) {
        Rejected::Missing(field) => AppError::validation(field, "is required"),
        Rejected::Invalid(field) => AppError::validation(field, "is not valid"),
        Rejected::Body => AppError::validation("body", text),
    }
}

fn path_rejection(rejection: PathRejection) -> AppError {
    log::debug!("rejected path: {}", rejection.body_text());
    AppError::validation("id", "is not a valid id")
}

#[derive(Debug, PartialEq)]
enum Rejected {
    Missing(String),
    Invalid(String),
    Body,
}

/// Recover the offending field from serde's message: either
/// "missing field `name`" or a "path: reason" prefix.
fn rejected_field(text: &str) -> Rejected {
    if let Some(rest) = text.split("missing field `").nth(1) {
        if let Some(name) = rest.split('`').next() {
            return Rejected::Missing(snake_case(name));
        }
    }
    let detail = text.rsplit("target type: ").next().unwrap_or(text);
    match detail.split_once(": ") {
        Some((path, _)) if is_field_path(path) => {
            let head = path.split(['.', '[']).next().unwrap_or(path);
            Rejected::Invalid(snake_case(head))
        }
        _ => Rejected::Body,
    }
}

fn is_field_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
