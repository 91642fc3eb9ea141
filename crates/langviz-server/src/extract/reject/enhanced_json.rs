//! JSON extractor and response wrapper with descriptive rejections.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Json as AxumJson, Request};
use axum::response::{IntoResponse, Response};
use derive_more::{Deref, DerefMut, From};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// Maximum number of characters of a parser error echoed to the client.
const MAX_DETAIL_LENGTH: usize = 200;

/// JSON extractor and response type.
///
/// Behaves like [`axum::Json`], but rejections are rendered as the API's
/// error body with a message that names the problem, e.g. a syntax error
/// position or a field with the wrong type.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let extractor = <AxumJson<T> as FromRequest<S>>::from_request(req, state).await;
        extractor.map(|x| Self::new(x.0)).map_err(Into::into)
    }
}

impl<T> IntoResponse for Json<T>
where
    T: Serialize,
{
    #[inline]
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl From<JsonRejection> for Error<'static> {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => ErrorKind::BadRequest
                .with_message(format!(
                    "Invalid request data format: {}",
                    sanitize_error_message(&err.body_text())
                ))
                .with_resource("request"),
            JsonRejection::JsonSyntaxError(err) => ErrorKind::BadRequest
                .with_message(format!(
                    "Invalid JSON syntax in request body: {}",
                    sanitize_error_message(&err.body_text())
                ))
                .with_resource("request"),
            JsonRejection::MissingJsonContentType(_) => ErrorKind::BadRequest
                .with_message("Invalid content type")
                .with_suggestion("Set the Content-Type header to application/json"),
            JsonRejection::BytesRejection(err) => {
                let status = err.status();
                if status == ErrorKind::PayloadTooLarge.status_code() {
                    ErrorKind::PayloadTooLarge
                        .with_message("Request body too large")
                        .with_suggestion("Send smaller snapshots or raise the body limit")
                } else {
                    ErrorKind::BadRequest
                        .with_message("Failed to read request body")
                        .with_context(err.body_text())
                }
            }
            other => ErrorKind::InternalServerError
                .with_message("Request processing failed")
                .with_context(format!("JSON rejection: {other:?}")),
        }
    }
}

/// Keeps parser errors short and single-line.
pub(crate) fn sanitize_error_message(message: &str) -> String {
    let lines = message.lines().take(3).collect::<Vec<_>>();
    lines.join(" ").chars().take(MAX_DETAIL_LENGTH).collect()
}

impl<T> aide::OperationInput for Json<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        AxumJson::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AxumJson::<T>::inferred_early_responses(ctx, operation)
    }
}

impl<T> aide::OperationOutput for Json<T>
where
    T: schemars::JsonSchema + Serialize,
{
    type Inner = T;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        AxumJson::<T>::operation_response(ctx, operation)
    }

    fn inferred_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AxumJson::<T>::inferred_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_truncates_and_joins_lines() {
        let message = format!("first\nsecond\nthird\nfourth {}", "x".repeat(400));
        let sanitized = sanitize_error_message(&message);

        assert!(sanitized.starts_with("first second third"));
        assert!(!sanitized.contains("fourth"));
        assert!(sanitized.chars().count() <= MAX_DETAIL_LENGTH);
    }
}
