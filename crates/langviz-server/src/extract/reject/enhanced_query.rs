use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query as AxumQuery};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// Query string extractor with descriptive rejections.
///
/// Failures name the offending parameter where `serde_urlencoded` reports
/// one, e.g. a missing `graphId`.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(query)) => Ok(Query(query)),
            Err(rejection) => Err(enhance_query_error(rejection)),
        }
    }
}

fn enhance_query_error(rejection: QueryRejection) -> Error<'static> {
    tracing::debug!(
        target: "langviz_server::extract::query",
        error = %rejection,
        "query parameter parsing failed"
    );

    let QueryRejection::FailedToDeserializeQueryString(err) = rejection else {
        return ErrorKind::BadRequest
            .with_message("Invalid query parameters")
            .with_resource("request");
    };

    let error_message = err.body_text();
    let field_name = extract_field_name_from_error(&error_message).unwrap_or("unknown");

    let error = if error_message.contains("missing field") {
        ErrorKind::BadRequest.with_message(format!("Missing required query parameter '{field_name}'"))
    } else if error_message.contains("duplicate field") {
        ErrorKind::BadRequest.with_message(format!("Query parameter '{field_name}' was provided more than once"))
    } else {
        ErrorKind::BadRequest
            .with_message("Invalid query parameters")
            .with_context(error_message.clone())
    };

    error.with_resource("request").into_static()
}

/// Best-effort extraction of a field name from a serde error message.
fn extract_field_name_from_error(error_message: &str) -> Option<&str> {
    if let Some(start) = error_message.find('`')
        && let Some(end) = error_message[start + 1..].find('`')
    {
        return Some(&error_message[start + 1..start + 1 + end]);
    }

    let start = error_message.find("field ")?;
    let field_part = &error_message[start + 6..];
    field_part.find(' ').map(|end| &field_part[..end])
}

impl<T> aide::OperationInput for Query<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        AxumQuery::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AxumQuery::<T>::inferred_early_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_name_from_backticks() {
        assert_eq!(
            extract_field_name_from_error("missing field `graphId`"),
            Some("graphId")
        );
    }

    #[test]
    fn field_name_from_plain_text() {
        assert_eq!(
            extract_field_name_from_error("duplicate field graphId at line 1"),
            Some("graphId")
        );
        assert_eq!(extract_field_name_from_error("some other error"), None);
    }
}
