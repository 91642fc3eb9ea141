//! Validated query string extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::Query;
use crate::handler::Error;

/// Query string extractor that also validates the parameters.
///
/// Rejections use the same body as [`ValidateJson`], so a missing
/// `graphId` reads the same whether it came from a body or a query.
///
/// [`ValidateJson`]: super::ValidateJson
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateQuery<T>(pub T);

impl<T> ValidateQuery<T> {
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for ValidateQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(data) = <Query<T> as FromRequestParts<S>>::from_request_parts(parts, state).await?;
        data.validate()?;
        Ok(Self::new(data))
    }
}

impl<T> aide::OperationInput for ValidateQuery<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        Query::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        Query::<T>::inferred_early_responses(ctx, operation)
    }
}
