//! Validated JSON extractor.
//!
//! [`ValidateJson`] deserializes with [`Json`] and then runs the body
//! through `validator`, rejecting with field-level details on failure.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::Json;
use crate::handler::response::ValidationErrorDetail;
use crate::handler::{Error, ErrorKind};

/// Tracing target for request validation.
const TRACING_TARGET: &str = "langviz_server::extract::validate";

/// JSON body extractor that also validates the body.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        data.validate()?;
        Ok(Self::new(data))
    }
}

fn format_length_error(field: &str, params: &HashMap<Cow<'static, str>, serde_json::Value>) -> String {
    let min = params.get("min").and_then(serde_json::Value::as_u64);
    let max = params.get("max").and_then(serde_json::Value::as_u64);

    match (min, max) {
        (Some(min), Some(max)) => {
            format!("Field '{field}' must be between {min} and {max} characters long")
        }
        (Some(min), None) => format!("Field '{field}' must be at least {min} characters long"),
        (None, Some(max)) => format!("Field '{field}' must be at most {max} characters long"),
        (None, None) => format!("Field '{field}' has invalid length"),
    }
}

fn format_range_error(field: &str, params: &HashMap<Cow<'static, str>, serde_json::Value>) -> String {
    let min = params.get("min").and_then(serde_json::Value::as_f64);
    let max = params.get("max").and_then(serde_json::Value::as_f64);

    match (min, max) {
        (Some(min), Some(max)) => format!("Field '{field}' must be between {min} and {max}"),
        (Some(min), None) => format!("Field '{field}' must be at least {min}"),
        (None, Some(max)) => format!("Field '{field}' must be at most {max}"),
        (None, None) => format!("Field '{field}' is out of valid range"),
    }
}

/// Formats one validation failure as a user-facing sentence.
///
/// Custom messages declared on the request type are used verbatim.
pub(crate) fn format_validation_error(field: &str, error: &validator::ValidationError) -> String {
    if let Some(custom_message) = &error.message {
        return custom_message.to_string();
    }

    match error.code.as_ref() {
        "required" => format!("Field '{field}' is required"),
        "length" => format_length_error(field, &error.params),
        "range" => format_range_error(field, &error.params),
        code => format!("Field '{field}' failed validation: {code}"),
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let mut messages: Vec<String> = Vec::new();
        for (field, field_errors) in fields {
            for error in field_errors {
                let message = format_validation_error(&field, error);
                if !messages.contains(&message) {
                    messages.push(message);
                }
            }
        }

        let user_message = match messages.as_slice() {
            [] => "Validation failed".to_owned(),
            [single] => single.clone(),
            multiple => multiple.join(". "),
        };

        tracing::debug!(
            target: TRACING_TARGET,
            errors = ?errors.field_errors(),
            "request validation failed"
        );

        ErrorKind::BadRequest
            .with_message(user_message)
            .with_resource("request")
            .with_validation(ValidationErrorDetail::from_errors(&errors))
    }
}

impl<T> aide::OperationInput for ValidateJson<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        Json::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        Json::<T>::inferred_early_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use validator::ValidationError;

    use super::*;

    #[test]
    fn custom_message_is_used_verbatim() {
        let error = ValidationError::new("required").with_message("graphId is missing".into());
        assert_eq!(format_validation_error("graph_id", &error), "graphId is missing");
    }

    #[test]
    fn length_message_mentions_bounds() {
        let mut error = ValidationError::new("length");
        error.add_param("max".into(), &255);
        assert_eq!(
            format_validation_error("name", &error),
            "Field 'name' must be at most 255 characters long"
        );
    }

    #[test]
    fn errors_convert_to_bad_request_with_details() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "graph_id",
            ValidationError::new("required").with_message("graphId is missing".into()),
        );

        let error: Error = errors.into();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), Some("graphId is missing"));
        assert_eq!(error.resource(), Some("request"));
        assert_eq!(error.validation().map(<[_]>::len), Some(1));
    }
}
