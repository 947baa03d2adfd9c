//! Payload validation
//!
//! Create and update payloads go through [`ValidatedJson`], which checks them
//! in two steps:
//!
//! 1. **Schema** - the body must be a JSON object that deserializes into the
//!    payload type. Payload types reject unknown fields, so a stray key fails
//!    here as well as a missing or mistyped one.
//! 2. **Rules** - the payload's `validator::Validate` impl (lengths, ranges).
//!
//! Either step turns into [`ApiError::ValidationFailed`], a list of
//! [`FieldError`]s rendered as `{"errors":[{"field":..,"message":..}]}`.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::errors::ApiError;

/// Field reported when a failure cannot be pinned to a single key.
pub const BODY_FIELD: &str = "body";

/// One rejected field with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Flatten `validator` output into field errors, ordered by field name so
/// responses are stable.
#[must_use]
pub fn from_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, failures)| {
            let field = field.to_string();
            failures.iter().map(move |failure| {
                let message = failure.message.as_ref().map_or_else(
                    || format!("Failed the `{}` rule", failure.code),
                    ToString::to_string,
                );
                FieldError::new(field.clone(), message)
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    fields
}

/// Map a deserialization failure onto the field it names.
///
/// serde reports missing and unknown keys as ``missing field `name` `` and
/// ``unknown field `colour`, expected ...``; the first backticked token is
/// the field. Other failures (wrong types) are reported against the body.
#[must_use]
pub fn from_json_error(err: &serde_json::Error) -> FieldError {
    let message = err.to_string();
    let field = if message.starts_with("missing field") || message.starts_with("unknown field") {
        message
            .split('`')
            .nth(1)
            .filter(|name| !name.is_empty())
            .unwrap_or(BODY_FIELD)
            .to_string()
    } else {
        BODY_FIELD.to_string()
    };
    FieldError::new(field, message)
}

/// Parse and validate a payload in one go.
///
/// # Errors
///
/// Returns every field failure found: a schema failure short-circuits before
/// the rules run.
pub fn validate_payload<T>(bytes: &[u8]) -> Result<T, Vec<FieldError>>
where
    T: DeserializeOwned + Validate,
{
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| vec![FieldError::new(BODY_FIELD, format!("Malformed JSON: {err}"))])?;
    if !value.is_object() {
        return Err(vec![FieldError::new(BODY_FIELD, "Expected a JSON object")]);
    }
    let payload: T = serde_json::from_value(value).map_err(|err| vec![from_json_error(&err)])?;
    payload
        .validate()
        .map_err(|errors| from_validation_errors(&errors))?;
    Ok(payload)
}

/// JSON body extractor that runs [`validate_payload`].
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        validate_payload(&bytes)
            .map(ValidatedJson)
            .map_err(ApiError::validation_failed)
    }
}
