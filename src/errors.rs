//! # Error handling for the generic controller
//!
//! Every handler returns `Result<_, ApiError>`. The error kinds map onto HTTP
//! statuses through one table ([`ApiError::status_code`]):
//!
//! | kind | status | body |
//! |---|---|---|
//! | `ValidationFailed` | 400 | `{"errors":[{"field","message"}]}` |
//! | `BadRequest` | 400 | `{"success":false,"message":...}` |
//! | `NotFound` | 404 | `{"success":false,"message":"Not found"}` |
//! | `Database` | 500 | `{"success":false,"message":"Internal Server Error"}` |
//! | `Internal` | 500 | `{"success":false,"message":"Internal Server Error"}` |
//!
//! Database failures and malformed path ids are not interpreted by the
//! handlers. They travel through `?` (see the `From<DbErr>` impl and
//! [`ApiError::internal`]) into the 500 arm, where the details are logged with
//! `tracing` and replaced by a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

use crate::response::MessageResponse;
use crate::validation::FieldError;

const INTERNAL_MESSAGE: &str = "Internal Server Error";

#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found - identifier does not resolve to a record
    NotFound {
        /// Resource type (e.g., "item")
        resource: String,
        /// Optional ID that wasn't found
        id: Option<String>,
    },

    /// 400 Bad Request - malformed input outside the payload schema
    BadRequest { message: String },

    /// 400 Bad Request - payload failed the field schema
    ValidationFailed { errors: Vec<FieldError> },

    /// 500 Internal Server Error - database error (details logged, not exposed)
    Database { internal: DbErr },

    /// 500 Internal Server Error - any other unexpected failure
    Internal {
        /// Error details (logged, not sent to user)
        internal: String,
    },
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation_failed(errors: Vec<FieldError>) -> Self {
        Self::ValidationFailed { errors }
    }

    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database { internal: err }
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::Internal {
            internal: details.into(),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } | Self::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The sanitized message sent to clients.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { .. } => "Not found".to_string(),
            Self::BadRequest { message } => message.clone(),
            Self::ValidationFailed { errors } => match errors.as_slice() {
                [single] => single.to_string(),
                _ => format!("Validation failed with {} error(s)", errors.len()),
            },
            Self::Database { .. } | Self::Internal { .. } => INTERNAL_MESSAGE.to_string(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal { internal } => {
                tracing::error!(error = %internal, "Internal error occurred");
            }
            Self::NotFound { resource, id } => {
                tracing::debug!(resource = %resource, id = ?id, "Record not found");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

#[derive(Serialize)]
struct ValidationErrorResponse<'a> {
    errors: &'a [FieldError],
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        match &self {
            Self::ValidationFailed { errors } => {
                (status, Json(ValidationErrorResponse { errors })).into_response()
            }
            _ => (status, Json(MessageResponse::failure(self.user_message()))).into_response(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// Every `DbErr` becomes a 500. Missing records are reported by the
/// collection primitives as `Ok(None)` and turned into `NotFound` by the
/// handlers, so a `RecordNotFound` reaching this point is unexpected.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self::database(err)
    }
}
