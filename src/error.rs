//! Error types for the Libretto server

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use validator::ValidationErrors;

/// A single failed validation rule, keyed by the field that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Per-field validation messages, in form declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

/// Field order of the book form; errors are reported in this order so
/// re-rendered forms list them predictably.
const FIELD_ORDER: &[&str] = &["title", "author", "genre", "year"];

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let by_field = errors.field_errors();
        let mut out = Vec::new();

        for &field in FIELD_ORDER {
            let Some(list) = by_field.get(field) else {
                continue;
            };
            for error in list.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for \"{}\"", field));
                out.push(FieldError {
                    field: field.to_string(),
                    message,
                });
            }
        }

        FieldErrors(out)
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// The catalog's standard message for a book that is not on the shelf.
    pub fn book_not_found() -> Self {
        AppError::NotFound("I do not have that book".to_string())
    }
}

/// Every handler returns [`AppResult`], so any failure that escapes one
/// lands here and renders the shared error page. Validation failures are
/// normally intercepted by the form handlers so the form can be re-shown;
/// one that slips through gets the error page too.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(errors) => (StatusCode::NOT_FOUND, errors.to_string()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong on our side".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong on our side".to_string(),
                )
            }
        };

        let body = Html(crate::web::views::error_page(&message));
        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
