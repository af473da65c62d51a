use crate::database::DbError;
use crate::mailer::MailError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("No email address on file")]
    NoEmailOnFile,

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("internal error")]
    Internal(#[from] eyre::Report),
}

fn log_error(error: &SettingsError) {
    match error {
        SettingsError::Database(e) => warn!("Database query failed: {}", e),
        SettingsError::InvalidSelection(message) => {
            warn!("Settings -> Invalid selection: {}", message);
        }
        SettingsError::NoEmailOnFile => warn!("Settings -> No email address on file"),
        SettingsError::UnknownUser(user_id) => warn!("Settings -> Unknown user: {}", user_id),
        SettingsError::Mail(e) => warn!("Settings -> Mail error: {}", e),
        SettingsError::Internal(e) => warn!("Internal error: {:?}", e),
    }
}

impl IntoResponse for SettingsError {
    fn into_response(self) -> Response {
        log_error(&self);

        let (status, error_message) = match self {
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database error occurred.".to_string(),
            ),
            Self::InvalidSelection(message) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid selection: {message}"),
            ),
            Self::NoEmailOnFile => (
                StatusCode::BAD_REQUEST,
                "No email address is set for this user.".to_string(),
            ),
            Self::UnknownUser(user_id) => {
                (StatusCode::NOT_FOUND, format!("User not found: {user_id}"))
            }
            Self::Mail(message) => (
                StatusCode::BAD_GATEWAY,
                format!("Could not send email: {message}"),
            ),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected internal error occurred.".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<DbError> for SettingsError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(sql_err) => Self::Database(sql_err),
            DbError::SerdeJson(err) => Self::Internal(eyre::Report::new(err)),
        }
    }
}
