use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mailform_contact::Error as ContactError;
use serde::Serialize;
use thiserror::Error;

#[derive(Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    pub message: String,
}

impl StatusBody {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid submission format: {0}")]
    BadRequestFormat(String),

    #[error(transparent)]
    Contact(#[from] ContactError),

    #[error("Invalid host header: {0}")]
    InvalidHost(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequestFormat(rejection.body_text())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequestFormat(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            AppError::BadRequestFormat(reason) => {
                tracing::warn!(%reason, "Rejected malformed submission");
                (StatusCode::BAD_REQUEST, "Invalid submission format.")
            }
            AppError::InvalidHost(host) => {
                tracing::warn!(%host, "Rejected request with disallowed host header");
                (StatusCode::BAD_REQUEST, "Invalid host header.")
            }
            AppError::Contact(ContactError::MissingFields) => {
                (StatusCode::BAD_REQUEST, "Missing required fields.")
            }
            AppError::Contact(ContactError::Validate(errors)) => {
                tracing::warn!(fields = ?errors.field_errors().keys().collect::<Vec<_>>(), "Rejected invalid submission");

                if errors.field_errors().contains_key("email") {
                    (StatusCode::BAD_REQUEST, "Invalid email address.")
                } else {
                    (StatusCode::BAD_REQUEST, "Invalid submission.")
                }
            }
            AppError::Contact(ContactError::Persistence(e)) => {
                tracing::error!("Persistence error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to save your submission.",
                )
            }
            AppError::Contact(ContactError::Dispatch(e)) => {
                tracing::error!("Dispatch error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send your message.",
                )
            }
        };

        (status_code, Json(StatusBody::error(message))).into_response()
    }
}
