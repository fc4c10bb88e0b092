use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use mailform_contact::{Outcome, SubmitFormInput};
use serde_json::{Map, Value};

use crate::{
    error::{AppError, StatusBody},
    routes::AppState,
};

/// POST /api/contact/
///
/// The body must be a JSON object; arrays and scalars are a format error.
pub async fn action(
    State(app_state): State<AppState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<StatusBody>, AppError> {
    let Json(body) = body?;
    let input: SubmitFormInput = serde_json::from_value(Value::Object(body))?;

    let message = match app_state.contact_command.submit_form(input).await? {
        Outcome::Stored { .. } => "Message received and stored successfully!",
        Outcome::Sent => "Message sent successfully!",
    };

    Ok(Json(StatusBody::success(message)))
}
