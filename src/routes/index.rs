use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::routes::AppState;

pub async fn page(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": format!("Welcome to {} API", app_state.config.app.name)
    }))
}
