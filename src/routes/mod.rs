use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{AllowedHosts, host_allowlist_middleware};

mod contact;
mod health;
mod index;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub contact_command: mailform_contact::Command,
    /// `None` when persistence is disabled
    pub pool: Option<SqlitePool>,
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        tracing::warn!("No CORS origins configured, cross-origin requests will be refused");
        return None;
    }

    let origins = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true),
    )
}

pub fn router(app_state: AppState) -> Router {
    let allowed_hosts = AllowedHosts::new(&app_state.config.server.allowed_hosts);
    if allowed_hosts.0.is_empty() {
        tracing::warn!("No allowed hosts configured, host header check disabled");
    }

    let cors = cors_layer(&app_state.config.server.cors_allowed_origins);

    let mut router = Router::new()
        // Health check endpoints (exempt from host check)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/", get(index::page))
        .route("/api/contact/", post(contact::action))
        .route("/api/contact", post(contact::action))
        .with_state(app_state);

    if let Some(cors) = cors {
        router = router.layer(cors);
    }

    router
        .layer(axum::middleware::from_fn_with_state(
            allowed_hosts,
            host_allowlist_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}
