use std::sync::Arc;

use anyhow::Result;
use mailform_contact::{Command, SqliteStore, Store};
use mailform_notification::{ContactNotifier, EmailService};

use crate::{config::Config, routes::AppState};

/// Wire the store and SMTP notifier from configuration
pub async fn build_state(config: Config) -> Result<AppState> {
    let pool = if config.database.enabled {
        let pool = crate::db::create_pool(&config.database.url).await?;
        crate::migrate::run_migrations(&pool).await?;
        Some(pool)
    } else {
        tracing::warn!("Persistence disabled, submissions will only be emailed");
        None
    };

    let email_service = EmailService::new(&config.email)?;
    let notifier = ContactNotifier::new(email_service, &config.email, &config.app.name)?;

    let store = pool
        .clone()
        .map(|pool| Arc::new(SqliteStore(pool)) as Arc<dyn Store>);

    Ok(AppState {
        contact_command: Command::new(store, Arc::new(notifier)),
        config,
        pool,
    })
}

pub async fn serve(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting mailform server...");

    // Use CLI overrides if provided, otherwise use config
    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    let state = build_state(config).await?;
    let pool = state.pool.clone();
    let app = crate::routes::router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        tracing::info!("Closing database pool...");
        pool.close().await;
    }

    tracing::info!("Graceful shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Starting graceful shutdown...");
}
