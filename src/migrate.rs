//! Database migration utilities

use sqlx::{SqlitePool, migrate::MigrateDatabase};
use sqlx_migrator::{Migrate, Plan};

use crate::config::Config;

/// Apply every pending migration on `pool`
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    let mut conn = pool.acquire().await?;
    mailform_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(())
}

/// Create the database if needed and run migrations
#[tracing::instrument(skip(config))]
pub async fn migrate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Running database migrations...");

    let pool = crate::db::create_pool(&config.database.url).await?;
    run_migrations(&pool).await?;
    pool.close().await;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

/// Drop database if exists and recreate with migrations
#[tracing::instrument(skip(config))]
pub async fn reset(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Resetting database...");

    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}
