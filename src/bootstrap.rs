//! Wiring from settings to a running service.

use anyhow::Context;
use axum::Router;
use bookshelf_db::SqlitePool;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Registry holding every catalog module over `pool`.
pub fn registry(pool: &SqlitePool) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool);
    registry
}

async fn apply_migrations(registry: &ModuleRegistry, pool: &SqlitePool) -> anyhow::Result<usize> {
    let migrations = registry.collect_migrations();
    let applied = bookshelf_db::run_migrations(pool, &migrations)
        .await
        .context("failed to apply migrations")?;

    tracing::info!(
        applied,
        known = migrations.len(),
        "database schema up to date"
    );
    Ok(applied)
}

/// Apply pending migrations and return how many ran.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let pool = bookshelf_db::connect(&settings.database)
        .await
        .context("failed to connect to database")?;

    let applied = apply_migrations(&registry(&pool), &pool).await;
    pool.close().await;
    applied
}

/// Migrated, initialized router over `pool`.
///
/// Migrations always run here; callers hand in a pool they own, typically an
/// in-memory database.
pub async fn build_app(pool: SqlitePool, settings: &Settings) -> anyhow::Result<Router> {
    let registry = registry(&pool);
    apply_migrations(&registry, &pool).await?;

    let ctx = InitCtx { settings };
    registry.init_all(&ctx).await?;

    Ok(bookshelf_http::build_router(&registry, settings))
}

/// `METHOD /path` lines for every documented endpoint.
pub async fn route_table() -> anyhow::Result<Vec<String>> {
    let pool = bookshelf_db::connect_in_memory()
        .await
        .context("failed to open scratch database")?;
    let routes = bookshelf_http::router::route_table(&registry(&pool));
    pool.close().await;
    Ok(routes)
}

/// Connect, migrate, and serve until a shutdown signal arrives.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let pool = bookshelf_db::connect(&settings.database)
        .await
        .context("failed to connect to database")?;

    let registry = registry(&pool);
    if settings.database.run_migrations {
        apply_migrations(&registry, &pool).await?;
    } else {
        tracing::warn!("automatic migrations disabled; assuming schema is current");
    }

    let ctx = InitCtx { settings };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served =
        bookshelf_http::start_server(&registry, settings, bookshelf_http::shutdown_signal()).await;

    registry.stop_all().await?;
    pool.close().await;

    tracing::info!("bookshelf-app stopped");
    served
}
