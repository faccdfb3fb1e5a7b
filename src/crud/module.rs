use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use bookshelf_db::{Repository, SqlRepository, SqlitePool};
use bookshelf_kernel::{InitCtx, Migration, Module};

use super::Resource;

/// Kernel module serving one [`Resource`] under `/api/{NAME}`.
pub struct ResourceModule<R: Resource> {
    repo: Arc<dyn Repository<R::Entity>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceModule<R> {
    /// Module backed by the SQL repository over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_repository(Arc::new(SqlRepository::<R::Entity>::new(pool)))
    }

    /// Module backed by an arbitrary repository implementation.
    pub fn with_repository(repo: Arc<dyn Repository<R::Entity>>) -> Self {
        Self {
            repo,
            _resource: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Resource> Module for ResourceModule<R> {
    fn name(&self) -> &'static str {
        R::NAME
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "{} module initialized",
            R::NAME
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        let health = format!("{} module is healthy", R::NAME);
        Router::new()
            .route("/health", get(move || async move { health }))
            .merge(super::routes::<R>(self.repo.clone()))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(super::fragment::<R>())
    }

    fn migrations(&self) -> Vec<Migration> {
        R::migrations()
    }
}
