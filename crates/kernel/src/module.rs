use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// Handed to every module hook that runs before serving.
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// One schema change owned by a module.
///
/// `id` is unique within the module and recorded once applied; `up` may hold
/// several statements.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// A unit of the catalog: a table, its endpoints, and its API description.
#[async_trait]
pub trait Module: Sync + Send {
    /// Route segment under `/api/`, and the key migrations are tracked by.
    fn name(&self) -> &'static str;

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Routes relative to `/api/{name}`.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI `paths` and `components` with paths relative to the mount
    /// point. Merged into the service-wide document.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Applied in the order returned, after those of earlier-registered
    /// modules.
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Runs once the schema is current and before the listener binds.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
