#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use bookshelf_app::crud::{Resource, ResourceModule};
use bookshelf_db::Repository;
use bookshelf_kernel::{settings::Settings, ModuleRegistry};

/// Server over a fresh, migrated in-memory database.
pub async fn test_server() -> TestServer {
    let pool = bookshelf_db::connect_in_memory().await.unwrap();
    let router = bookshelf_app::build_app(pool, &Settings::default())
        .await
        .unwrap();
    TestServer::new(router).unwrap()
}

/// Server exposing only `R`, backed by the given repository.
pub fn server_with_repository<R: Resource>(repo: Arc<dyn Repository<R::Entity>>) -> TestServer {
    let mut registry = ModuleRegistry::new();
    registry.register(Arc::new(ResourceModule::<R>::with_repository(repo)));
    let router = bookshelf_http::build_router(&registry, &Settings::default());
    TestServer::new(router).unwrap()
}
