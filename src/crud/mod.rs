//! Generic REST controller shared by every catalog resource.
//!
//! A [`Resource`] names the route segment, the persisted entity, and the
//! three transfer objects used on the wire. [`routes`] turns that into the
//! five list/get/create/update/delete endpoints; [`ResourceModule`] wraps it
//! as a kernel module with migrations and an OpenAPI fragment.

mod handlers;
mod module;
mod openapi;

use std::sync::Arc;

use axum::{routing::get, Router};
use bookshelf_db::{Entity, Repository};
use bookshelf_kernel::Migration;
use serde::{de::DeserializeOwned, Serialize};

use crate::utils::Validate;

pub use module::ResourceModule;
pub use openapi::fragment;

/// Update payloads carry the id of the row they replace.
pub trait Identified {
    fn id(&self) -> i64;
}

/// Description of one REST resource.
pub trait Resource: Send + Sync + 'static {
    /// Route segment and module name, e.g. `authors`.
    const NAME: &'static str;
    /// Singular noun used in log and error messages.
    const LABEL: &'static str;
    /// OpenAPI schema name of the read DTO, e.g. `Author`.
    const SCHEMA: &'static str;

    type Entity: Entity;
    type Read: Serialize + From<Self::Entity> + Send + 'static;
    type Create: DeserializeOwned + Validate + Into<Self::Entity> + Send + 'static;
    type Update: DeserializeOwned + Validate + Identified + Into<Self::Entity> + Send + 'static;

    /// Schema migrations for the entity table, in apply order.
    fn migrations() -> Vec<Migration>;

    /// JSON schemas for the read, create, and update DTOs.
    fn schemas() -> serde_json::Value;
}

/// Shared handler state: the repository for the resource's entity.
pub struct CrudState<R: Resource> {
    repo: Arc<dyn Repository<R::Entity>>,
}

impl<R: Resource> Clone for CrudState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

/// `/` and `/{id}` routes for one resource, ready to nest under `/api/{NAME}`.
pub fn routes<R: Resource>(repo: Arc<dyn Repository<R::Entity>>) -> Router {
    Router::new()
        .route("/", get(handlers::list::<R>).post(handlers::create::<R>))
        .route(
            "/{id}",
            get(handlers::get::<R>)
                .put(handlers::update::<R>)
                .delete(handlers::delete::<R>),
        )
        .with_state(CrudState::<R> { repo })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::authors::Authors;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use bookshelf_db::SqlRepository;
    use tower::ServiceExt;

    async fn authors_router() -> Router {
        let pool = bookshelf_db::connect_in_memory().await.unwrap();
        let migrations: Vec<_> = Authors::migrations()
            .into_iter()
            .map(|migration| (Authors::NAME, migration))
            .collect();
        bookshelf_db::run_migrations(&pool, &migrations)
            .await
            .unwrap();
        routes::<Authors>(Arc::new(SqlRepository::new(pool)))
    }

    fn request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_sets_location_of_new_row() {
        let response = authors_router()
            .await
            .oneshot(request(
                Method::POST,
                "/",
                r#"{"first_name":"Italo","last_name":"Calvino"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/api/authors/1");
    }

    #[tokio::test]
    async fn update_with_unparseable_path_id_is_bad_request() {
        let response = authors_router()
            .await
            .oneshot(request(
                Method::PUT,
                "/first",
                r#"{"id":1,"first_name":"Italo","last_name":"Calvino"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
