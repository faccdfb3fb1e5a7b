//! Status mapping when the repository reports no effect or fails outright.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use bookshelf_app::modules::books::{models::Book, Books};
use bookshelf_db::{Change, DbError, Repository, SqlxError};
use serde_json::{json, Value};

mod support;

use support::server_with_repository;

#[derive(Clone, Copy)]
enum Mode {
    /// Reads find book 1; every write changes nothing.
    NoEffect,
    /// Every call fails.
    Broken,
    /// Lookups find nothing; `does_exist` fails.
    Empty,
}

struct FakeBooks {
    mode: Mode,
}

impl FakeBooks {
    fn shared(mode: Mode) -> Arc<dyn Repository<Book>> {
        Arc::new(Self { mode })
    }

    fn fail<T>(&self) -> Result<T, DbError> {
        Err(DbError::Query(SqlxError::PoolClosed))
    }

    fn book() -> Book {
        Book {
            id: 1,
            title: "Dune".to_string(),
            year: 1965,
            isbn: None,
            summary: None,
            image_url: None,
            author_id: None,
        }
    }
}

#[async_trait]
impl Repository<Book> for FakeBooks {
    async fn find_all(&self) -> Result<Vec<Book>, DbError> {
        match self.mode {
            Mode::NoEffect => Ok(vec![Self::book()]),
            Mode::Empty => Ok(Vec::new()),
            Mode::Broken => self.fail(),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, DbError> {
        match self.mode {
            Mode::NoEffect => Ok((id == 1).then(Self::book)),
            Mode::Empty => Ok(None),
            Mode::Broken => self.fail(),
        }
    }

    async fn does_exist(&self, id: i64) -> Result<bool, DbError> {
        match self.mode {
            Mode::NoEffect => Ok(id == 1),
            Mode::Empty | Mode::Broken => self.fail(),
        }
    }

    async fn create(&self, _entity: &mut Book) -> Result<bool, DbError> {
        self.write()
    }

    async fn update(&self, _entity: &Book) -> Result<bool, DbError> {
        self.write()
    }

    async fn delete(&self, _entity: &Book) -> Result<bool, DbError> {
        self.write()
    }

    async fn stage(&self, _change: Change<Book>) {}

    async fn save(&self) -> Result<bool, DbError> {
        self.write()
    }
}

impl FakeBooks {
    fn write(&self) -> Result<bool, DbError> {
        match self.mode {
            Mode::NoEffect | Mode::Empty => Ok(false),
            Mode::Broken => self.fail(),
        }
    }
}

fn dune() -> Value {
    json!({ "id": 1, "title": "Dune", "year": 1965 })
}

#[tokio::test]
async fn writes_without_effect_are_server_errors() {
    let server = server_with_repository::<Books>(FakeBooks::shared(Mode::NoEffect));

    let created = server.post("/api/books").json(&dune()).await;
    created.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = created.json();
    assert_eq!(body["error"]["code"], "no_effect");
    assert_eq!(body["error"]["message"], "failed to create book");

    server
        .put("/api/books/1")
        .json(&dune())
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    server
        .delete("/api/books/1")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    server.delete("/api/books/2").await.assert_status_not_found();
}

#[tokio::test]
async fn repository_faults_surface_message_and_cause() {
    let server = server_with_repository::<Books>(FakeBooks::shared(Mode::Broken));

    let checks = [
        server.get("/api/books").await,
        server.get("/api/books/1").await,
        server.post("/api/books").json(&dune()).await,
        server.put("/api/books/1").json(&dune()).await,
        server.delete("/api/books/1").await,
    ];

    for response in checks {
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "internal_error");
        assert_eq!(
            body["error"]["message"],
            format!(
                "database operation failed: {}",
                SqlxError::PoolClosed
            )
        );
    }
}

#[tokio::test]
async fn preconditions_are_checked_before_the_repository() {
    let server = server_with_repository::<Books>(FakeBooks::shared(Mode::Broken));

    server
        .post("/api/books")
        .json(&json!({ "title": "" }))
        .await
        .assert_status_bad_request();
    server
        .put("/api/books/2")
        .json(&dune())
        .await
        .assert_status_bad_request();
    server.delete("/api/books/0").await.assert_status_bad_request();
}

#[tokio::test]
async fn delete_of_missing_row_needs_only_one_lookup() {
    let server = server_with_repository::<Books>(FakeBooks::shared(Mode::Empty));

    let response = server.delete("/api/books/5").await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"]["code"], "not_found");
}
