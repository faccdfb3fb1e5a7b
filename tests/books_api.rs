use axum::http::StatusCode;
use bookshelf_app::modules::books::models::BookDto;
use serde_json::{json, Value};

mod support;

use support::test_server;

#[tokio::test]
async fn list_on_empty_store_is_ok_and_empty() {
    let server = test_server().await;

    let response = server.get("/api/books").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Vec<BookDto>>(), vec![]);
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let server = test_server().await;

    let response = server
        .post("/api/books")
        .json(&json!({ "title": "Dune", "year": 1965 }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let created: BookDto = response.json();
    assert!(created.id >= 1);
    assert_eq!(created.title, "Dune");
    assert_eq!(created.year, 1965);
    assert_eq!(
        response.header("location").to_str().unwrap(),
        format!("/api/books/{}", created.id)
    );

    let fetched = server.get(&format!("/api/books/{}", created.id)).await;
    fetched.assert_status_ok();
    assert_eq!(fetched.json::<BookDto>(), created);
}

#[tokio::test]
async fn create_keeps_every_field() {
    let server = test_server().await;
    let author = server
        .post("/api/authors")
        .json(&json!({ "first_name": "Frank", "last_name": "Herbert" }))
        .await;
    let author_id = author.json::<Value>()["id"].as_i64().unwrap();

    let input = json!({
        "title": "Children of Dune",
        "year": 1976,
        "isbn": "978-0-441-10402-1",
        "summary": "Third novel in the series.",
        "image_url": "https://covers.example/children.jpg",
        "author_id": author_id
    });
    let created: Value = server.post("/api/books").json(&input).await.json();

    let fetched: Value = server
        .get(&format!("/api/books/{}", created["id"]))
        .await
        .json();
    for field in ["title", "year", "isbn", "summary", "image_url", "author_id"] {
        assert_eq!(fetched[field], input[field], "field {field}");
    }
}

#[tokio::test]
async fn create_stores_text_exactly_as_sent() {
    let server = test_server().await;

    let input = json!({ "title": " Dune ", "year": 1965, "isbn": "", "summary": null });
    let created: Value = server.post("/api/books").json(&input).await.json();

    let fetched: Value = server
        .get(&format!("/api/books/{}", created["id"]))
        .await
        .json();
    assert_eq!(fetched, created);
    for field in ["title", "year", "isbn", "summary"] {
        assert_eq!(fetched[field], input[field], "field {field}");
    }
}

#[tokio::test]
async fn list_returns_rows_in_id_order() {
    let server = test_server().await;
    for (title, year) in [("Dune", 1965), ("Hyperion", 1989)] {
        server
            .post("/api/books")
            .json(&json!({ "title": title, "year": year }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let books: Vec<BookDto> = server.get("/api/books").await.json();
    let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Dune", "Hyperion"]);
}

#[tokio::test]
async fn create_rejects_null_malformed_and_invalid_bodies() {
    let server = test_server().await;

    server
        .post("/api/books")
        .json(&Value::Null)
        .await
        .assert_status_bad_request();

    server
        .post("/api/books")
        .text("{\"title\": ")
        .content_type("application/json")
        .await
        .assert_status_bad_request();

    let invalid = server
        .post("/api/books")
        .json(&json!({ "title": "", "year": 0 }))
        .await;
    invalid.assert_status_bad_request();
    let body: Value = invalid.json();
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"].as_array().unwrap().len(), 2);

    let books: Vec<BookDto> = server.get("/api/books").await.json();
    assert!(books.is_empty());
}

#[tokio::test]
async fn create_with_unknown_author_is_a_server_fault() {
    let server = test_server().await;

    let response = server
        .post("/api/books")
        .json(&json!({ "title": "Orphan", "year": 2001, "author_id": 99 }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("database operation failed"), "{message}");
    assert!(message.contains("FOREIGN KEY"), "{message}");
}

#[tokio::test]
async fn get_missing_or_malformed_id() {
    let server = test_server().await;

    server.get("/api/books/42").await.assert_status_not_found();
    server.get("/api/books/0").await.assert_status_not_found();
    server.get("/api/books/dune").await.assert_status_bad_request();
}

#[tokio::test]
async fn update_replaces_the_row() {
    let server = test_server().await;
    let created: BookDto = server
        .post("/api/books")
        .json(&json!({ "title": "Dune", "year": 1964, "isbn": "0-441-17271-7" }))
        .await
        .json();

    server
        .put(&format!("/api/books/{}", created.id))
        .json(&json!({ "id": created.id, "title": "Dune", "year": 1965 }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let fetched: BookDto = server
        .get(&format!("/api/books/{}", created.id))
        .await
        .json();
    assert_eq!(fetched.year, 1965);
    assert_eq!(fetched.isbn, None);
}

#[tokio::test]
async fn update_with_mismatched_id_changes_nothing() {
    let server = test_server().await;
    let created: BookDto = server
        .post("/api/books")
        .json(&json!({ "title": "Dune", "year": 1965 }))
        .await
        .json();

    server
        .put(&format!("/api/books/{}", created.id))
        .json(&json!({ "id": created.id + 1, "title": "Messiah", "year": 1969 }))
        .await
        .assert_status_bad_request();

    let fetched: BookDto = server
        .get(&format!("/api/books/{}", created.id))
        .await
        .json();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn update_rejects_bad_preconditions() {
    let server = test_server().await;

    server
        .put("/api/books/0")
        .json(&json!({ "id": 0, "title": "Dune", "year": 1965 }))
        .await
        .assert_status_bad_request();

    server
        .put("/api/books/1")
        .json(&Value::Null)
        .await
        .assert_status_bad_request();

    server
        .put("/api/books/1")
        .json(&json!({ "id": 1, "title": "", "year": 1965 }))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn update_of_missing_row_has_no_effect() {
    let server = test_server().await;

    let response = server
        .put("/api/books/7")
        .json(&json!({ "id": 7, "title": "Ghost", "year": 2000 }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["error"]["code"], "no_effect");
}

#[tokio::test]
async fn delete_twice_is_no_content_then_not_found() {
    let server = test_server().await;
    let created: BookDto = server
        .post("/api/books")
        .json(&json!({ "title": "Dune", "year": 1965 }))
        .await
        .json();
    let path = format!("/api/books/{}", created.id);

    server
        .delete(&path)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server.delete(&path).await.assert_status_not_found();
    server.get(&path).await.assert_status_not_found();
}

#[tokio::test]
async fn delete_rejects_non_positive_id() {
    let server = test_server().await;

    server.delete("/api/books/0").await.assert_status_bad_request();
    server.delete("/api/books/-3").await.assert_status_bad_request();
    server.delete("/api/books/99").await.assert_status_not_found();
}
