pub mod models;

use std::sync::Arc;

use bookshelf_db::SqlitePool;
use bookshelf_kernel::{Migration, Module};
use serde_json::json;

use crate::crud::{Resource, ResourceModule};
use models::{Book, BookDto, CreateBookDto, UpdateBookDto};

/// The `/api/books` resource.
pub struct Books;

fn book_properties() -> serde_json::Value {
    let text = |max: u32, description: &str| {
        json!({ "type": ["string", "null"], "maxLength": max, "description": description })
    };

    json!({
        "title": { "type": "string", "maxLength": 50, "description": "Title of the book" },
        "year": { "type": "integer", "format": "int32", "minimum": 1, "maximum": 9999 },
        "isbn": text(50, "ISBN, if known"),
        "summary": text(250, "Short description"),
        "image_url": text(250, "Cover image URL"),
        "author_id": {
            "type": ["integer", "null"],
            "format": "int64",
            "description": "Identifier of an existing author"
        }
    })
}

impl Resource for Books {
    const NAME: &'static str = "books";
    const LABEL: &'static str = "book";
    const SCHEMA: &'static str = "Book";

    type Entity = Book;
    type Read = BookDto;
    type Create = CreateBookDto;
    type Update = UpdateBookDto;

    fn migrations() -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE books (
                    id        INTEGER PRIMARY KEY AUTOINCREMENT,
                    title     TEXT    NOT NULL CHECK (length(title) <= 50),
                    year      INTEGER NOT NULL,
                    isbn      TEXT,
                    summary   TEXT,
                    image_url TEXT,
                    author_id INTEGER REFERENCES authors (id) ON DELETE SET NULL
                );
                CREATE INDEX books_author_id ON books (author_id);
                "#,
        }]
    }

    fn schemas() -> serde_json::Value {
        let id = json!({ "type": "integer", "format": "int64" });

        let mut read = book_properties();
        read["id"] = id.clone();
        let mut update = book_properties();
        update["id"] = id;

        json!({
            "Book": {
                "type": "object",
                "properties": read,
                "required": ["id", "title", "year"]
            },
            "CreateBook": {
                "type": "object",
                "properties": book_properties(),
                "required": ["title", "year"]
            },
            "UpdateBook": {
                "type": "object",
                "properties": update,
                "required": ["id", "title", "year"]
            }
        })
    }
}

/// Create the books module over `pool`
pub fn create_module(pool: SqlitePool) -> Arc<dyn Module> {
    Arc::new(ResourceModule::<Books>::new(pool))
}
