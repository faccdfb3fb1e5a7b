pub mod models;

use std::sync::Arc;

use bookshelf_db::SqlitePool;
use bookshelf_kernel::{Migration, Module};
use serde_json::json;

use crate::crud::{Resource, ResourceModule};
use models::{Author, AuthorDto, CreateAuthorDto, UpdateAuthorDto};

/// The `/api/authors` resource.
pub struct Authors;

impl Resource for Authors {
    const NAME: &'static str = "authors";
    const LABEL: &'static str = "author";
    const SCHEMA: &'static str = "Author";

    type Entity = Author;
    type Read = AuthorDto;
    type Create = CreateAuthorDto;
    type Update = UpdateAuthorDto;

    fn migrations() -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE authors (
                    id         INTEGER PRIMARY KEY AUTOINCREMENT,
                    first_name TEXT NOT NULL CHECK (length(first_name) <= 50),
                    last_name  TEXT NOT NULL CHECK (length(last_name) <= 50)
                );
                "#,
        }]
    }

    fn schemas() -> serde_json::Value {
        let name = |description: &str| {
            json!({ "type": "string", "maxLength": 50, "description": description })
        };

        json!({
            "Author": {
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "format": "int64" },
                    "first_name": name("Given name"),
                    "last_name": name("Family name")
                },
                "required": ["id", "first_name", "last_name"]
            },
            "CreateAuthor": {
                "type": "object",
                "properties": {
                    "first_name": name("Given name"),
                    "last_name": name("Family name")
                },
                "required": ["first_name", "last_name"]
            },
            "UpdateAuthor": {
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "format": "int64", "description": "Must match the path id" },
                    "first_name": name("Given name"),
                    "last_name": name("Family name")
                },
                "required": ["id", "first_name", "last_name"]
            }
        })
    }
}

/// Create the authors module over `pool`
pub fn create_module(pool: SqlitePool) -> Arc<dyn Module> {
    Arc::new(ResourceModule::<Authors>::new(pool))
}
