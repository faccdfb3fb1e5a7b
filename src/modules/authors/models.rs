use bookshelf_db::repository::SqliteQuery;
use bookshelf_db::Entity;
use serde::{Deserialize, Serialize};

use crate::crud::Identified;
use crate::utils::{Checks, Validate};

const NAME_MAX: usize = 50;

/// Persisted author row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Entity for Author {
    const TABLE: &'static str = "authors";
    const COLUMNS: &'static [&'static str] = &["first_name", "last_name"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.first_name.clone())
            .bind(self.last_name.clone())
    }
}

/// Author as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDto {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// Request model for creating an author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateAuthorDto {
    pub first_name: String,
    pub last_name: String,
}

/// Request model for replacing an author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateAuthorDto {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name,
            last_name: author.last_name,
        }
    }
}

impl From<CreateAuthorDto> for Author {
    fn from(dto: CreateAuthorDto) -> Self {
        Self {
            id: 0,
            first_name: dto.first_name,
            last_name: dto.last_name,
        }
    }
}

impl From<UpdateAuthorDto> for Author {
    fn from(dto: UpdateAuthorDto) -> Self {
        Self {
            id: dto.id,
            first_name: dto.first_name,
            last_name: dto.last_name,
        }
    }
}

fn name_checks(first_name: &str, last_name: &str) -> Checks {
    Checks::new()
        .required_text("first_name", first_name, NAME_MAX)
        .required_text("last_name", last_name, NAME_MAX)
}

impl Validate for CreateAuthorDto {
    fn validate(&self) -> Vec<serde_json::Value> {
        name_checks(&self.first_name, &self.last_name).finish()
    }
}

impl Validate for UpdateAuthorDto {
    fn validate(&self) -> Vec<serde_json::Value> {
        name_checks(&self.first_name, &self.last_name)
            .range("id", self.id, 1, i64::MAX)
            .finish()
    }
}

impl Identified for UpdateAuthorDto {
    fn id(&self) -> i64 {
        self.id
    }
}
