use bookshelf_db::repository::SqliteQuery;
use bookshelf_db::Entity;
use serde::{Deserialize, Serialize};

use crate::crud::Identified;
use crate::utils::{Checks, Validate};

const TITLE_MAX: usize = 50;
const ISBN_MAX: usize = 50;
const SUMMARY_MAX: usize = 250;
const IMAGE_URL_MAX: usize = 250;

/// Persisted book row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub isbn: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    /// Foreign key to `authors.id`; cleared when the author is deleted.
    pub author_id: Option<i64>,
}

impl Entity for Book {
    const TABLE: &'static str = "books";
    const COLUMNS: &'static [&'static str] =
        &["title", "year", "isbn", "summary", "image_url", "author_id"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.title.clone())
            .bind(self.year)
            .bind(self.isbn.clone())
            .bind(self.summary.clone())
            .bind(self.image_url.clone())
            .bind(self.author_id)
    }
}

/// Book as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDto {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub isbn: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub author_id: Option<i64>,
}

/// Request model for creating a book.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateBookDto {
    pub title: String,
    pub year: i32,
    pub isbn: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub author_id: Option<i64>,
}

/// Request model for replacing a book.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateBookDto {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub isbn: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub author_id: Option<i64>,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            year: book.year,
            isbn: book.isbn,
            summary: book.summary,
            image_url: book.image_url,
            author_id: book.author_id,
        }
    }
}

impl From<CreateBookDto> for Book {
    fn from(dto: CreateBookDto) -> Self {
        Self {
            id: 0,
            title: dto.title,
            year: dto.year,
            isbn: dto.isbn,
            summary: dto.summary,
            image_url: dto.image_url,
            author_id: dto.author_id,
        }
    }
}

impl From<UpdateBookDto> for Book {
    fn from(dto: UpdateBookDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            year: dto.year,
            isbn: dto.isbn,
            summary: dto.summary,
            image_url: dto.image_url,
            author_id: dto.author_id,
        }
    }
}

fn book_checks(
    title: &str,
    year: i32,
    isbn: Option<&str>,
    summary: Option<&str>,
    image_url: Option<&str>,
    author_id: Option<i64>,
) -> Checks {
    Checks::new()
        .required_text("title", title, TITLE_MAX)
        .range("year", i64::from(year), 1, 9999)
        .optional_text("isbn", isbn, ISBN_MAX)
        .optional_text("summary", summary, SUMMARY_MAX)
        .optional_text("image_url", image_url, IMAGE_URL_MAX)
        .optional_id("author_id", author_id)
}

impl Validate for CreateBookDto {
    fn validate(&self) -> Vec<serde_json::Value> {
        book_checks(
            &self.title,
            self.year,
            self.isbn.as_deref(),
            self.summary.as_deref(),
            self.image_url.as_deref(),
            self.author_id,
        )
        .finish()
    }
}

impl Validate for UpdateBookDto {
    fn validate(&self) -> Vec<serde_json::Value> {
        book_checks(
            &self.title,
            self.year,
            self.isbn.as_deref(),
            self.summary.as_deref(),
            self.image_url.as_deref(),
            self.author_id,
        )
        .range("id", self.id, 1, i64::MAX)
        .finish()
    }
}

impl Identified for UpdateBookDto {
    fn id(&self) -> i64 {
        self.id
    }
}
