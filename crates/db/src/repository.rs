//! Generic repository over SQLite tables.
//!
//! An [`Entity`] describes one table: its name, its non-key columns, and how
//! to bind a row's values. [`SqlRepository`] turns that description into the
//! list/get/exists/create/update/delete operations shared by every resource.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite, SqlitePool};
use tokio::sync::Mutex;

use crate::Result;

/// Query type handed to [`Entity::bind_columns`].
pub type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// A persisted row type with an integer surrogate key named `id`.
pub trait Entity: for<'r> FromRow<'r, SqliteRow> + Clone + Send + Sync + Unpin + 'static {
    /// Table the entity lives in.
    const TABLE: &'static str;

    /// Non-key columns, in the order [`Entity::bind_columns`] binds them.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// Bind one value per entry of [`Entity::COLUMNS`], in order.
    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;
}

/// A pending write, applied on the next commit.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    Insert(T),
    Update(T),
    Delete(T),
}

/// Persistence operations for one entity type.
///
/// Writes return `true` when the commit touched at least one row. Faults are
/// returned as errors and never retried.
#[async_trait]
pub trait Repository<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Every row, ordered by id. No rows is an empty vec.
    async fn find_all(&self) -> Result<Vec<T>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<T>>;

    async fn does_exist(&self, id: i64) -> Result<bool>;

    /// Insert and commit. On success the generated id is written into `entity`.
    async fn create(&self, entity: &mut T) -> Result<bool>;

    /// Replace the full row with the same id and commit.
    async fn update(&self, entity: &T) -> Result<bool>;

    /// Remove the row with the same id and commit.
    async fn delete(&self, entity: &T) -> Result<bool>;

    /// Queue a change for the next [`Repository::save`].
    async fn stage(&self, change: Change<T>);

    /// Commit staged changes in one transaction.
    async fn save(&self) -> Result<bool>;
}

/// SQL text derived from an [`Entity`] description.
#[derive(Debug, Clone)]
struct Statements {
    select_all: String,
    select_one: String,
    exists: String,
    insert: String,
    update: String,
    delete: String,
}

impl Statements {
    fn for_entity<T: Entity>() -> Self {
        let table = T::TABLE;
        let columns = T::COLUMNS.join(", ");
        let placeholders = vec!["?"; T::COLUMNS.len()].join(", ");
        let assignments = T::COLUMNS
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            select_all: format!("SELECT id, {columns} FROM {table} ORDER BY id"),
            select_one: format!("SELECT id, {columns} FROM {table} WHERE id = ?"),
            exists: format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?)"),
            insert: format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})"),
            update: format!("UPDATE {table} SET {assignments} WHERE id = ?"),
            delete: format!("DELETE FROM {table} WHERE id = ?"),
        }
    }
}

#[derive(Debug, Default)]
struct CommitOutcome {
    rows_affected: u64,
    inserted_ids: Vec<i64>,
}

/// [`Repository`] backed by a SQLite pool.
///
/// `create`, `update` and `delete` each commit only their own change. The
/// queue filled by `stage` is drained by `save` alone, under an async mutex.
pub struct SqlRepository<T> {
    pool: SqlitePool,
    sql: Statements,
    staged: Mutex<Vec<Change<T>>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> SqlRepository<T> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            sql: Statements::for_entity::<T>(),
            staged: Mutex::new(Vec::new()),
            _entity: PhantomData,
        }
    }

    /// Apply `changes` in one transaction. A failure rolls the whole batch back.
    async fn commit(&self, changes: Vec<Change<T>>) -> Result<CommitOutcome> {
        let mut outcome = CommitOutcome::default();
        if changes.is_empty() {
            return Ok(outcome);
        }

        let mut tx = self.pool.begin().await?;
        for change in &changes {
            match change {
                Change::Insert(entity) => {
                    let done = entity
                        .bind_columns(sqlx::query(&self.sql.insert))
                        .execute(&mut *tx)
                        .await?;
                    outcome.rows_affected += done.rows_affected();
                    outcome.inserted_ids.push(done.last_insert_rowid());
                }
                Change::Update(entity) => {
                    let done = entity
                        .bind_columns(sqlx::query(&self.sql.update))
                        .bind(entity.id())
                        .execute(&mut *tx)
                        .await?;
                    outcome.rows_affected += done.rows_affected();
                }
                Change::Delete(entity) => {
                    let done = sqlx::query(&self.sql.delete)
                        .bind(entity.id())
                        .execute(&mut *tx)
                        .await?;
                    outcome.rows_affected += done.rows_affected();
                }
            }
        }
        tx.commit().await?;

        tracing::debug!(
            table = T::TABLE,
            changes = changes.len(),
            rows = outcome.rows_affected,
            "committed changes"
        );

        Ok(outcome)
    }

    async fn commit_one(&self, change: Change<T>) -> Result<CommitOutcome> {
        self.commit(vec![change]).await
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for SqlRepository<T> {
    async fn find_all(&self) -> Result<Vec<T>> {
        let rows = sqlx::query_as::<_, T>(&self.sql.select_all)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<T>> {
        let row = sqlx::query_as::<_, T>(&self.sql.select_one)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn does_exist(&self, id: i64) -> Result<bool> {
        let found: i64 = sqlx::query_scalar(&self.sql.exists)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(found != 0)
    }

    async fn create(&self, entity: &mut T) -> Result<bool> {
        let outcome = self.commit_one(Change::Insert(entity.clone())).await?;
        if let Some(id) = outcome.inserted_ids.last() {
            entity.set_id(*id);
        }
        Ok(outcome.rows_affected > 0)
    }

    async fn update(&self, entity: &T) -> Result<bool> {
        let outcome = self.commit_one(Change::Update(entity.clone())).await?;
        Ok(outcome.rows_affected > 0)
    }

    async fn delete(&self, entity: &T) -> Result<bool> {
        let outcome = self.commit_one(Change::Delete(entity.clone())).await?;
        Ok(outcome.rows_affected > 0)
    }

    async fn stage(&self, change: Change<T>) {
        self.staged.lock().await.push(change);
    }

    async fn save(&self) -> Result<bool> {
        let mut staged = self.staged.lock().await;
        let outcome = self.commit(std::mem::take(&mut *staged)).await?;
        Ok(outcome.rows_affected > 0)
    }
}
