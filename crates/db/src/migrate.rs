//! Applies module migrations once, tracking them in `_migrations`.

use bookshelf_kernel::Migration;
use sqlx::SqlitePool;

use crate::{DbError, Result};

const TRACKING_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    )
"#;

/// Apply every migration not yet recorded, in the order given.
///
/// Each migration runs in its own transaction together with its tracking row.
/// Returns how many migrations were applied by this call.
pub async fn run_migrations(pool: &SqlitePool, migrations: &[(&str, Migration)]) -> Result<usize> {
    sqlx::query(TRACKING_TABLE).execute(pool).await?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let done: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM _migrations WHERE module = ? AND id = ?")
                .bind(*module)
                .bind(migration.id)
                .fetch_one(pool)
                .await?;

        if done > 0 {
            tracing::debug!(module, migration = migration.id, "migration already applied");
            continue;
        }

        apply(pool, module, migration)
            .await
            .map_err(|source| DbError::Migration {
                module: module.to_string(),
                id: migration.id.to_string(),
                source,
            })?;

        tracing::info!(module, migration = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}

async fn apply(pool: &SqlitePool, module: &str, migration: &Migration) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::raw_sql(migration.up).execute(&mut *tx).await?;
    sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
        .bind(module)
        .bind(migration.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect_in_memory;

    fn notes() -> Vec<(&'static str, Migration)> {
        vec![
            (
                "notes",
                Migration {
                    id: "001_init",
                    up: "CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT NOT NULL);",
                },
            ),
            (
                "notes",
                Migration {
                    id: "002_index",
                    up: "CREATE INDEX notes_body ON notes (body);",
                },
            ),
        ]
    }

    #[tokio::test]
    async fn applies_each_migration_once() {
        let pool = connect_in_memory().await.unwrap();

        assert_eq!(run_migrations(&pool, &notes()).await.unwrap(), 2);
        assert_eq!(run_migrations(&pool, &notes()).await.unwrap(), 0);

        let recorded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(recorded, 2);
    }

    #[tokio::test]
    async fn failed_migration_is_not_recorded() {
        let pool = connect_in_memory().await.unwrap();
        let broken = vec![(
            "broken",
            Migration {
                id: "001_init",
                up: "CREATE TABLE oops (;",
            },
        )];

        let err = run_migrations(&pool, &broken).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Migration { ref module, ref id, .. } if module == "broken" && id == "001_init"
        ));

        let recorded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(recorded, 0);
    }
}
