//! # Database Migration Management
//!
//! Handles schema evolution using SQL migrations embedded in the binary and
//! executed automatically on startup when auto_migrate is enabled. Applied
//! versions are tracked in a dedicated table so reruns are no-ops.

use sqlx::Row;
use tracing::{error, info};

use crate::errors::{Error, Result};
use crate::storage::DbPool;

/// Embedded migrations, ordered by version. The version is the leading
/// timestamp of the filename under `migrations/`.
const MIGRATIONS: &[(&str, &str)] = &[(
    "20250301000001_initial_schema",
    include_str!("../../migrations/20250301000001_initial_schema.sql"),
)];

/// Run all pending database migrations
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    info!("Starting database migration process");

    create_migration_table(pool).await?;
    let applied = get_applied_migration_versions(pool).await?;

    let mut migrations_run = 0;
    for (filename, sql) in MIGRATIONS {
        let version = extract_version_from_filename(filename)?;

        if applied.contains(&version) {
            continue;
        }

        info!(version = version, "Running migration: {}", filename);
        let start_time = std::time::Instant::now();

        let mut tx = pool
            .begin()
            .await
            .map_err(|e| Error::database(e, "Failed to start migration transaction"))?;

        // raw_sql supports multi-statement migration files
        sqlx::raw_sql(sql).execute(&mut *tx).await.map_err(|e| {
            error!(error = %e, migration = filename, "Migration failed");
            Error::database(e, format!("Migration failed: {}", filename))
        })?;

        let execution_time = start_time.elapsed().as_millis() as i64;
        sqlx::query(
            "INSERT INTO _keygate_migrations (version, description, execution_time, installed_on) VALUES ($1, $2, $3, $4)",
        )
        .bind(version)
        .bind(filename)
        .bind(execution_time)
        .bind(chrono::Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::database(e, format!("Failed to record migration: {}", filename)))?;

        tx.commit()
            .await
            .map_err(|e| Error::database(e, "Failed to commit migration transaction"))?;

        migrations_run += 1;
        info!(version = version, execution_time_ms = execution_time, "Migration completed");
    }

    if migrations_run > 0 {
        info!(count = migrations_run, "Database migrations completed");
    } else {
        info!("No pending migrations");
    }

    Ok(())
}

/// Create the migration tracking table
async fn create_migration_table(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _keygate_migrations (
            version BIGINT PRIMARY KEY,
            description TEXT NOT NULL,
            execution_time BIGINT NOT NULL,
            installed_on TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| Error::database(e, "Failed to create migration tracking table"))?;

    Ok(())
}

/// Get list of applied migration versions
async fn get_applied_migration_versions(pool: &DbPool) -> Result<Vec<i64>> {
    let rows = sqlx::query("SELECT version FROM _keygate_migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .map_err(|e| Error::database(e, "Failed to get applied migrations"))?;

    Ok(rows.into_iter().map(|row| row.get::<i64, _>("version")).collect())
}

/// Extract version number from migration filename
fn extract_version_from_filename(filename: &str) -> Result<i64> {
    let version_str = filename
        .split('_')
        .next()
        .ok_or_else(|| Error::validation(format!("Invalid migration filename: {}", filename)))?;

    version_str
        .parse::<i64>()
        .map_err(|_| Error::validation(format!("Invalid version in filename: {}", filename)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[test]
    fn version_extraction() {
        assert_eq!(
            extract_version_from_filename("20250301000001_initial_schema").unwrap(),
            20250301000001
        );
        assert!(extract_version_from_filename("not-a-version").is_err());
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("create pool");

        run_migrations(&pool).await.expect("first run");
        run_migrations(&pool).await.expect("second run");

        let applied = get_applied_migration_versions(&pool).await.expect("versions");
        assert_eq!(applied.len(), MIGRATIONS.len());
    }

    #[tokio::test]
    async fn schema_supports_core_tables() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("create pool");
        run_migrations(&pool).await.expect("migrate");

        for table in ["accounts", "outstanding_tokens", "blacklisted_tokens"] {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = $1",
            )
            .bind(table)
            .fetch_one(&pool)
            .await
            .expect("query sqlite_master");
            assert_eq!(count, 1, "missing table {table}");
        }
    }
}
