//! Versioned schema initialization.
//!
//! Applied versions are tracked in `_migrations`; running the set again is a no-op.

use rusqlite::Connection;
use tracing::info;

use crate::applications::RepositoryError;

struct Migration {
    version: u32,
    description: &'static str,
    sql: &'static str,
}

/// All migrations in order. Each is applied at most once.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create_job_applications_table",
        sql: include_str!("sql/001_create_job_applications.sql"),
    },
    Migration {
        version: 2,
        description: "index_job_applications_by_date",
        sql: include_str!("sql/002_index_date_applied.sql"),
    },
];

/// Applies every pending migration and returns how many ran.
pub fn run_all(conn: &Connection) -> Result<usize, RepositoryError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current_version = current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        info!(
            version = migration.version,
            description = migration.description,
            "applying migration"
        );

        conn.execute_batch(migration.sql)
            .map_err(|err| RepositoryError::Migration {
                version: migration.version,
                reason: err.to_string(),
            })?;
        conn.execute(
            "INSERT INTO _migrations (version, description) VALUES (?1, ?2)",
            rusqlite::params![migration.version, migration.description],
        )?;
        applied += 1;
    }

    Ok(applied)
}

pub fn current_version(conn: &Connection) -> Result<u32, RepositoryError> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM _migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}
