//! Embedded SQL migration runner.
//!
//! Migrations are SQL files compiled into the binary. They run in order on
//! startup and are tracked by name in the `_pokedex_migrations` table, so
//! each one is applied at most once per database file.

use rusqlite::Connection;
use thiserror::Error;

/// A single embedded migration.
struct Migration {
    name: &'static str,
    sql: &'static str,
}

/// All migrations in order. New migrations are appended here.
const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "000_pokemons",
        sql: include_str!("migrations/000_pokemons.sql"),
    },
    Migration {
        name: "001_pokemons_updated_at",
        sql: include_str!("migrations/001_pokemons_updated_at.sql"),
    },
];

/// Errors that can occur during migration execution.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A SQL statement within a migration failed.
    #[error("migration '{name}' failed: {source}")]
    ExecutionFailed {
        /// The name of the migration that failed.
        name: String,
        /// The underlying SQLite error.
        source: rusqlite::Error,
    },

    /// Failed to query migration state.
    #[error("failed to check migration state: {0}")]
    StateQuery(rusqlite::Error),
}

/// Runs all pending migrations against the given connection and returns how
/// many were applied.
///
/// Each migration runs in its own transaction together with its tracking
/// row, so a failed migration leaves no partial schema behind.
///
/// # Errors
///
/// Returns `MigrationError` if any migration fails to execute or if the
/// tracking table cannot be queried.
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    run_migrations_from_list(conn, MIGRATIONS)
}

fn run_migrations_from_list(
    conn: &Connection,
    migrations: &[Migration],
) -> Result<usize, MigrationError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _pokedex_migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .map_err(execution_failed("_pokedex_migrations_bootstrap"))?;

    let mut applied = 0;

    for migration in migrations {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _pokedex_migrations WHERE name = ?1",
                [migration.name],
                |row| row.get(0),
            )
            .map_err(MigrationError::StateQuery)?;

        if already_applied {
            tracing::debug!(migration = migration.name, "migration already applied");
            continue;
        }

        tracing::info!(migration = migration.name, "applying migration");

        let tx = conn
            .unchecked_transaction()
            .map_err(execution_failed(migration.name))?;
        tx.execute_batch(migration.sql)
            .map_err(execution_failed(migration.name))?;
        tx.execute(
            "INSERT INTO _pokedex_migrations (name) VALUES (?1)",
            [migration.name],
        )
        .map_err(execution_failed(migration.name))?;
        tx.commit().map_err(execution_failed(migration.name))?;

        applied += 1;
    }

    Ok(applied)
}

fn execution_failed(name: &str) -> impl FnOnce(rusqlite::Error) -> MigrationError {
    let name = name.to_string();
    move |source| MigrationError::ExecutionFailed { name, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn column_names(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .expect("should prepare table_info");
        stmt.query_map([], |row| row.get::<_, String>(1))
            .expect("should query table_info")
            .map(|r| r.expect("should read column name"))
            .collect()
    }

    #[test]
    fn run_migrations_on_fresh_db() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        let applied = run_migrations(&conn).expect("migrations should succeed");
        assert_eq!(applied, MIGRATIONS.len());

        let count: usize = conn
            .query_row("SELECT COUNT(*) FROM _pokedex_migrations", [], |row| {
                row.get(0)
            })
            .expect("should query migration count");
        assert_eq!(count, MIGRATIONS.len());
    }

    #[test]
    fn run_migrations_idempotent() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");

        let first = run_migrations(&conn).expect("first run should succeed");
        assert_eq!(first, 2);

        let second = run_migrations(&conn).expect("second run should succeed");
        assert_eq!(second, 0, "no new migrations to apply");
    }

    #[test]
    fn pokemons_table_has_expected_columns() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        run_migrations(&conn).expect("migrations should succeed");

        assert_eq!(
            column_names(&conn, "pokemons"),
            vec![
                "id",
                "name",
                "types",
                "stats",
                "height",
                "weight",
                "abilities",
                "sprites",
                "updated_at"
            ]
        );
    }

    #[test]
    fn semi_structured_columns_default_to_empty_json() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        run_migrations(&conn).expect("migrations should succeed");

        conn.execute("INSERT INTO pokemons (name) VALUES ('missingno')", [])
            .expect("should insert with defaults");
        let row: (String, String, String, String, Option<f64>) = conn
            .query_row(
                "SELECT types, stats, abilities, sprites, height FROM pokemons",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .expect("should read row");
        let empty_seq = String::from("[]");
        let empty_map = String::from("{}");
        assert_eq!(row, (empty_seq.clone(), empty_map.clone(), empty_seq, empty_map, None));
    }

    #[test]
    fn migration_side_effects_rollback_when_tracking_insert_fails() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        let migrations = [Migration {
            name: "900_tracking_insert_conflict",
            sql: "
                CREATE TABLE rollback_probe (id INTEGER PRIMARY KEY);
                INSERT INTO _pokedex_migrations (name) VALUES ('900_tracking_insert_conflict');
            ",
        }];

        let err = run_migrations_from_list(&conn, &migrations)
            .expect_err("tracking insert conflict should fail migration");

        match err {
            MigrationError::ExecutionFailed { name, .. } => {
                assert_eq!(name, "900_tracking_insert_conflict")
            }
            other => panic!("unexpected error type: {other:?}"),
        }

        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'rollback_probe')",
                [],
                |row| row.get(0),
            )
            .expect("should query sqlite_master");
        assert!(!exists, "schema side effects should be rolled back");
    }
}
