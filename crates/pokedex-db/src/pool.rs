//! Connection pool creation and per-connection configuration.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

/// Runtime tunables for SQLite connection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    /// Busy timeout for SQLite connections, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled SQLite connections.
    pub pool_max_size: u32,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
        }
    }
}

/// A type alias for the SQLite connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Errors that can occur when opening the database.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Failed to build the connection pool.
    #[error("failed to create database connection pool: {0}")]
    PoolInit(#[from] r2d2::Error),

    /// Failed to open or configure a standalone connection.
    #[error("failed to open database: {0}")]
    Open(#[from] rusqlite::Error),
}

fn open_flags() -> OpenFlags {
    OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX
}

/// Applies WAL mode, foreign keys and the busy timeout to a connection.
///
/// In-memory databases report `memory` as their journal mode, which is
/// accepted.
fn configure_connection(conn: &Connection, settings: DbRuntimeSettings) -> rusqlite::Result<()> {
    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
    if journal_mode != "wal" && journal_mode != "memory" {
        return Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
            Some(format!("failed to set WAL journal mode, got: {journal_mode}")),
        ));
    }
    conn.execute_batch(&format!(
        "PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = {};",
        settings.busy_timeout_ms
    ))
}

/// Creates a SQLite connection pool for the HTTP server.
///
/// `db_path` may be `:memory:`, but every pooled connection then gets its
/// own private database; tests that go through the pool should use a
/// temporary file instead.
///
/// # Errors
///
/// Returns `PoolError::PoolInit` if the pool cannot be built or its first
/// connection cannot be configured.
pub fn create_pool(db_path: &str, settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    let manager = SqliteConnectionManager::file(db_path)
        .with_flags(open_flags())
        .with_init(move |conn| configure_connection(conn, settings));

    let pool = Pool::builder()
        .max_size(settings.pool_max_size)
        .build(manager)?;

    Ok(pool)
}

/// Opens a single configured connection, for one-shot maintenance commands
/// that do not need a pool.
///
/// # Errors
///
/// Returns `PoolError::Open` if the file cannot be opened or configured.
pub fn open_connection(db_path: &str, settings: DbRuntimeSettings) -> Result<Connection, PoolError> {
    let conn = Connection::open_with_flags(db_path, open_flags())?;
    configure_connection(&conn, settings)?;
    tracing::debug!(path = db_path, "opened standalone database connection");
    Ok(conn)
}
