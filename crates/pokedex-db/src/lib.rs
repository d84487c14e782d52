//! Database layer for the Pokédex catalog.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! and embedded SQL migrations. The `pokemons` table is created through the
//! versioned migrations in this crate; nothing else issues DDL.
//!
//! The HTTP server shares a [`DbPool`]. One-shot maintenance commands open a
//! single connection with [`open_connection`], which applies the same
//! pragmas as pooled connections.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, open_connection, DbPool, DbRuntimeSettings, PoolError};
