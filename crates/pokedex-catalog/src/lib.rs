//! Pokémon catalog persistence.
//!
//! Implements CRUD over the `pokemons` table, seed imports, and the batch
//! reconciliation pass that rewrites legacy rows into canonical form.
//!
//! The `types`, `abilities`, `stats` and `sprites` columns are stored as JSON
//! text. On the write path every value goes through
//! [`pokedex_normalize`] before it is serialized, so rows written by this
//! crate are always canonical. On the read path the [`ReadMode`] decides
//! whether stored text is decoded strictly or re-normalized to tolerate rows
//! written by older tools.
//!
//! All functions take a borrowed [`rusqlite::Connection`] and issue
//! synchronous SQL; async callers are expected to run them on a blocking
//! thread.

mod columns;
mod error;
mod import;
mod reconcile;
mod store;

pub use error::CatalogError;
pub use import::{import_pokemons, ImportReport, SeedMode};
pub use pokedex_types::ReadMode;
pub use reconcile::{reconcile, ReconcileReport};
pub use store::{
    create_pokemon, delete_pokemon, get_pokemon, list_pokemons, update_pokemon, NewPokemon,
};
