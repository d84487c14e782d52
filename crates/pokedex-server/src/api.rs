//! API handlers for the Pokémon catalog.

use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Json, Path,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pokedex_catalog::{
    create_pokemon, delete_pokemon, get_pokemon, list_pokemons, update_pokemon, CatalogError,
    NewPokemon, ReadMode,
};
use pokedex_types::{PokemonPayload, PokemonRecord};
use rusqlite::Connection;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body was malformed or failed validation.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    /// No row matches the requested id.
    #[error("pokemon not found")]
    NotFound,
    /// The request body exceeds the configured limit.
    #[error("payload too large")]
    PayloadTooLarge,
    /// Anything else. The message is logged, never sent to the client.
    #[error("internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InvalidPayload(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "invalid payload", "details": details }),
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "pokemon not found" }),
            ),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({ "error": "payload too large" }),
            ),
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(_) => ApiError::NotFound,
            CatalogError::InvalidPayload(reason) => ApiError::InvalidPayload(reason),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge;
        }
        ApiError::InvalidPayload(rejection.body_text())
    }
}

/// Runs a catalog operation on a pooled connection off the async runtime.
async fn with_connection<T, F>(state: Arc<AppState>, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Connection, ReadMode) -> Result<T, CatalogError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::Internal(format!("db connection failed: {}", e)))?;
        op(&*conn, state.read_mode).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("task join error: {}", e)))?
}

/// Extracts the record id. An id that is not an integer cannot name a row.
fn record_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    id.map(|Path(id)| id).map_err(|_| ApiError::NotFound)
}

fn validated(payload: Result<Json<PokemonPayload>, JsonRejection>) -> Result<NewPokemon, ApiError> {
    let Json(payload) = payload?;
    Ok(NewPokemon::from_payload(payload)?)
}

/// Handler for `GET /api/pokemons`.
pub async fn list_pokemons_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<PokemonRecord>>, ApiError> {
    let records = with_connection(state, list_pokemons).await?;
    Ok(Json(records))
}

/// Handler for `GET /api/pokemons/{id}`.
pub async fn get_pokemon_handler(
    Extension(state): Extension<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PokemonRecord>, ApiError> {
    let id = record_id(id)?;
    let record = with_connection(state, move |conn, mode| get_pokemon(conn, id, mode)).await?;
    Ok(Json(record))
}

/// Handler for `POST /api/pokemons`.
pub async fn create_pokemon_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<PokemonPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<PokemonRecord>), ApiError> {
    let pokemon = validated(payload)?;
    let record =
        with_connection(state, move |conn, mode| create_pokemon(conn, &pokemon, mode)).await?;

    tracing::info!(id = record.id, name = %record.name, "pokemon created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for `PUT /api/pokemons/{id}`.
///
/// Full replacement: fields missing from the body are reset to empty.
pub async fn update_pokemon_handler(
    Extension(state): Extension<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PokemonPayload>, JsonRejection>,
) -> Result<Json<PokemonRecord>, ApiError> {
    let id = record_id(id)?;
    let pokemon = validated(payload)?;
    let record = with_connection(state, move |conn, mode| {
        update_pokemon(conn, id, &pokemon, mode)
    })
    .await?;

    tracing::info!(id, "pokemon updated");
    Ok(Json(record))
}

/// Handler for `DELETE /api/pokemons/{id}`.
pub async fn delete_pokemon_handler(
    Extension(state): Extension<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = record_id(id)?;
    with_connection(state, move |conn, _| delete_pokemon(conn, id)).await?;

    tracing::info!(id, "pokemon deleted");
    Ok(Json(json!({ "ok": true, "deleted": 1, "id": id })))
}
