//! Error types for catalog operations.

/// Errors that can occur during catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A database operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No row exists with the requested id.
    #[error("pokemon not found: {0}")]
    NotFound(i64),

    /// JSON serialization failed.
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The write payload was rejected before reaching the database.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}
