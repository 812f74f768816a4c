use thiserror::Error;

/// Errors that can arise while querying the room graph or building routes.
#[derive(Debug, Error)]
pub enum MapperError {
    /// Requested room id is absent from the store. Terminal for the query,
    /// not fatal to the process.
    #[error("room not found: {0}")]
    RoomNotFound(String),

    /// Graph search exhausted without reaching the target.
    #[error("no route found from {from} to {to}")]
    NoRouteFound { from: String, to: String },

    /// Underlying storage engine missing or unreachable. Surfaced once per
    /// call; the engine never retries or caches the failure.
    #[error("room store unavailable: {0}")]
    StoreUnavailable(#[from] rusqlite::Error),

    /// Malformed id, blank fragment, or out-of-range selection, rejected
    /// before any graph traversal begins.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Wrapper around IO errors (catalog files, image output).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Item/NPC catalog file could not be parsed.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Raster encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
