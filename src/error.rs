use serde_json::Value;

/// Caller-facing failure of a catalog or seed operation.
///
/// `NotFound` and `DuplicateKey` point at bad input. `InternalFailure` and
/// `TransportFailure` mean a dependency is unavailable; their messages are
/// fixed and never carry store or network detail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Pokemon with id, name or no \"{0}\" not found")]
    NotFound(String),
    #[error("Pokemon already exists {0}")]
    DuplicateKey(Value),
    #[error("Can't complete the operation - check server logs")]
    InternalFailure,
    #[error("Seed source is unavailable - check server logs")]
    TransportFailure,
}

impl CatalogError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::NotFound(_) => 404,
            CatalogError::DuplicateKey(_) => 400,
            CatalogError::InternalFailure => 500,
            CatalogError::TransportFailure => 502,
        }
    }
}
