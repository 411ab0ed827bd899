//! Listing payloads and the outbound client seam.

use serde::{Deserialize, Serialize};

/// One `{name, url}` pair from the remote listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub name: String,
    pub url: String,
}

impl ListingEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Species number taken from the second-to-last `/` segment of the url,
    /// e.g. `https://pokeapi.co/api/v2/pokemon/25/` gives 25.
    pub fn species_no(&self) -> Option<u32> {
        let segments: Vec<&str> = self.url.split('/').collect();
        if segments.len() < 2 {
            return None;
        }
        segments[segments.len() - 2].parse().ok()
    }
}

/// Body of a listing response. Paging fields (`count`, `next`, ...) are
/// ignored; `results` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingResponse {
    pub results: Vec<ListingEntry>,
}

/// Failure of the outbound listing request.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("listing request failed: {0}")]
    Request(String),
    #[error("listing endpoint returned status {0}")]
    Status(u16),
    #[error("listing response could not be decoded: {0}")]
    Decode(String),
}

/// HTTP collaborator used by the seed.
pub trait ListingClient: Send + Sync {
    /// GET `url` and decode a listing.
    fn get(&self, url: &str) -> Result<ListingResponse, TransportError>;
}

impl<C: ListingClient + ?Sized> ListingClient for &C {
    fn get(&self, url: &str) -> Result<ListingResponse, TransportError> {
        (**self).get(url)
    }
}
