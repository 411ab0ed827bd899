mod catalog;
mod config;
mod error;
mod record;
mod seed;
mod store;

#[cfg(feature = "http")]
pub mod http;

pub use catalog::{CatalogStore, LookupTerm};
pub use config::{CatalogConfig, ConfigError, SeedConfig};
pub use error::CatalogError;
pub use record::{
    normalize_name, InvalidRecordId, NewPokemon, Pagination, PokemonRecord, RecordId,
    UpdatePokemon, Versioned, DEFAULT_LIMIT, RESERVED_ATTRIBUTES,
};
pub use seed::{
    HttpListingClient, ListingClient, ListingEntry, ListingResponse, SeedImporter, SeedSummary,
    TransportError,
};
pub use store::{FieldValue, InMemoryPokemonStore, PokemonStore, Sort, StoreError};
