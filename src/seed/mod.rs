//! Seed - one-shot full-replace import from the remote listing.
//!
//! A run fetches the listing, deletes every stored record, then bulk-inserts
//! one `{no, name}` record per listing entry. There is no transaction: the
//! collection is observably empty between the delete and the insert, and
//! stays empty if the insert fails.
//!
//! ## Example
//!
//! ```ignore
//! use std::time::Duration;
//! use pokedex::{HttpListingClient, InMemoryPokemonStore, SeedConfig, SeedImporter};
//!
//! let store = InMemoryPokemonStore::new();
//! let client = HttpListingClient::new(Duration::from_secs(30))?;
//! let seeder = SeedImporter::new(store.clone(), client, SeedConfig::default());
//! let summary = seeder.execute_seed()?;
//! println!("{summary}");
//! ```

mod http_client;
mod listing;

use std::fmt;

use tracing::{error, info};

use crate::config::SeedConfig;
use crate::error::CatalogError;
use crate::record::{normalize_name, NewPokemon};
use crate::store::PokemonStore;

pub use http_client::HttpListingClient;
pub use listing::{ListingClient, ListingEntry, ListingResponse, TransportError};

/// Acknowledgment of a completed seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub deleted: usize,
    pub inserted: usize,
}

impl fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed executed")
    }
}

/// Replaces the whole collection with the remote listing.
pub struct SeedImporter<S, C> {
    store: S,
    client: C,
    config: SeedConfig,
}

impl<S: PokemonStore, C: ListingClient> SeedImporter<S, C> {
    pub fn new(store: S, client: C, config: SeedConfig) -> Self {
        Self {
            store,
            client,
            config,
        }
    }

    /// Full listing url. The configured `limit` replaces any `limit` already
    /// in the url's query; other parameters are kept in order.
    pub fn listing_url(&self) -> String {
        let mut url = self.config.url.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "limit")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("limit", &self.config.limit.to_string());
        url.to_string()
    }

    /// Fetch, delete everything, bulk insert. Nothing is retried or rolled back.
    pub fn execute_seed(&self) -> Result<SeedSummary, CatalogError> {
        let url = self.listing_url();
        info!(%url, "seeding catalog");

        let listing = self.client.get(&url).map_err(|e| {
            error!(%url, error = %e, "listing fetch failed");
            CatalogError::TransportFailure
        })?;

        let inputs = listing
            .results
            .iter()
            .map(to_new_pokemon)
            .collect::<Result<Vec<_>, _>>()?;

        let deleted = self.store.delete_all().map_err(|e| {
            error!(error = %e, "seed could not clear the collection");
            CatalogError::InternalFailure
        })?;

        let inserted = self.store.insert_many(inputs).map_err(|e| {
            error!(deleted, error = %e, "seed insert failed after clearing the collection");
            CatalogError::InternalFailure
        })?;

        info!(deleted, inserted, "seed executed");
        Ok(SeedSummary { deleted, inserted })
    }
}

fn to_new_pokemon(entry: &ListingEntry) -> Result<NewPokemon, CatalogError> {
    match entry.species_no() {
        Some(no) => Ok(NewPokemon::new(no, normalize_name(&entry.name))),
        None => {
            error!(name = %entry.name, url = %entry.url, "listing entry has no species number");
            Err(CatalogError::InternalFailure)
        }
    }
}
