//! Entry point for the pokedex catalog service.

use std::error::Error;
use std::sync::Arc;

use pokedex::http::{self, AppState};
use pokedex::{CatalogConfig, CatalogStore, HttpListingClient, InMemoryPokemonStore, SeedImporter};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pokedex=info")),
        )
        .init();

    let config = CatalogConfig::load()?;
    tracing::info!(?config, "starting pokedex");

    // Built outside the runtime: the blocking client owns its own.
    let client = HttpListingClient::new(config.seed.timeout())?;
    let store = InMemoryPokemonStore::new();
    let state = Arc::new(AppState::new(
        CatalogStore::new(store.clone()).with_default_limit(config.default_limit),
        SeedImporter::new(store, client, config.seed.clone()),
    ));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(http::serve(state, &config.bind_addr))?;
    Ok(())
}
