//! Seed integration tests.
//!
//! Runs the importer against a canned listing client and against a mock
//! HTTP endpoint through the real reqwest client.

use std::sync::Mutex;
use std::time::Duration;

use mockito::Matcher;
use pokedex::{
    CatalogError, CatalogStore, HttpListingClient, InMemoryPokemonStore, ListingClient,
    ListingEntry, ListingResponse, NewPokemon, Pagination, PokemonStore, SeedConfig,
    SeedImporter, SeedSummary, Sort, TransportError,
};
use url::Url;

/// Listing client that returns a fixed listing and records requested urls.
struct CannedListing {
    entries: Vec<ListingEntry>,
    requested: Mutex<Vec<String>>,
}

impl CannedListing {
    fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(name, url)| ListingEntry::new(*name, *url))
                .collect(),
            requested: Mutex::new(Vec::new()),
        }
    }
}

impl ListingClient for CannedListing {
    fn get(&self, url: &str) -> Result<ListingResponse, TransportError> {
        self.requested.lock().unwrap().push(url.to_string());
        Ok(ListingResponse {
            results: self.entries.clone(),
        })
    }
}

struct Offline;

impl ListingClient for Offline {
    fn get(&self, _url: &str) -> Result<ListingResponse, TransportError> {
        Err(TransportError::Request("connection refused".into()))
    }
}

const TWO_SEEDS: [(&str, &str); 2] = [
    ("bulbasaur", "https://pokeapi.co/api/v2/pokemon/1/"),
    ("ivysaur", "https://pokeapi.co/api/v2/pokemon/2/"),
];

fn store_with_leftovers() -> InMemoryPokemonStore {
    let store = InMemoryPokemonStore::new();
    store.insert(NewPokemon::new(25, "pikachu")).unwrap();
    store.insert(NewPokemon::new(1, "missingno")).unwrap();
    store
}

fn contents(store: &InMemoryPokemonStore) -> Vec<(u32, String)> {
    store
        .find_many(Sort::NoAscending, 0, usize::MAX)
        .unwrap()
        .into_iter()
        .map(|v| (v.data.no, v.data.name))
        .collect()
}

#[test]
fn seed_replaces_the_collection() {
    let store = store_with_leftovers();
    let client = CannedListing::new(&TWO_SEEDS);
    let seeder = SeedImporter::new(store.clone(), &client, SeedConfig::default());

    let summary = seeder.execute_seed().unwrap();
    assert_eq!(
        summary,
        SeedSummary {
            deleted: 2,
            inserted: 2
        }
    );
    assert_eq!(summary.to_string(), "Seed executed");

    assert_eq!(
        contents(&store),
        vec![(1, "bulbasaur".to_string()), (2, "ivysaur".to_string())]
    );
    assert_eq!(
        *client.requested.lock().unwrap(),
        vec!["https://pokeapi.co/api/v2/pokemon?limit=650".to_string()]
    );
}

#[test]
fn seeded_records_are_served_by_the_catalog() {
    let store = InMemoryPokemonStore::new();
    let client = CannedListing::new(&TWO_SEEDS);
    SeedImporter::new(store.clone(), client, SeedConfig::default())
        .execute_seed()
        .unwrap();

    let catalog = CatalogStore::new(store);
    assert_eq!(catalog.find_one("2").unwrap().name, "ivysaur");
    assert_eq!(catalog.find_one("Bulbasaur").unwrap().no, 1);
    assert_eq!(catalog.find_all(Pagination::default()).unwrap().len(), 2);
}

#[test]
fn seed_is_repeatable() {
    let store = InMemoryPokemonStore::new();
    let seeder = SeedImporter::new(
        store.clone(),
        CannedListing::new(&TWO_SEEDS),
        SeedConfig::default(),
    );

    seeder.execute_seed().unwrap();
    let second = seeder.execute_seed().unwrap();
    assert_eq!(second.deleted, 2);
    assert_eq!(contents(&store).len(), 2);
}

#[test]
fn transport_failure_leaves_data_untouched() {
    let store = store_with_leftovers();
    let seeder = SeedImporter::new(store.clone(), Offline, SeedConfig::default());

    assert_eq!(
        seeder.execute_seed().unwrap_err(),
        CatalogError::TransportFailure
    );
    assert_eq!(contents(&store).len(), 2);
}

#[test]
fn unparseable_entry_aborts_before_delete() {
    let store = store_with_leftovers();
    let client = CannedListing::new(&[
        ("bulbasaur", "https://pokeapi.co/api/v2/pokemon/1/"),
        ("ivysaur", "https://pokeapi.co/api/v2/pokemon/2"),
    ]);
    let seeder = SeedImporter::new(store.clone(), client, SeedConfig::default());

    assert_eq!(
        seeder.execute_seed().unwrap_err(),
        CatalogError::InternalFailure
    );
    assert_eq!(contents(&store).len(), 2);
}

#[test]
fn insert_failure_after_delete_leaves_collection_empty() {
    let store = store_with_leftovers();
    let client = CannedListing::new(&[
        ("bulbasaur", "https://pokeapi.co/api/v2/pokemon/1/"),
        ("bulbasaur", "https://pokeapi.co/api/v2/pokemon/2/"),
    ]);
    let seeder = SeedImporter::new(store.clone(), client, SeedConfig::default());

    assert_eq!(
        seeder.execute_seed().unwrap_err(),
        CatalogError::InternalFailure
    );
    assert!(store.is_empty().unwrap());
}

#[test]
fn seed_over_http() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", Matcher::Regex(r"^/api/v2/pokemon".into()))
        .match_query(Matcher::UrlEncoded("limit".into(), "2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"count":1302,"next":null,"previous":null,"results":[
                {"name":"bulbasaur","url":"https://pokeapi.co/api/v2/pokemon/1/"},
                {"name":"ivysaur","url":"https://pokeapi.co/api/v2/pokemon/2/"}
            ]}"#,
        )
        .expect(1)
        .create();

    let config = SeedConfig {
        url: Url::parse(&format!("{}/api/v2/pokemon", server.url())).unwrap(),
        limit: 2,
        timeout_secs: 5,
    };
    let client = HttpListingClient::new(Duration::from_secs(config.timeout_secs)).unwrap();
    let store = store_with_leftovers();
    let seeder = SeedImporter::new(store.clone(), client, config);

    seeder.execute_seed().unwrap();
    assert_eq!(
        contents(&store),
        vec![(1, "bulbasaur".to_string()), (2, "ivysaur".to_string())]
    );
    mock.assert();
}

#[test]
fn http_error_status_is_a_transport_failure() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", Matcher::Any)
        .with_status(500)
        .expect(1)
        .create();

    let config = SeedConfig {
        url: Url::parse(&server.url()).unwrap(),
        limit: 10,
        timeout_secs: 5,
    };
    let client = HttpListingClient::new(config.timeout()).unwrap();
    let store = store_with_leftovers();
    let seeder = SeedImporter::new(store.clone(), client, config);

    assert_eq!(
        seeder.execute_seed().unwrap_err(),
        CatalogError::TransportFailure
    );
    assert_eq!(contents(&store).len(), 2);
    mock.assert();
}

#[test]
fn listing_without_results_leaves_data_untouched() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"Not found."}"#)
        .expect(1)
        .create();

    let config = SeedConfig {
        url: Url::parse(&format!("{}/api/v2/pokemon", server.url())).unwrap(),
        limit: 10,
        timeout_secs: 5,
    };
    let client = HttpListingClient::new(config.timeout()).unwrap();
    let store = store_with_leftovers();
    let seeder = SeedImporter::new(store.clone(), client, config);

    assert_eq!(
        seeder.execute_seed().unwrap_err(),
        CatalogError::TransportFailure
    );
    assert_eq!(
        contents(&store),
        vec![(1, "missingno".to_string()), (25, "pikachu".to_string())]
    );
    mock.assert();
}

#[test]
fn configured_limit_replaces_one_in_the_seed_url() {
    let client = CannedListing::new(&TWO_SEEDS);
    let config = SeedConfig {
        url: Url::parse("https://pokeapi.co/api/v2/pokemon?limit=5&offset=0").unwrap(),
        limit: 2,
        timeout_secs: 5,
    };
    SeedImporter::new(InMemoryPokemonStore::new(), &client, config)
        .execute_seed()
        .unwrap();

    assert_eq!(
        *client.requested.lock().unwrap(),
        vec!["https://pokeapi.co/api/v2/pokemon?offset=0&limit=2".to_string()]
    );
}
