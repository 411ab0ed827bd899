//! HTTP transport - maps REST routes onto catalog and seed operations.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /api/v2/pokemon` — create. Body = JSON record without `_id`.
//! - `GET /api/v2/pokemon?limit=&offset=` — one page, ascending by `no`.
//! - `GET /api/v2/pokemon/:term` — lookup by number, id or name.
//! - `PATCH /api/v2/pokemon/:term` — partial update.
//! - `DELETE /api/v2/pokemon/:id` — delete by store id.
//! - `GET /api/v2/seed` — full-replace seed from the remote listing.
//! - `GET /health` — health check returning `{ "ok": true }`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pokedex::{http, CatalogStore, SeedImporter, InMemoryPokemonStore};
//!
//! let store = InMemoryPokemonStore::new();
//! let state = Arc::new(http::AppState::new(
//!     CatalogStore::new(store.clone()),
//!     SeedImporter::new(store, client, seed_config),
//! ));
//!
//! http::serve(state, "0.0.0.0:3000").await?;
//! ```

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::{error, info};

use crate::catalog::CatalogStore;
use crate::error::CatalogError;
use crate::record::{NewPokemon, Pagination, PokemonRecord, RecordId, UpdatePokemon};
use crate::seed::{ListingClient, SeedImporter};
use crate::store::PokemonStore;

/// Shared handler state: the two components, each with its store handle.
pub struct AppState<S, C> {
    pub catalog: CatalogStore<S>,
    pub seeder: SeedImporter<S, C>,
}

impl<S, C> AppState<S, C> {
    pub fn new(catalog: CatalogStore<S>, seeder: SeedImporter<S, C>) -> Self {
        Self { catalog, seeder }
    }
}

/// Failure of a single request.
#[derive(Debug)]
pub enum ApiError {
    /// Request failed transport-level validation.
    Invalid(String),
    Catalog(CatalogError),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Catalog(e) => (
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                e.to_string(),
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Build an axum `Router` serving the catalog and seed routes.
pub fn router<S, C>(state: Arc<AppState<S, C>>) -> Router
where
    S: PokemonStore + 'static,
    C: ListingClient + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/v2/pokemon",
            get(find_all_handler::<S, C>).post(create_handler::<S, C>),
        )
        .route(
            "/api/v2/pokemon/:term",
            get(find_one_handler::<S, C>)
                .patch(update_handler::<S, C>)
                .delete(remove_handler::<S, C>),
        )
        .route("/api/v2/seed", get(seed_handler::<S, C>))
        .with_state(state)
}

/// Serve over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<S, C>(state: Arc<AppState<S, C>>, addr: &str) -> Result<(), std::io::Error>
where
    S: PokemonStore + 'static,
    C: ListingClient + 'static,
{
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn create_handler<S: PokemonStore, C: ListingClient>(
    State(state): State<Arc<AppState<S, C>>>,
    Json(input): Json<NewPokemon>,
) -> Result<(StatusCode, Json<PokemonRecord>), ApiError> {
    validate_name(Some(&input.name))?;
    validate_no(Some(input.no))?;
    let record = state.catalog.create(input)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn find_all_handler<S: PokemonStore, C: ListingClient>(
    State(state): State<Arc<AppState<S, C>>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<PokemonRecord>>, ApiError> {
    if pagination.limit == Some(0) {
        return Err(ApiError::Invalid("limit must not be less than 1".into()));
    }
    Ok(Json(state.catalog.find_all(pagination)?))
}

async fn find_one_handler<S: PokemonStore, C: ListingClient>(
    State(state): State<Arc<AppState<S, C>>>,
    Path(term): Path<String>,
) -> Result<Json<PokemonRecord>, ApiError> {
    Ok(Json(state.catalog.find_one(&term)?))
}

async fn update_handler<S: PokemonStore, C: ListingClient>(
    State(state): State<Arc<AppState<S, C>>>,
    Path(term): Path<String>,
    Json(patch): Json<UpdatePokemon>,
) -> Result<Json<PokemonRecord>, ApiError> {
    validate_name(patch.name.as_deref())?;
    validate_no(patch.no)?;
    Ok(Json(state.catalog.update(&term, patch)?))
}

async fn remove_handler<S: PokemonStore, C: ListingClient>(
    State(state): State<Arc<AppState<S, C>>>,
    Path(id): Path<String>,
) -> Result<Json<PokemonRecord>, ApiError> {
    if let Err(e) = id.parse::<RecordId>() {
        return Err(ApiError::Invalid(e.to_string()));
    }
    Ok(Json(state.catalog.remove(&id)?))
}

async fn seed_handler<S, C>(State(state): State<Arc<AppState<S, C>>>) -> Result<String, ApiError>
where
    S: PokemonStore + 'static,
    C: ListingClient + 'static,
{
    // The listing client blocks on network I/O.
    let summary = tokio::task::spawn_blocking(move || state.seeder.execute_seed())
        .await
        .map_err(|e| {
            error!(error = %e, "seed task panicked or was cancelled");
            ApiError::Catalog(CatalogError::InternalFailure)
        })??;
    Ok(summary.to_string())
}

fn validate_name(name: Option<&str>) -> Result<(), ApiError> {
    match name {
        Some(name) if name.trim().is_empty() => {
            Err(ApiError::Invalid("name must not be empty".into()))
        }
        _ => Ok(()),
    }
}

fn validate_no(no: Option<u32>) -> Result<(), ApiError> {
    match no {
        Some(0) => Err(ApiError::Invalid("no must not be less than 1".into())),
        _ => Ok(()),
    }
}
