//! Catalog - lookup-by-many-keys CRUD over a [`PokemonStore`].
//!
//! ## Example
//!
//! ```ignore
//! use pokedex::{CatalogStore, InMemoryPokemonStore, NewPokemon, Pagination};
//!
//! let catalog = CatalogStore::new(InMemoryPokemonStore::new());
//! catalog.create(NewPokemon::new(25, "Pikachu"))?;
//!
//! let by_no = catalog.find_one("25")?;
//! let by_name = catalog.find_one(" PIKACHU ")?;
//! let page = catalog.find_all(Pagination::new(10, 0))?;
//! ```

mod term;

use tracing::{debug, error};

use crate::error::CatalogError;
use crate::record::{
    NewPokemon, Pagination, PokemonRecord, RecordId, UpdatePokemon, Versioned, DEFAULT_LIMIT,
};
use crate::store::{PokemonStore, Sort, StoreError};

pub use term::LookupTerm;

/// CRUD service for catalog records.
///
/// Holds only the injected store handle and the default page size.
pub struct CatalogStore<S> {
    store: S,
    default_limit: usize,
}

impl<S: PokemonStore> CatalogStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            default_limit: DEFAULT_LIMIT,
        }
    }

    /// Page size used when a listing request has no limit.
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Insert a new record. The name is lower-cased before the write.
    pub fn create(&self, input: NewPokemon) -> Result<PokemonRecord, CatalogError> {
        let input = input.normalized();
        debug!(no = input.no, name = %input.name, "creating pokemon");

        self.store
            .insert(input)
            .map(Versioned::into_inner)
            .map_err(|e| handle_exceptions("create", e))
    }

    /// One page of records, ascending by `no`.
    pub fn find_all(&self, pagination: Pagination) -> Result<Vec<PokemonRecord>, CatalogError> {
        let (limit, offset) = pagination.resolve(self.default_limit);

        let page = self
            .store
            .find_many(Sort::NoAscending, offset, limit)
            .map_err(|e| handle_exceptions("find_all", e))?;

        Ok(page.into_iter().map(Versioned::into_inner).collect())
    }

    /// Resolve `term` as a number, then an id, then a name. Exactly one
    /// strategy is tried.
    pub fn find_one(&self, term: &str) -> Result<PokemonRecord, CatalogError> {
        self.find_versioned(term).map(Versioned::into_inner)
    }

    /// Patch the record matched by `term`.
    ///
    /// Returns the record as it was before the write with the patch laid
    /// over it; the store is not re-read.
    pub fn update(&self, term: &str, patch: UpdatePokemon) -> Result<PokemonRecord, CatalogError> {
        let current = self.find_versioned(term)?.into_inner();
        let patch = patch.normalized();
        debug!(id = %current.id, ?patch, "updating pokemon");

        let applied = self
            .store
            .update_one_by_id(&current.id, &patch)
            .map_err(|e| handle_exceptions("update", e))?;
        if !applied {
            return Err(CatalogError::NotFound(term.to_string()));
        }

        Ok(current.merged(&patch))
    }

    /// Delete by store id only; numbers and names are not resolved.
    pub fn remove(&self, id: &str) -> Result<PokemonRecord, CatalogError> {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| CatalogError::NotFound(id.to_string()))?;

        let removed = self
            .store
            .delete_by_id(&record_id)
            .map_err(|e| handle_exceptions("remove", e))?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        debug!(id = %record_id, name = %removed.data.name, "removed pokemon");
        Ok(removed.into_inner())
    }

    fn find_versioned(&self, term: &str) -> Result<Versioned<PokemonRecord>, CatalogError> {
        let lookup = LookupTerm::parse(term);

        let found = match &lookup {
            LookupTerm::Id(id) => self.store.find_by_id(id),
            other => match other.field() {
                Some(field) => self.store.find_one_by_field(&field),
                None => Ok(None),
            },
        }
        .map_err(|e| handle_exceptions("find_one", e))?;

        found.ok_or_else(|| CatalogError::NotFound(term.to_string()))
    }
}

/// Classify a store failure for the caller. Duplicate keys are surfaced
/// with their key/value; everything else is logged and hidden.
fn handle_exceptions(operation: &'static str, err: StoreError) -> CatalogError {
    match err {
        StoreError::DuplicateKey { key_value } => CatalogError::DuplicateKey(key_value),
        other => {
            error!(operation, error = %other, "store operation failed");
            CatalogError::InternalFailure
        }
    }
}
