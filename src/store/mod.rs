//! PokemonStore - the document-store collaborator behind the catalog.
//!
//! The catalog never talks to a database directly; it drives this trait.
//! Implementations must enforce unique indexes on `name` and `no` at write
//! time and report collisions as [`StoreError::DuplicateKey`].

mod in_memory;

use serde_json::Value;

use crate::record::{NewPokemon, PokemonRecord, RecordId, UpdatePokemon, Versioned};

pub use in_memory::InMemoryPokemonStore;

/// A single-field equality match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    No(u32),
    Name(String),
}

/// Sort order for [`PokemonStore::find_many`]. Ties are broken by id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sort {
    #[default]
    NoAscending,
}

impl Sort {
    pub(crate) fn compare(&self, a: &PokemonRecord, b: &PokemonRecord) -> std::cmp::Ordering {
        match self {
            Sort::NoAscending => a.no.cmp(&b.no).then_with(|| a.id.cmp(&b.id)),
        }
    }
}

/// Errors raised by a store implementation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// A write collided with a unique index. `key_value` is a JSON object
    /// naming the colliding field and value, e.g. `{"name":"pikachu"}`.
    #[error("duplicate key {key_value}")]
    DuplicateKey { key_value: Value },
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("store serialization error: {0}")]
    Serde(String),
}

impl StoreError {
    pub fn duplicate(field: &str, value: impl Into<Value>) -> Self {
        let mut key_value = serde_json::Map::new();
        key_value.insert(field.to_string(), value.into());
        StoreError::DuplicateKey {
            key_value: Value::Object(key_value),
        }
    }
}

/// Abstract collection storage for catalog records.
pub trait PokemonStore: Send + Sync {
    /// Insert one record. Fails on a unique-index collision.
    fn insert(&self, input: NewPokemon) -> Result<Versioned<PokemonRecord>, StoreError>;

    /// Sorted window over the whole collection.
    fn find_many(
        &self,
        sort: Sort,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Versioned<PokemonRecord>>, StoreError>;

    /// First record whose field equals the given value.
    fn find_one_by_field(
        &self,
        field: &FieldValue,
    ) -> Result<Option<Versioned<PokemonRecord>>, StoreError>;

    fn find_by_id(&self, id: &RecordId) -> Result<Option<Versioned<PokemonRecord>>, StoreError>;

    /// Apply a patch in place. Returns false if no record has `id`.
    fn update_one_by_id(&self, id: &RecordId, patch: &UpdatePokemon) -> Result<bool, StoreError>;

    /// Remove a record, returning it if it existed.
    fn delete_by_id(&self, id: &RecordId) -> Result<Option<Versioned<PokemonRecord>>, StoreError>;

    /// Remove every record. Returns how many were removed.
    fn delete_all(&self) -> Result<usize, StoreError>;

    /// Insert a batch. All-or-nothing: any collision rejects the batch.
    fn insert_many(&self, inputs: Vec<NewPokemon>) -> Result<usize, StoreError>;
}
