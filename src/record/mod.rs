//! Records - the catalog's single entity and its write payloads.
//!
//! `PokemonRecord` is what the store holds and what callers get back.
//! `NewPokemon` and `UpdatePokemon` are the create and patch payloads;
//! both carry the recognized fields (`no`, `name`) as typed values and any
//! other attributes as an opaque JSON map.
//!
//! ## Example
//!
//! ```ignore
//! use pokedex::{NewPokemon, UpdatePokemon};
//!
//! let input = NewPokemon::new(25, "Pikachu");
//! let patch = UpdatePokemon::default().name("Raichu");
//! ```

mod id;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use id::{InvalidRecordId, RecordId};

/// Keys that never live in the opaque attribute map: the store-owned id and
/// revision marker, and the typed `no`/`name` fields.
pub const RESERVED_ATTRIBUTES: &[&str] = &["_id", "__v", "no", "name"];

/// Default page size for listing.
pub const DEFAULT_LIMIT: usize = 10;

/// A stored catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub no: u32,
    pub name: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl PokemonRecord {
    /// Build a record from a create payload and a store-assigned id.
    pub fn from_new(id: RecordId, input: NewPokemon) -> Self {
        let mut attributes = input.attributes;
        strip_reserved(&mut attributes);
        Self {
            id,
            no: input.no,
            name: input.name,
            attributes,
        }
    }

    /// Apply every field present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: &UpdatePokemon) {
        if let Some(no) = patch.no {
            self.no = no;
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        for (key, value) in &patch.attributes {
            if !is_reserved(key) {
                self.attributes.insert(key.clone(), value.clone());
            }
        }
    }

    /// Copy of this record with `patch` applied.
    pub fn merged(&self, patch: &UpdatePokemon) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }
}

/// Create payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPokemon {
    pub no: u32,
    pub name: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl NewPokemon {
    pub fn new(no: u32, name: impl Into<String>) -> Self {
        Self {
            no,
            name: name.into(),
            attributes: Map::new(),
        }
    }

    /// Attach an opaque attribute. Reserved keys are ignored.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if !is_reserved(&key) {
            self.attributes.insert(key, value);
        }
        self
    }

    /// Lower-case and trim the name, drop reserved attribute keys.
    pub(crate) fn normalized(mut self) -> Self {
        self.name = normalize_name(&self.name);
        strip_reserved(&mut self.attributes);
        self
    }
}

/// Partial update. Absent fields are left as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePokemon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl UpdatePokemon {
    pub fn no(mut self, no: u32) -> Self {
        self.no = Some(no);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Patch an opaque attribute. Reserved keys are ignored; use
    /// [`UpdatePokemon::no`] and [`UpdatePokemon::name`] for the typed fields.
    pub fn attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if !is_reserved(&key) {
            self.attributes.insert(key, value);
        }
        self
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.name = self.name.map(|n| normalize_name(&n));
        strip_reserved(&mut self.attributes);
        self
    }
}

/// Listing window. Missing values fall back to the catalog defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

impl Pagination {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Resolve to `(limit, offset)` using `default_limit` when unset.
    pub fn resolve(&self, default_limit: usize) -> (usize, usize) {
        (self.limit.unwrap_or(default_limit), self.offset.unwrap_or(0))
    }
}

/// A record paired with the store's revision counter.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

impl<T> Versioned<T> {
    /// Drop the revision marker.
    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Canonical form used for every name write and name lookup.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn is_reserved(key: &str) -> bool {
    RESERVED_ATTRIBUTES.contains(&key)
}

fn strip_reserved(attributes: &mut Map<String, Value>) {
    attributes.retain(|key, _| !is_reserved(key));
}
