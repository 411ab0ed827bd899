//! InMemoryPokemonStore - HashMap-backed document store.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use super::{FieldValue, PokemonStore, Sort, StoreError};
use crate::record::{NewPokemon, PokemonRecord, RecordId, UpdatePokemon, Versioned};

/// Internal stored representation of a record.
struct StoredDocument {
    bytes: Vec<u8>,
    version: u64,
}

impl StoredDocument {
    fn encode(record: &PokemonRecord, version: u64) -> Result<Self, StoreError> {
        let bytes = serde_json::to_vec(record).map_err(|e| StoreError::Serde(e.to_string()))?;
        Ok(Self { bytes, version })
    }

    fn decode(&self) -> Result<Versioned<PokemonRecord>, StoreError> {
        let data: PokemonRecord =
            serde_json::from_slice(&self.bytes).map_err(|e| StoreError::Serde(e.to_string()))?;
        Ok(Versioned {
            data,
            version: self.version,
        })
    }
}

#[derive(Default)]
struct Collection {
    documents: HashMap<RecordId, StoredDocument>,
    by_name: HashMap<String, RecordId>,
    by_no: HashMap<u32, RecordId>,
}

impl Collection {
    /// Check both unique indexes, ignoring `owner` (the record being updated).
    fn check_unique(
        &self,
        name: &str,
        no: u32,
        owner: Option<&RecordId>,
    ) -> Result<(), StoreError> {
        if let Some(existing) = self.by_name.get(name) {
            if Some(existing) != owner {
                return Err(StoreError::duplicate("name", name));
            }
        }
        if let Some(existing) = self.by_no.get(&no) {
            if Some(existing) != owner {
                return Err(StoreError::duplicate("no", no));
            }
        }
        Ok(())
    }

    fn put(&mut self, record: &PokemonRecord, stored: StoredDocument) {
        self.by_name.insert(record.name.clone(), record.id);
        self.by_no.insert(record.no, record.id);
        self.documents.insert(record.id, stored);
    }

    fn unindex(&mut self, record: &PokemonRecord) {
        self.by_name.remove(&record.name);
        self.by_no.remove(&record.no);
    }
}

/// In-memory store with unique indexes on `name` and `no`.
///
/// Records are kept serialized so reads always hand back an owned copy.
/// Clone-friendly via Arc; clones share the same collection.
#[derive(Clone, Default)]
pub struct InMemoryPokemonStore {
    collection: Arc<RwLock<Collection>>,
}

impl InMemoryPokemonStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize, StoreError> {
        let collection = self
            .collection
            .read()
            .map_err(|_| StoreError::LockPoisoned("len"))?;
        Ok(collection.documents.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl PokemonStore for InMemoryPokemonStore {
    fn insert(&self, input: NewPokemon) -> Result<Versioned<PokemonRecord>, StoreError> {
        let mut collection = self
            .collection
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert"))?;

        collection.check_unique(&input.name, input.no, None)?;

        let record = PokemonRecord::from_new(RecordId::generate(), input);
        let stored = StoredDocument::encode(&record, 1)?;
        collection.put(&record, stored);

        Ok(Versioned {
            data: record,
            version: 1,
        })
    }

    fn find_many(
        &self,
        sort: Sort,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Versioned<PokemonRecord>>, StoreError> {
        let collection = self
            .collection
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_many"))?;

        let mut records = collection
            .documents
            .values()
            .map(StoredDocument::decode)
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_by(|a, b| sort.compare(&a.data, &b.data));

        Ok(records.into_iter().skip(skip).take(limit).collect())
    }

    fn find_one_by_field(
        &self,
        field: &FieldValue,
    ) -> Result<Option<Versioned<PokemonRecord>>, StoreError> {
        let collection = self
            .collection
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_one_by_field"))?;

        let id = match field {
            FieldValue::No(no) => collection.by_no.get(no),
            FieldValue::Name(name) => collection.by_name.get(name),
        };

        match id.and_then(|id| collection.documents.get(id)) {
            Some(stored) => Ok(Some(stored.decode()?)),
            None => Ok(None),
        }
    }

    fn find_by_id(&self, id: &RecordId) -> Result<Option<Versioned<PokemonRecord>>, StoreError> {
        let collection = self
            .collection
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_by_id"))?;

        match collection.documents.get(id) {
            Some(stored) => Ok(Some(stored.decode()?)),
            None => Ok(None),
        }
    }

    fn update_one_by_id(&self, id: &RecordId, patch: &UpdatePokemon) -> Result<bool, StoreError> {
        let mut collection = self
            .collection
            .write()
            .map_err(|_| StoreError::LockPoisoned("update_one_by_id"))?;

        let current = match collection.documents.get(id) {
            Some(stored) => stored.decode()?,
            None => return Ok(false),
        };

        let next = current.data.merged(patch);
        collection.check_unique(&next.name, next.no, Some(id))?;

        // Encode before touching the indexes so a failure leaves them intact.
        let stored = StoredDocument::encode(&next, current.version + 1)?;
        collection.unindex(&current.data);
        collection.put(&next, stored);

        Ok(true)
    }

    fn delete_by_id(&self, id: &RecordId) -> Result<Option<Versioned<PokemonRecord>>, StoreError> {
        let mut collection = self
            .collection
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete_by_id"))?;

        let removed = match collection.documents.get(id) {
            Some(stored) => stored.decode()?,
            None => return Ok(None),
        };
        collection.documents.remove(id);
        collection.unindex(&removed.data);

        Ok(Some(removed))
    }

    fn delete_all(&self) -> Result<usize, StoreError> {
        let mut collection = self
            .collection
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete_all"))?;

        let count = collection.documents.len();
        *collection = Collection::default();
        Ok(count)
    }

    fn insert_many(&self, inputs: Vec<NewPokemon>) -> Result<usize, StoreError> {
        let mut collection = self
            .collection
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert_many"))?;

        // Validate the whole batch against the collection and itself first.
        let mut batch_names = HashSet::new();
        let mut batch_nos = HashSet::new();
        for input in &inputs {
            collection.check_unique(&input.name, input.no, None)?;
            if !batch_names.insert(input.name.as_str()) {
                return Err(StoreError::duplicate("name", input.name.as_str()));
            }
            if !batch_nos.insert(input.no) {
                return Err(StoreError::duplicate("no", input.no));
            }
        }

        let records = inputs
            .into_iter()
            .map(|input| PokemonRecord::from_new(RecordId::generate(), input))
            .map(|record| StoredDocument::encode(&record, 1).map(|stored| (record, stored)))
            .collect::<Result<Vec<_>, _>>()?;

        let count = records.len();
        for (record, stored) in records {
            collection.put(&record, stored);
        }

        Ok(count)
    }
}
