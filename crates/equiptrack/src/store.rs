//! Record store for equiptrack.
//!
//! The store is the sole owner of the assignment collection and the only
//! place identifiers are minted. Everything else reads through
//! [`RecordStore::list`].

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::record::{json_type_name, AssignmentRecord, RecordFields};

/// In-memory, insertion-ordered collection of assignment records.
///
/// Ids are minted as one past the highest id the store has ever held, so an
/// id freed by a delete is never handed out again.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<AssignmentRecord>,
    high_water: u64,
}

impl RecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with a seed value.
    ///
    /// An array must hold objects only; a single object is wrapped into a
    /// one-element collection.
    ///
    /// Seed records without an id, or repeating an id already seen, are
    /// renumbered from the running maximum so every id in the store is
    /// unique.
    ///
    /// Returns the number of records loaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDataShape`] for any other shape, or
    /// [`Error::IdSpaceExhausted`] if renumbering runs past `u64::MAX`. The
    /// store is left empty either way.
    pub fn load(&mut self, seed: Value) -> Result<usize> {
        self.clear();

        let objects = match seed {
            Value::Array(items) => items,
            object @ Value::Object(_) => vec![object],
            other => {
                let found = json_type_name(&other);
                error!(found, "Rejected seed data");
                return Err(Error::InvalidDataShape { found });
            }
        };

        let mut records = Vec::with_capacity(objects.len());
        for item in &objects {
            let Value::Object(object) = item else {
                let found = json_type_name(item);
                error!(found, "Rejected seed data: array element is not an object");
                return Err(Error::InvalidDataShape { found });
            };
            records.push(AssignmentRecord::from_seed(object));
        }

        self.high_water = renumber(&mut records)?;
        self.records = records;
        info!(count = self.records.len(), "Loaded assignment records");
        Ok(self.records.len())
    }

    /// Empty the store and forget every id it has handed out.
    pub fn clear(&mut self) {
        self.records.clear();
        self.high_water = 0;
    }

    /// Compute the id the next created record will receive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdSpaceExhausted`] once `u64::MAX` has been handed
    /// out.
    pub fn next_id(&self) -> Result<u64> {
        let max_live = self.records.iter().map(|r| r.id).max().unwrap_or(0);
        max_live
            .max(self.high_water)
            .checked_add(1)
            .ok_or(Error::IdSpaceExhausted)
    }

    /// Append a new record built from form input.
    ///
    /// Every field is trimmed and blanks become `N/A`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdSpaceExhausted`] if no id is left; nothing is
    /// appended.
    pub fn create(&mut self, fields: &RecordFields) -> Result<&AssignmentRecord> {
        let id = self.next_id()?;
        self.high_water = id;
        self.records.push(AssignmentRecord::from_fields(id, fields));
        debug!(id, "Created assignment");
        Ok(&self.records[self.records.len() - 1])
    }

    /// Replace every field of an existing record, keeping its id and position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has `id`.
    pub fn update(&mut self, id: u64, fields: &RecordFields) -> Result<&AssignmentRecord> {
        let index = self.position(id).ok_or_else(|| Error::not_found(id))?;
        let record = &mut self.records[index];
        record.overwrite(fields);
        debug!(id, "Updated assignment");
        Ok(&*record)
    }

    /// Remove a record and return it.
    ///
    /// Confirmation is the caller's job; this deletes unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has `id`.
    pub fn delete(&mut self, id: u64) -> Result<AssignmentRecord> {
        let index = self.position(id).ok_or_else(|| Error::not_found(id))?;
        let removed = self.records.remove(index);
        debug!(id, "Deleted assignment");
        Ok(removed)
    }

    /// Get a record by id.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&AssignmentRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Position of a record in insertion order.
    #[must_use]
    pub fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// The collection, in insertion order.
    #[must_use]
    pub fn list(&self) -> &[AssignmentRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Give unnumbered (`0`) and duplicate ids fresh values above the highest
/// seed id. Returns the highest id in `records` afterwards.
fn renumber(records: &mut [AssignmentRecord]) -> Result<u64> {
    let mut max = records.iter().map(|r| r.id).max().unwrap_or(0);
    let mut seen = HashSet::with_capacity(records.len());

    for record in records {
        if record.id != 0 && seen.insert(record.id) {
            continue;
        }
        let fresh = max.checked_add(1).ok_or(Error::IdSpaceExhausted)?;
        warn!(seed_id = record.id, id = fresh, "Renumbered seed record");
        record.id = fresh;
        seen.insert(fresh);
        max = fresh;
    }
    Ok(max)
}
