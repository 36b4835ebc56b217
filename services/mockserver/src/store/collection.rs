//! Generic concurrency-safe table for one resource kind.
use super::{Patch, Record, StoreError, StoreResult};
use chrono::Utc;
use glmock_model::new_object_id;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Rows keyed by id, plus the unique-key index pointing back at ids.
///
/// Both maps live under the same lock so they can never disagree.
#[derive(Debug)]
struct Table<T> {
    rows: HashMap<String, T>,
    keys: HashMap<String, String>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            keys: HashMap::new(),
        }
    }
}

/// One in-memory collection guarded by a single `RwLock`.
///
/// - `has`/`get`/`get_by_key`/`list`/`len` take the shared side.
/// - `add`/`update`/`delete` take the exclusive side and mark the collection
///   dirty so the next save flushes it.
///
/// The lock is held only for the table access itself; callers never get a
/// guard back, so it can not leak across another collection or a save.
#[derive(Debug)]
pub struct Collection<T> {
    table: RwLock<Table<T>>,
    dirty: AtomicBool,
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::default()),
            dirty: AtomicBool::new(false),
        }
    }

    /// Rebuild a collection from previously saved records.
    ///
    /// Records keep their ids and creation times; duplicate ids or unique keys
    /// are rejected so a corrupt snapshot can not break the key invariants.
    pub fn from_records(records: Vec<T>) -> StoreResult<Self> {
        let mut table = Table::default();
        for record in records {
            if record.id().is_empty() {
                return Err(StoreError::Conflict(format!("{} without id", T::KIND)));
            }
            insert_row(&mut table, record)?;
        }
        Ok(Self {
            table: RwLock::new(table),
            dirty: AtomicBool::new(false),
        })
    }

    pub async fn has(&self, id: &str) -> bool {
        self.table.read().await.rows.contains_key(id)
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.table.read().await.rows.get(id).cloned()
    }

    pub async fn get_by_key(&self, key: &str) -> Option<T> {
        let table = self.table.read().await;
        table
            .keys
            .get(key)
            .and_then(|id| table.rows.get(id))
            .cloned()
    }

    /// Insert a new record and return it as stored.
    ///
    /// A blank id is replaced with a fresh object id. The creation timestamp is
    /// always overwritten with the current time.
    pub async fn add(&self, mut record: T) -> StoreResult<T> {
        let mut table = self.table.write().await;
        if record.id().is_empty() {
            let mut id = new_object_id();
            while table.rows.contains_key(&id) {
                id = new_object_id();
            }
            record.set_id(id);
        }
        record.stamp_created(Utc::now());
        insert_row(&mut table, record.clone())?;
        self.touch(table.rows.len());
        Ok(record)
    }

    /// Apply `patch` to the record with `id` and return the updated record.
    pub async fn update<P: Patch<T>>(&self, id: &str, patch: P) -> StoreResult<T> {
        self.update_with(id, |record| patch.apply(record)).await
    }

    /// Apply an arbitrary in-place edit under the write lock.
    ///
    /// The record's id is restored after `edit` runs. If the edit moves the
    /// unique key onto a key owned by another row the update is rejected and
    /// nothing changes.
    pub async fn update_with<F>(&self, id: &str, edit: F) -> StoreResult<T>
    where
        F: FnOnce(&mut T),
    {
        let mut table = self.table.write().await;
        let current = table
            .rows
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{} {id}", T::KIND)))?;
        let mut next = current.clone();
        edit(&mut next);
        next.set_id(id.to_string());

        let old_key = current.unique_key().map(str::to_owned);
        let new_key = next.unique_key().map(str::to_owned);
        if old_key != new_key {
            if let Some(key) = &new_key {
                if table.keys.get(key).is_some_and(|owner| owner != id) {
                    return Err(StoreError::Conflict(format!("{} {key} exists", T::KIND)));
                }
            }
            if let Some(key) = &old_key {
                table.keys.remove(key);
            }
            if let Some(key) = new_key {
                table.keys.insert(key, id.to_string());
            }
        }
        table.rows.insert(id.to_string(), next.clone());
        self.touch(table.rows.len());
        Ok(next)
    }

    /// Remove the record with `id`. Deleting a missing id is a no-op.
    pub async fn delete(&self, id: &str) -> Option<T> {
        let mut table = self.table.write().await;
        let removed = table.rows.remove(id)?;
        if let Some(key) = removed.unique_key() {
            table.keys.remove(key);
        }
        self.touch(table.rows.len());
        Some(removed)
    }

    /// Remove the record with `id` only if `keep` says no, checked under the
    /// same write lock as the removal. `Ok(None)` means the id was absent;
    /// the record is handed back in `Err` when `keep` vetoed the delete.
    pub async fn delete_unless<F>(&self, id: &str, keep: F) -> Result<Option<T>, T>
    where
        F: FnOnce(&T) -> bool,
    {
        let mut table = self.table.write().await;
        match table.rows.get(id) {
            None => return Ok(None),
            Some(record) if keep(record) => return Err(record.clone()),
            Some(_) => {}
        }
        let removed = table.rows.remove(id);
        if let Some(key) = removed.as_ref().and_then(|record| record.unique_key()) {
            table.keys.remove(key);
        }
        self.touch(table.rows.len());
        Ok(removed)
    }

    /// Snapshot of every record at call time, in no particular order.
    pub async fn list(&self) -> Vec<T> {
        self.table.read().await.rows.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Clear the dirty flag and report whether it was set.
    pub(crate) fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    fn touch(&self, len: usize) {
        self.mark_dirty();
        metrics::gauge!("glmock_collection_size", "collection" => T::KIND).set(len as f64);
    }
}

fn insert_row<T: Record>(table: &mut Table<T>, record: T) -> StoreResult<()> {
    let id = record.id().to_string();
    if table.rows.contains_key(&id) {
        return Err(StoreError::Conflict(format!("{} {id} exists", T::KIND)));
    }
    if let Some(key) = record.unique_key() {
        if table.keys.contains_key(key) {
            return Err(StoreError::Conflict(format!("{} {key} exists", T::KIND)));
        }
        table.keys.insert(key.to_string(), id.clone());
    }
    table.rows.insert(id, record);
    Ok(())
}
