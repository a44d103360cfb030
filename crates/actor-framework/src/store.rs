//! # Persistence Port
//!
//! A [`Store`] is the durable key-value collection behind one `ResourceActor`. The actor owns
//! the only handle that writes to it, loads the collection once when its loop starts, and writes
//! through on every committed change.
//!
//! Two implementations ship with the framework:
//!
//! - [`MemoryStore`] - a shared in-memory map. Cloning the handle shares the data, which lets
//!   tests seed a collection and inspect what the actor committed.
//! - [`JsonFileStore`] - one JSON document per collection, rewritten atomically on each commit.

use crate::entity::ActorEntity;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Errors raised by a persistence backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("I/O failure: {0}")]
    Io(String),
    #[error("Encoding failure: {0}")]
    Codec(String),
    #[error("Write rejected: {0}")]
    Rejected(String),
}

/// Durable collection of entities keyed by their id.
pub trait Store<T: ActorEntity>: Send + 'static {
    /// Every persisted entity, in no particular order.
    fn load_all(&self) -> Result<Vec<T>, StoreError>;

    /// Insert or replace all `items` as one write. Either all of them land or none do.
    fn put_many(&mut self, items: &[T]) -> Result<(), StoreError>;

    /// Remove one entity. Removing a missing id is not an error.
    fn remove(&mut self, id: &T::Id) -> Result<(), StoreError>;
}

impl<T: ActorEntity> Store<T> for Box<dyn Store<T>> {
    fn load_all(&self) -> Result<Vec<T>, StoreError> {
        (**self).load_all()
    }

    fn put_many(&mut self, items: &[T]) -> Result<(), StoreError> {
        (**self).put_many(items)
    }

    fn remove(&mut self, id: &T::Id) -> Result<(), StoreError> {
        (**self).remove(id)
    }
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Shared in-memory store.
pub struct MemoryStore<T: ActorEntity> {
    items: Arc<Mutex<HashMap<T::Id, T>>>,
}

impl<T: ActorEntity> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T: ActorEntity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// A store pre-populated with `items`.
    pub fn with_items(items: impl IntoIterator<Item = T>) -> Self {
        let map = items
            .into_iter()
            .map(|item| (item.id().clone(), item))
            .collect();
        Self {
            items: Arc::new(Mutex::new(map)),
        }
    }

    /// Current contents of the store, ordered by id.
    pub fn snapshot(&self) -> Vec<T> {
        let mut items: Vec<T> = self.lock().values().cloned().collect();
        items.sort_by(|a, b| a.id().cmp(b.id()));
        items
    }

    pub fn get(&self, id: &T::Id) -> Option<T> {
        self.lock().get(id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<T::Id, T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: ActorEntity> Store<T> for MemoryStore<T> {
    fn load_all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.lock().values().cloned().collect())
    }

    fn put_many(&mut self, items: &[T]) -> Result<(), StoreError> {
        let mut map = self.lock();
        for item in items {
            map.insert(item.id().clone(), item.clone());
        }
        Ok(())
    }

    fn remove(&mut self, id: &T::Id) -> Result<(), StoreError> {
        self.lock().remove(id);
        Ok(())
    }
}

// =============================================================================
// JSON FILE STORE
// =============================================================================

/// Persists a whole collection as a JSON array in a single file.
///
/// Every commit serializes the full collection to `<file>.tmp` and renames it over the
/// original, so a crash mid-write leaves the previous version intact.
pub struct JsonFileStore<T: ActorEntity> {
    path: PathBuf,
    items: HashMap<T::Id, T>,
}

impl<T> JsonFileStore<T>
where
    T: ActorEntity + Serialize + DeserializeOwned,
{
    /// Opens (or prepares to create) the collection at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let items = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|e| StoreError::Io(e.to_string()))?;
            let list: Vec<T> =
                serde_json::from_str(&raw).map_err(|e| StoreError::Codec(e.to_string()))?;
            list.into_iter()
                .map(|item| (item.id().clone(), item))
                .collect()
        } else {
            HashMap::new()
        };
        debug!(path = %path.display(), count = items.len(), "Opened json store");
        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, items: &HashMap<T::Id, T>) -> Result<(), StoreError> {
        let mut list: Vec<&T> = items.values().collect();
        list.sort_by(|a, b| a.id().cmp(b.id()));
        let body =
            serde_json::to_string_pretty(&list).map_err(|e| StoreError::Codec(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| StoreError::Io(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::Io(e.to_string()))
    }
}

impl<T> Store<T> for JsonFileStore<T>
where
    T: ActorEntity + Serialize + DeserializeOwned,
{
    fn load_all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.items.values().cloned().collect())
    }

    fn put_many(&mut self, items: &[T]) -> Result<(), StoreError> {
        let mut next = self.items.clone();
        for item in items {
            next.insert(item.id().clone(), item.clone());
        }
        self.write(&next)?;
        self.items = next;
        Ok(())
    }

    fn remove(&mut self, id: &T::Id) -> Result<(), StoreError> {
        if !self.items.contains_key(id) {
            return Ok(());
        }
        let mut next = self.items.clone();
        next.remove(id);
        self.write(&next)?;
        self.items = next;
        Ok(())
    }
}
