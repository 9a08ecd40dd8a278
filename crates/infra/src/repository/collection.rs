use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use coursegate_core::Entity;

use super::StoreError;

/// In-memory entity collection for tests/dev.
///
/// All reads and writes go through one lock, so a closure passed to
/// [`InMemoryCollection::write`] observes and mutates state atomically.
#[derive(Debug)]
pub struct InMemoryCollection<T: Entity> {
    inner: RwLock<HashMap<T::Id, T>>,
}

impl<T: Entity> InMemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, HashMap<T::Id, T>>, StoreError> {
        self.inner
            .read()
            .map_err(|_| poisoned())
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, HashMap<T::Id, T>>, StoreError> {
        self.inner
            .write()
            .map_err(|_| poisoned())
    }

    /// Run `f` with exclusive access to the whole collection.
    pub fn write<R>(
        &self,
        f: impl FnOnce(&mut HashMap<T::Id, T>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut map = self.write_guard()?;
        f(&mut map)
    }

    pub fn remove(&self, id: &T::Id) -> Result<bool, StoreError> {
        Ok(self.write_guard()?.remove(id).is_some())
    }

    pub fn retain(&self, mut keep: impl FnMut(&T) -> bool) -> Result<usize, StoreError> {
        let mut map = self.write_guard()?;
        let before = map.len();
        map.retain(|_id, v| keep(v));
        Ok(before - map.len())
    }
}

impl<T: Entity + Clone> InMemoryCollection<T> {
    pub fn get(&self, id: &T::Id) -> Result<Option<T>, StoreError> {
        Ok(self.read_guard()?.get(id).cloned())
    }

    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Result<Option<T>, StoreError> {
        Ok(self.read_guard()?.values().find(|v| pred(v)).cloned())
    }

    pub fn filter(&self, mut pred: impl FnMut(&T) -> bool) -> Result<Vec<T>, StoreError> {
        Ok(self
            .read_guard()?
            .values()
            .filter(|v| pred(v))
            .cloned()
            .collect())
    }
}

fn poisoned() -> StoreError {
    tracing::error!("in-memory collection lock poisoned");
    StoreError::Storage("collection lock poisoned".to_string())
}

impl<T: Entity> Default for InMemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}
