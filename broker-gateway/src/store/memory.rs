use std::collections::BTreeMap;
use std::sync::Mutex;
use trading::{ItemId, KeyStore, NewItem, StoreError, StoredItem};

#[derive(Debug, Default)]
struct Inner {
    items: BTreeMap<ItemId, StoredItem>,
    last_id: ItemId,
}

/// Process-local key store. Ids are never reused, even after a delete.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    inner: Mutex<Inner>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

impl KeyStore for MemoryKeyStore {
    fn lookup(&self, id: ItemId) -> Result<Option<StoredItem>, StoreError> {
        Ok(self.inner()?.items.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<StoredItem>, StoreError> {
        Ok(self.inner()?.items.values().cloned().collect())
    }

    fn insert(&self, item: NewItem) -> Result<ItemId, StoreError> {
        let mut inner = self.inner()?;
        inner.last_id += 1;
        let id = inner.last_id;
        inner.items.insert(id, item.into_stored(id));
        Ok(id)
    }

    fn update_quantity(&self, id: ItemId, quantity: i64) -> Result<(), StoreError> {
        let mut inner = self.inner()?;
        let item = inner.items.get_mut(&id).ok_or(StoreError::Missing(id))?;
        item.quantity = quantity;
        Ok(())
    }

    fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        self.inner()?
            .items
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::Missing(id))
    }
}
