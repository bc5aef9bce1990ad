//! [`KeyStore`](trading::KeyStore) backends.

mod memory;
mod sqlite;

pub use memory::MemoryKeyStore;
pub use sqlite::SqliteKeyStore;

use crate::config::{StoreBackend, StoreConfig};
use std::sync::Arc;
use trading::{KeyStore, StoreError};

/// Opens the backend selected by `config`.
pub fn open(config: &StoreConfig) -> Result<Arc<dyn KeyStore>, StoreError> {
    Ok(match config.backend {
        StoreBackend::Sqlite => Arc::new(SqliteKeyStore::open(&config.path)?),
        StoreBackend::Memory => Arc::new(MemoryKeyStore::new()),
    })
}
