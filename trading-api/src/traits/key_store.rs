//! Defines the `KeyStore` trait for persisting id → key mappings.
//!
//! The platform identifies positions and orders by opaque keys; callers only
//! ever see the sequential ids handed out here. A mapping exists for every id
//! returned to a caller until it is explicitly deleted.

use crate::model::record::{ItemId, NewItem, StoredItem};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store failed.
    #[error("Key store backend error: {0}")]
    Backend(String),

    /// A stored row could not be decoded.
    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: ItemId, reason: String },

    /// An update or delete targeted an id with no mapping.
    #[error("No mapping for id {0}")]
    Missing(ItemId),
}

/// A keyed record store for internal id → platform key mappings.
///
/// Implementations must be safe to share between request handlers.
pub trait KeyStore: Send + Sync {
    /// Returns the mapping for `id`, if any.
    fn lookup(&self, id: ItemId) -> Result<Option<StoredItem>, StoreError>;

    /// Returns every stored mapping, ordered by id.
    fn list(&self) -> Result<Vec<StoredItem>, StoreError>;

    /// Stores a new mapping and returns its freshly assigned id.
    fn insert(&self, item: NewItem) -> Result<ItemId, StoreError>;

    /// Overwrites the recorded quantity of an existing mapping.
    fn update_quantity(&self, id: ItemId, quantity: i64) -> Result<(), StoreError>;

    /// Removes the mapping for `id`.
    fn delete(&self, id: ItemId) -> Result<(), StoreError>;
}
