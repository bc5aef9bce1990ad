//! Records persisted by a [`KeyStore`](crate::traits::key_store::KeyStore).

use super::direction::Direction;
use serde::{Deserialize, Serialize};

/// Internal sequential identifier handed out to callers.
pub type ItemId = i64;

/// A stored mapping from an internal id to the platform key, with the
/// creation details recorded alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredItem {
    pub id: ItemId,
    pub instrument: String,
    pub key: String,
    pub direction: Direction,
    pub quantity: i64,
    pub price: f64,
}

/// Values for a mapping that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub instrument: String,
    pub key: String,
    pub direction: Direction,
    pub quantity: i64,
    pub price: f64,
}

impl NewItem {
    pub fn into_stored(self, id: ItemId) -> StoredItem {
        StoredItem {
            id,
            instrument: self.instrument,
            key: self.key,
            direction: self.direction,
            quantity: self.quantity,
            price: self.price,
        }
    }
}
