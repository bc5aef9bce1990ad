//! # Trading API
//!
//! Plain data types shared by the broker gateway and its callers, plus the
//! [`KeyStore`] seam that maps internal sequential ids onto the platform's
//! opaque keys.
//!
//! ## Modules
//! - `model`: Position snapshots, creation items, limits, edit payloads and
//!   stored key mappings.
//! - `traits`: The key store contract.

pub mod model;
pub mod traits;

pub use model::direction::{Direction, UnacceptableValue};
pub use model::item::{Item, ItemKind, Limit, LimitKind, Limits};
pub use model::payload::EditPayload;
pub use model::position::Position;
pub use model::record::{ItemId, NewItem, StoredItem};
pub use traits::key_store::{KeyStore, StoreError};

pub mod prelude {
    pub use crate::model::direction::Direction;
    pub use crate::model::item::{Item, ItemKind, Limit, LimitKind, Limits};
    pub use crate::model::payload::EditPayload;
    pub use crate::model::position::Position;
    pub use crate::model::record::{ItemId, NewItem, StoredItem};
    pub use crate::traits::key_store::KeyStore;
}
