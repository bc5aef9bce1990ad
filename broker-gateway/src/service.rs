//! The operations exposed to callers, in terms of internal ids.
//!
//! Each call resolves the id through the key store before touching the UI,
//! so an unknown id fails with `NotFound` without any interaction.

use crate::account::AccountPage;
use crate::error::{GatewayError, Result};
use crate::sync::{PositionSynchronizer, SyncReport};
use log::info;
use serde::Serialize;
use std::sync::Arc;
use trading::{EditPayload, Item, ItemId, KeyStore, NewItem, Position, StoredItem};

/// Identifiers of a newly created position or order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Added {
    pub id: ItemId,
    pub key: String,
}

pub struct TradingService {
    store: Arc<dyn KeyStore>,
    account: Arc<AccountPage>,
    synchronizer: PositionSynchronizer,
}

impl TradingService {
    pub fn new(store: Arc<dyn KeyStore>, account: Arc<AccountPage>) -> Self {
        Self {
            synchronizer: PositionSynchronizer::new(account.clone()),
            store,
            account,
        }
    }

    fn lookup(&self, id: ItemId) -> Result<StoredItem> {
        self.store.lookup(id)?.ok_or(GatewayError::NotFound(id))
    }

    pub async fn get_position(&self, id: ItemId) -> Result<Position> {
        let stored = self.lookup(id)?;
        let position = self.account.get_position(&stored.key).await?;
        Ok(position.with_id(id))
    }

    /// Fetches every stored position.
    pub async fn get_positions(&self) -> Result<SyncReport> {
        let keys = self
            .store
            .list()?
            .into_iter()
            .map(|item| (item.id, item.key))
            .collect();
        Ok(self.synchronizer.synchronize(keys).await)
    }

    /// Creates the item on the platform and records its key.
    pub async fn add_position(&self, item: Item) -> Result<Added> {
        let item = self.account.add(item).await?;
        let key = item.key().unwrap_or_default().to_string();
        let id = self.store.insert(NewItem {
            instrument: item.instrument().to_string(),
            key: key.clone(),
            direction: item.direction(),
            quantity: item.quantity(),
            price: item.price(),
        })?;
        info!("Mapped {} {} to id {}", item.kind(), key, id);
        Ok(Added { id, key })
    }

    /// Resizes a position.
    ///
    /// The typed quantity is added to the stored quantity whatever the
    /// direction of the edit.
    ///
    /// # Returns
    ///
    /// The stored quantity after the edit.
    pub async fn edit_position(&self, id: ItemId, payload: EditPayload) -> Result<i64> {
        let stored = self.lookup(id)?;
        let delta = self.account.edit_position(&stored.key, &payload).await?;
        let quantity = stored.quantity + delta;
        self.store.update_quantity(id, quantity)?;
        info!(
            "Edited position {} ({}): quantity {} -> {}",
            id, stored.instrument, stored.quantity, quantity
        );
        Ok(quantity)
    }

    pub async fn delete_position(&self, id: ItemId) -> Result<()> {
        let stored = self.lookup(id)?;
        self.account.delete_position(&stored.key).await?;
        self.store.delete(id)?;
        info!("Deleted position {}", id);
        Ok(())
    }

    pub async fn delete_order(&self, id: ItemId) -> Result<()> {
        let stored = self.lookup(id)?;
        self.account.delete_order(&stored.key).await?;
        self.store.delete(id)?;
        info!("Deleted order {}", id);
        Ok(())
    }
}
