//! Concurrent fetch of many positions.

use crate::account::AccountPage;
use crate::error::GatewayError;
use futures::future::join_all;
use log::{info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;
use trading::{ItemId, Position};

/// Outcome of a synchronization, keyed by internal id.
///
/// Every requested id appears in exactly one of the two maps.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub positions: BTreeMap<ItemId, Position>,
    pub failures: BTreeMap<ItemId, GatewayError>,
}

impl SyncReport {
    pub fn len(&self) -> usize {
        self.positions.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct PositionSynchronizer {
    account: Arc<AccountPage>,
}

impl PositionSynchronizer {
    pub fn new(account: Arc<AccountPage>) -> Self {
        Self { account }
    }

    /// Fetches every position in `keys` (id -> platform key) concurrently.
    ///
    /// One task is spawned per id and its result is collected under that id,
    /// so completion order has no effect on the report. The UI work itself
    /// is serialized by the account page's session lock.
    pub async fn synchronize(&self, keys: BTreeMap<ItemId, String>) -> SyncReport {
        let tasks = keys.into_iter().map(|(id, key)| {
            let account = self.account.clone();
            let handle = tokio::spawn(async move { account.get_position(&key).await });
            async move { (id, handle.await) }
        });

        let mut report = SyncReport::default();
        for (id, joined) in join_all(tasks).await {
            let result = joined
                .map_err(|e| GatewayError::TaskFailed(e.to_string()))
                .and_then(|fetched| fetched);
            match result {
                Ok(position) => {
                    report.positions.insert(id, position.with_id(id));
                }
                Err(err) => {
                    warn!("Failed to fetch position {}: {}", id, err);
                    report.failures.insert(id, err);
                }
            }
        }
        info!(
            "Synchronized {} positions, {} failed",
            report.positions.len(),
            report.failures.len()
        );
        report
    }
}
