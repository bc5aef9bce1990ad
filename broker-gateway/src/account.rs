//! The logged-in account page: positions and orders tables plus the order
//! dialog they open.
//!
//! Every operation holds the session lock for its whole UI interaction, so
//! concurrent callers (the position synchronizer in particular) take turns
//! on the single browser session.

use crate::dialog::OrderDialog;
use crate::driver::{By, ElementHandle};
use crate::error::{GatewayError, Result};
use crate::page::Page;
use crate::selectors::fill;
use crate::session::SessionGuard;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::Mutex;
use trading::{EditPayload, Item, ItemKind, Position};

const ROW_PREFIX: &str = "item-";

pub struct AccountPage {
    page: Arc<Page>,
    guard: SessionGuard,
    session: Mutex<()>,
}

impl AccountPage {
    pub fn new(page: Arc<Page>) -> Self {
        Self {
            guard: SessionGuard::new(page.clone()),
            page,
            session: Mutex::new(()),
        }
    }

    /// Reads the info panel of the position with platform key `key`.
    pub async fn get_position(&self, key: &str) -> Result<Position> {
        let _session = self.session.lock().await;
        self.guard.check_session_expired().await?;
        self.guard.ensure_columns_visible().await?;

        info!("Get a position: {}", key);
        self.open_row(key, ItemKind::Position).await?;

        let mut dialog = OrderDialog::new(&self.page);
        let read: Result<Position> = async {
            dialog.info().await?;
            dialog.get_info().await
        }
        .await;
        if read.is_err() {
            dialog.abandon().await;
        }
        read
    }

    /// Creates a position or an order and resolves its platform key.
    ///
    /// # Returns
    ///
    /// The item with its key set.
    pub async fn add(&self, item: Item) -> Result<Item> {
        let _session = self.session.lock().await;
        self.guard.check_session_expired().await?;
        self.guard.check_date_sort_descending().await?;

        info!("Add: {:?}", item);
        let direction = item.direction();
        let quantity = item.quantity();
        let kind = item.kind();
        let limits = item.limits().clone();

        let mut dialog = OrderDialog::for_item(&self.page, item);
        let placed: Result<()> = async {
            dialog.open().await?;
            dialog.set_direction(direction).await?;
            if quantity != 0 {
                dialog.set_quantity(quantity).await?;
            }
            if !limits.is_empty() {
                dialog.set_limit(&limits).await?;
            }
            dialog.confirm().await
        }
        .await;
        if let Err(err) = placed {
            dialog.abandon().await;
            return Err(err);
        }

        let key = self.find_key(kind).await?;
        let mut item = dialog
            .into_item()
            .ok_or_else(|| GatewayError::InputValidation("Input data is not initialized".into()))?;
        item.set_key(key);
        info!(
            "Added a new {}: instrument={} quantity={} key={}",
            kind,
            item.instrument(),
            item.quantity(),
            item.key().unwrap_or_default()
        );
        Ok(item)
    }

    /// Resizes the position with key `key`.
    ///
    /// # Returns
    ///
    /// The quantity typed into the dialog.
    pub async fn edit_position(&self, key: &str, payload: &EditPayload) -> Result<i64> {
        let _session = self.session.lock().await;
        self.guard.check_session_expired().await?;

        info!("Edit {}: {:?}", key, payload);
        self.open_row(key, ItemKind::Position).await?;

        let mut dialog = OrderDialog::new(&self.page);
        let edited: Result<i64> = async {
            dialog.edit().await?;
            let quantity = dialog.edit_quantity(payload).await?;
            dialog.confirm().await?;
            Ok(quantity)
        }
        .await;
        if edited.is_err() {
            dialog.abandon().await;
        }
        edited
    }

    pub async fn delete_position(&self, key: &str) -> Result<()> {
        self.delete(key, ItemKind::Position).await
    }

    pub async fn delete_order(&self, key: &str) -> Result<()> {
        self.delete(key, ItemKind::Order).await
    }

    /// Removes a row through its context menu and acknowledges the prompt.
    pub async fn delete(&self, key: &str, target: ItemKind) -> Result<()> {
        let _session = self.session.lock().await;
        self.guard.check_session_expired().await?;

        let s = self.page.selectors();
        let timings = self.page.timings();
        let row = self.find_item(key, target).await?;
        let driver = self.page.driver();

        driver.hover(&row).await?;
        self.page.pause(timings.hover()).await;
        driver.context_click(&row).await?;
        self.page.pause(timings.context_menu()).await;

        let menu = self.page.require(&By::css(&s.context_menu)).await?;
        let remove = fill(&s.remove_item, target.table());
        let remove = driver
            .find_in(&menu, &By::css(&remove))
            .await?
            .ok_or(GatewayError::ElementNotFound(remove))?;
        driver.hover(&remove).await?;
        self.page.click(&remove).await?;
        self.page.pause(timings.hover()).await;

        if let Some(widget) = self.page.message_widget().await? {
            if let Some(ok) = driver.find_in(&widget, &By::css(&s.message_ok)).await? {
                self.page.click(&ok).await?;
            }
        }
        if let Some(widget) = self.page.message_widget().await? {
            let text = self
                .page
                .text_in(&widget, &By::css(&s.message_text))
                .await?;
            return Err(GatewayError::ConfirmationRejected(text));
        }

        info!("Deleted {} {}", target, key);
        Ok(())
    }

    /// Locates the row for `key`, switching to the target's tab once if it is
    /// not on the current one.
    pub async fn find_item(&self, key: &str, target: ItemKind) -> Result<ElementHandle> {
        let row = By::css(fill(&self.page.selectors().item_row, key));
        if let Some(row) = self.page.find(&row).await? {
            return Ok(row);
        }
        debug!("Row {} is not on the current tab", key);
        self.switch_tab(target).await?;
        self.page
            .find(&row)
            .await?
            .ok_or_else(|| GatewayError::PositionNotFound(key.to_string()))
    }

    pub async fn switch_tab(&self, target: ItemKind) -> Result<()> {
        let tab = By::css(fill(&self.page.selectors().tab, target.table()));
        let tab = self.page.require(&tab).await?;
        self.page.click(&tab).await
    }

    /// Key of the newest row of the target's table.
    pub async fn find_key(&self, target: ItemKind) -> Result<String> {
        self.switch_tab(target).await?;
        let locator = By::css(fill(&self.page.selectors().table_rows, target.table()));
        let rows = self.page.driver().find_all(&locator).await?;
        let last = rows.last().ok_or(GatewayError::TableEmpty)?;
        let id = self
            .page
            .driver()
            .attribute(last, "id")
            .await?
            .unwrap_or_default();
        let key = id.strip_prefix(ROW_PREFIX).unwrap_or(&id);
        if key.is_empty() {
            return Err(GatewayError::ElementNotFound(format!("{} [id]", locator)));
        }
        Ok(key.to_string())
    }

    /// Clicks the row for `key` to bring its dialog up.
    async fn open_row(&self, key: &str, target: ItemKind) -> Result<()> {
        let row = self.find_item(key, target).await?;
        self.page.click(&row).await?;
        self.page.pause(self.page.timings().row_click()).await;
        Ok(())
    }
}
