//! Normalises the account page before a dialog is driven: dismisses the
//! session-expired notice, keeps the table sorted by creation date and makes
//! every column visible.

use crate::driver::{By, Condition, DriverError, ElementHandle};
use crate::error::{GatewayError, Result};
use crate::page::Page;
use futures::future::join_all;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const SESSION_EXPIRED: &str = "Session has expired";
pub const SORT_ASCENDING: &str = "sort-ascending";
pub const SELECTED: &str = "selected";

pub struct SessionGuard {
    page: Arc<Page>,
    /// Set once every column toggle has been checked.
    columns_visible: Mutex<bool>,
}

impl SessionGuard {
    pub fn new(page: Arc<Page>) -> Self {
        Self {
            page,
            columns_visible: Mutex::new(false),
        }
    }

    /// Dismisses the session-expired notice and waits for the message widget
    /// to go away.
    ///
    /// # Returns
    ///
    /// * `Err(SessionExpired)` if a message widget is still showing after the
    ///   session-expiry timeout.
    pub async fn check_session_expired(&self) -> Result<()> {
        let selectors = self.page.selectors();
        if let Some(widget) = self.page.message_widget().await? {
            let text = self
                .page
                .text_in(&widget, &By::css(&selectors.message_text))
                .await?;
            if text.contains(SESSION_EXPIRED) {
                debug!("Session is expired");
                let ok = self
                    .page
                    .driver()
                    .find_in(&widget, &By::css(&selectors.message_ok))
                    .await?;
                if let Some(ok) = ok {
                    self.page.click(&ok).await?;
                }
            }
        }

        let widget = Condition::Absent(By::css(&selectors.widget_message));
        self.page
            .driver()
            .wait_until(&widget, self.page.timings().session_expiry_timeout())
            .await
            .map_err(|err| match err {
                DriverError::Timeout(..) => GatewayError::SessionExpired,
                other => other.into(),
            })
    }

    /// Clicks the "date created" header until it carries the sort marker.
    pub async fn check_date_sort_descending(&self) -> Result<()> {
        let header = By::css(&self.page.selectors().date_created_header);
        if let Some(header) = self.page.find(&header).await? {
            self.ensure_class(&header, SORT_ASCENDING, self.page.timings().sort_click())
                .await?;
        }
        Ok(())
    }

    /// Turns on every column of the results table, once per session.
    ///
    /// The toggles are checked concurrently. The session is only marked as
    /// configured after a complete pass; a missing settings menu leaves it
    /// unmarked so the next call tries again.
    pub async fn ensure_columns_visible(&self) -> Result<()> {
        let mut visible = self.columns_visible.lock().await;
        if *visible {
            return Ok(());
        }

        let selectors = self.page.selectors();
        let Some(settings) = self.page.find(&By::css(&selectors.table_settings)).await? else {
            debug!("Table settings control is not rendered");
            return Ok(());
        };
        self.page.click(&settings).await?;
        self.page.pause(self.page.timings().settings_menu()).await;

        let Some(menu) = self.page.find(&By::xpath(&selectors.settings_menu)).await? else {
            debug!("Table settings menu did not open");
            return Ok(());
        };

        let toggles = selectors
            .column_toggles
            .iter()
            .map(|css| self.ensure_column(&menu, css));
        for result in join_all(toggles).await {
            result?;
        }

        *visible = true;
        info!("All table columns are visible");
        Ok(())
    }

    async fn ensure_column(&self, menu: &ElementHandle, css: &str) -> Result<()> {
        let item = self.page.driver().find_in(menu, &By::css(css)).await?;
        if let Some(item) = item {
            self.ensure_class(&item, SELECTED, Duration::ZERO).await?;
        }
        Ok(())
    }

    /// Clicks `element` unless its class list already contains `marker`.
    async fn ensure_class(
        &self,
        element: &ElementHandle,
        marker: &str,
        pause: Duration,
    ) -> Result<bool> {
        let class = self
            .page
            .driver()
            .attribute(element, "class")
            .await?
            .unwrap_or_default();
        if class.contains(marker) {
            return Ok(false);
        }
        self.page.click(element).await?;
        self.page.pause(pause).await;
        Ok(true)
    }
}
