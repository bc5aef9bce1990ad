//! Shared handle on the platform UI: the driver plus the locators and timings
//! every page object needs.

use crate::config::Timings;
use crate::driver::{self, By, ElementHandle, UiDriver};
use crate::error::Result;
use crate::selectors::Selectors;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

pub struct Page {
    driver: Arc<dyn UiDriver>,
    selectors: Selectors,
    timings: Timings,
}

impl Page {
    pub fn new(driver: Arc<dyn UiDriver>, selectors: Selectors, timings: Timings) -> Self {
        Self {
            driver,
            selectors,
            timings,
        }
    }

    pub fn driver(&self) -> &dyn UiDriver {
        self.driver.as_ref()
    }

    pub fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub async fn find(&self, by: &By) -> Result<Option<ElementHandle>> {
        Ok(self.driver.find(by).await?)
    }

    /// Like [`Page::find`] but a missing element is an `ElementNotFound` error.
    pub async fn require(&self, by: &By) -> Result<ElementHandle> {
        driver::require(self.driver(), by).await
    }

    pub async fn click(&self, element: &ElementHandle) -> Result<()> {
        Ok(self.driver.click(element).await?)
    }

    /// Text of the element located by `by`; empty when it is not rendered.
    pub async fn text_of(&self, by: &By) -> Result<String> {
        driver::text_or_empty(self.driver(), by).await
    }

    /// Text of a descendant of `parent`; empty when it is not rendered.
    pub async fn text_in(&self, parent: &ElementHandle, by: &By) -> Result<String> {
        match self.driver.find_in(parent, by).await? {
            Some(element) => Ok(self.driver.text(&element).await?),
            None => Ok(String::new()),
        }
    }

    /// Finds the message widget, if one is showing.
    pub async fn message_widget(&self) -> Result<Option<ElementHandle>> {
        self.find(&By::css(&self.selectors.widget_message)).await
    }

    pub async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            sleep(duration).await;
        }
    }
}
