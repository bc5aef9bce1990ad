//! The UI driver seam.
//!
//! Everything the gateway does to the trading platform goes through
//! [`UiDriver`]: locate, click, type, read. Element handles are lookups into
//! driver-owned state and are never kept past the interaction that found them.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};

#[cfg(any(test, feature = "test-utils"))]
pub mod fake;
pub mod webdriver;

/// How an element is located.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum By {
    Id(String),
    Css(String),
    XPath(String),
    LinkText(String),
    PartialLinkText(String),
    Name(String),
    Tag(String),
    Class(String),
}

impl By {
    pub fn id(locator: impl Into<String>) -> Self {
        By::Id(locator.into())
    }

    pub fn css(locator: impl Into<String>) -> Self {
        By::Css(locator.into())
    }

    pub fn xpath(locator: impl Into<String>) -> Self {
        By::XPath(locator.into())
    }

    pub fn locator(&self) -> &str {
        match self {
            By::Id(l)
            | By::Css(l)
            | By::XPath(l)
            | By::LinkText(l)
            | By::PartialLinkText(l)
            | By::Name(l)
            | By::Tag(l)
            | By::Class(l) => l,
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            By::Id(_) => "id",
            By::Css(_) => "css",
            By::XPath(_) => "xpath",
            By::LinkText(_) => "link",
            By::PartialLinkText(_) => "partial-link",
            By::Name(_) => "name",
            By::Tag(_) => "tag",
            By::Class(_) => "class",
        };
        write!(f, "{}={}", kind, self.locator())
    }
}

/// Opaque reference to an element inside the driver's session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A predicate [`UiDriver::wait_until`] polls for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Present(By),
    Absent(By),
}

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Timed out after {0:?} waiting for {1}")]
    Timeout(Duration, String),

    #[error("Stale element {0}")]
    StaleElement(String),

    #[error("WebDriver request failed: {0}")]
    Transport(String),

    #[error("WebDriver protocol error: {error}: {message}")]
    Protocol { error: String, message: String },
}

/// Capability surface of a browser (or browser-like) session.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for the
/// session itself misbehaving.
#[async_trait]
pub trait UiDriver: Send + Sync {
    async fn find(&self, by: &By) -> Result<Option<ElementHandle>, DriverError>;

    async fn find_all(&self, by: &By) -> Result<Vec<ElementHandle>, DriverError>;

    /// Looks `by` up among the descendants of `parent`.
    async fn find_in(
        &self,
        parent: &ElementHandle,
        by: &By,
    ) -> Result<Option<ElementHandle>, DriverError>;

    async fn click(&self, element: &ElementHandle) -> Result<(), DriverError>;

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), DriverError>;

    async fn text(&self, element: &ElementHandle) -> Result<String, DriverError>;

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, DriverError>;

    /// Moves the pointer over the element.
    async fn hover(&self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Right-clicks the element.
    async fn context_click(&self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Title of the current page.
    async fn title(&self) -> Result<String, DriverError>;

    /// Interval between two evaluations in [`UiDriver::wait_until`].
    fn poll_interval(&self) -> Duration {
        Duration::from_millis(100)
    }

    /// Polls `condition` until it holds or `timeout` elapses.
    ///
    /// The condition is always evaluated at least once, so a zero timeout is a
    /// single check.
    async fn wait_until(&self, condition: &Condition, timeout: Duration) -> Result<(), DriverError> {
        let deadline = Instant::now() + timeout;
        loop {
            let holds = match condition {
                Condition::Present(by) => match self.find(by).await? {
                    Some(element) => self.is_displayed(&element).await.unwrap_or(false),
                    None => false,
                },
                Condition::Absent(by) => self.find(by).await?.is_none(),
            };
            if holds {
                return Ok(());
            }
            if Instant::now() >= deadline {
                let what = match condition {
                    Condition::Present(by) => format!("{} to appear", by),
                    Condition::Absent(by) => format!("{} to disappear", by),
                };
                return Err(DriverError::Timeout(timeout, what));
            }
            sleep(self.poll_interval()).await;
        }
    }
}

/// Finds `by` or fails with `ElementNotFound` naming the locator.
pub async fn require(
    driver: &dyn UiDriver,
    by: &By,
) -> crate::error::Result<ElementHandle> {
    driver
        .find(by)
        .await?
        .ok_or_else(|| crate::error::GatewayError::ElementNotFound(by.locator().to_string()))
}

/// Text of the first element matching `by`, or an empty string when absent.
pub async fn text_or_empty(driver: &dyn UiDriver, by: &By) -> crate::error::Result<String> {
    match driver.find(by).await? {
        Some(element) => Ok(driver.text(&element).await?),
        None => Ok(String::new()),
    }
}
