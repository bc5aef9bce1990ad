//! # Broker Gateway
//!
//! Drives a trading platform's web UI to open, edit, read and close
//! positions and orders, and serves those operations over HTTP keyed by
//! internal sequential ids.
//!
//! ## Modules
//! - `driver`: The UI driver seam and its WebDriver backend.
//! - `session`, `dialog`, `account`, `home`: Page objects and the order
//!   dialog state machine.
//! - `sync`: Concurrent fetch of many positions.
//! - `service`: Id-based operations over the key store and the account page.
//! - `store`: Key store backends.
//! - `api`: The HTTP boundary.
//! - `io`: Command line arguments.

pub mod account;
pub mod api;
pub mod config;
pub mod dialog;
pub mod driver;
pub mod error;
pub mod home;
pub mod input;
pub mod io;
pub mod page;
pub mod selectors;
pub mod service;
pub mod session;
pub mod store;
pub mod sync;

pub use account::AccountPage;
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use page::Page;
pub use service::TradingService;
