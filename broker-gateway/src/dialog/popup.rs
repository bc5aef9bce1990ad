//! Transient notifications shown while an order dialog is being filled.

use crate::error::{GatewayError, QuantityBound, Result};

pub const INSUFFICIENT_FUNDS: &str = "Insufficient Funds";
pub const MAXIMUM_QUANTITY: &str = "Maximum Quantity Limit";
pub const MINIMUM_QUANTITY: &str = "Minimum Quantity Limit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    InsufficientFunds,
    /// Any title the gateway does not act on.
    Other(String),
}

/// Interprets a notification by its title.
///
/// Quantity-limit notices are errors carrying the limit from the body; an
/// unreadable body gives a limit of zero.
pub fn classify(title: &str, body: &str) -> Result<Notice> {
    let bound = match title.trim() {
        INSUFFICIENT_FUNDS => return Ok(Notice::InsufficientFunds),
        MAXIMUM_QUANTITY => QuantityBound::Max,
        MINIMUM_QUANTITY => QuantityBound::Min,
        other => return Ok(Notice::Other(other.to_string())),
    };
    let limit = body.trim().parse().unwrap_or(0);
    Err(GatewayError::QuantityLimit { bound, limit })
}
