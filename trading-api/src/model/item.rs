//! Pending creation payload for a position or an order.

use super::direction::Direction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Whether an item is a market position or a pending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Position,
    Order,
}

impl ItemKind {
    /// Name of the platform table holding items of this kind.
    pub fn table(&self) -> &'static str {
        match self {
            ItemKind::Position => "positions",
            ItemKind::Order => "orders",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Position => f.write_str("position"),
            ItemKind::Order => f.write_str("order"),
        }
    }
}

/// Name of a conditional exit attached to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LimitKind {
    #[serde(rename = "tp")]
    TakeProfit,
    #[serde(rename = "sl")]
    StopLoss,
}

impl LimitKind {
    pub const ALL: [LimitKind; 2] = [LimitKind::TakeProfit, LimitKind::StopLoss];

    pub fn as_str(&self) -> &'static str {
        match self {
            LimitKind::TakeProfit => "tp",
            LimitKind::StopLoss => "sl",
        }
    }
}

/// A take-profit or stop-loss setting.
///
/// Only meaningful when `is_use` is set; the other fields are ignored otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limit {
    pub is_use: bool,
    pub price: f64,
    pub distance: f64,
    pub result: f64,
}

impl Limit {
    pub fn active() -> Self {
        Self {
            is_use: true,
            ..Self::default()
        }
    }
}

pub type Limits = BTreeMap<LimitKind, Limit>;

/// A validated request to create a position or an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    instrument: String,
    key: Option<String>,
    quantity: i64,
    price: f64,
    direction: Direction,
    kind: ItemKind,
    limits: Limits,
}

impl Item {
    pub fn new(instrument: impl Into<String>, direction: Direction, quantity: i64) -> Self {
        Self {
            instrument: instrument.into(),
            key: None,
            quantity,
            price: 0.0,
            direction,
            kind: ItemKind::Position,
            limits: Limits::new(),
        }
    }

    /// Turns the item into a pending order at `price`.
    pub fn as_order(mut self, price: f64) -> Self {
        self.kind = ItemKind::Order;
        self.price = price;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_limit(mut self, kind: LimitKind, limit: Limit) -> Self {
        self.limits.insert(kind, limit);
        self
    }

    /// Records the platform key resolved after confirmation.
    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = Some(key.into());
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Returns the limit if it is present and active.
    pub fn active_limit(&self, kind: LimitKind) -> Option<&Limit> {
        self.limits.get(&kind).filter(|l| l.is_use)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_deserialize_from_short_names() {
        let limits: Limits =
            serde_json::from_str(r#"{"tp": {"is_use": true, "price": 1.2}, "sl": {}}"#).unwrap();

        assert!(limits[&LimitKind::TakeProfit].is_use);
        assert_eq!(limits[&LimitKind::TakeProfit].price, 1.2);
        assert!(!limits[&LimitKind::StopLoss].is_use);
    }

    #[test]
    fn test_active_limit_ignores_inactive_entries() {
        let item = Item::new("EURUSD", Direction::Buy, 10)
            .with_limit(LimitKind::TakeProfit, Limit::active())
            .with_limit(LimitKind::StopLoss, Limit::default());

        assert!(item.active_limit(LimitKind::TakeProfit).is_some());
        assert!(item.active_limit(LimitKind::StopLoss).is_none());
        assert_eq!(item.key(), None);
    }
}
