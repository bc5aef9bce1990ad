//! Read snapshot of an open position as shown in the platform's info panel.

use super::record::ItemId;
use serde::{Deserialize, Serialize};

/// A position as read from the trading dialog.
///
/// Built once by the dialog's info read and never mutated afterwards; the
/// internal `id` is attached by the caller that resolved the key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    instrument: String,
    id: ItemId,
    quantity: i64,
    direction: String,
    price: f64,
    current_price: f64,
    take_profit: String,
    stop_loss: String,
    trailing_stop: String,
    margin: f64,
    result: f64,
    date_created: String,
}

impl Position {
    /// Creates a snapshot for the given instrument with every other field zeroed.
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = direction.into();
        self
    }

    /// Sets the entry and current prices.
    pub fn with_prices(mut self, price: f64, current_price: f64) -> Self {
        self.price = price;
        self.current_price = current_price;
        self
    }

    /// Sets the raw take-profit, stop-loss and trailing-stop descriptors.
    pub fn with_exits(
        mut self,
        take_profit: impl Into<String>,
        stop_loss: impl Into<String>,
        trailing_stop: impl Into<String>,
    ) -> Self {
        self.take_profit = take_profit.into();
        self.stop_loss = stop_loss.into();
        self.trailing_stop = trailing_stop.into();
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_result(mut self, result: f64) -> Self {
        self.result = result;
        self
    }

    pub fn with_date_created(mut self, date_created: impl Into<String>) -> Self {
        self.date_created = date_created.into();
        self
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn direction(&self) -> &str {
        &self.direction
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn take_profit(&self) -> &str {
        &self.take_profit
    }

    pub fn stop_loss(&self) -> &str {
        &self.stop_loss
    }

    pub fn trailing_stop(&self) -> &str {
        &self.trailing_stop
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn result(&self) -> f64 {
        self.result
    }

    pub fn date_created(&self) -> &str {
        &self.date_created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_snake_case_fields() {
        let position = Position::new("EURUSD")
            .with_id(7)
            .with_quantity(10)
            .with_direction("Buy")
            .with_prices(1.1, 1.2)
            .with_margin(33.5);

        let json = serde_json::to_value(&position).unwrap();
        assert_eq!(json["instrument"], "EURUSD");
        assert_eq!(json["id"], 7);
        assert_eq!(json["current_price"], 1.2);
        assert_eq!(json["trailing_stop"], "");
    }
}
