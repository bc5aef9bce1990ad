//! Target quantity for an edit.

use crate::error::{GatewayError, Result};
use trading::{Direction, EditPayload};

/// Computes the quantity to type into the dialog for `payload`, given the
/// quantity the dialog currently shows.
///
/// Percentages are taken of `current` and rounded down. A sell is never
/// capped; a buy may not exceed `current`. A payload with neither a
/// percentage nor a value yields zero; a negative one is rejected.
pub fn calc_quantity(payload: &EditPayload, current: i64) -> Result<i64> {
    let amount = if payload.is_percent {
        payload.percent
    } else {
        payload.value
    };
    if !amount.is_finite() || amount < 0.0 {
        return Err(GatewayError::InputValidation(format!(
            "edit amount must not be negative: {}",
            amount
        )));
    }

    let qty = if payload.is_percent && payload.percent != 0.0 {
        (current as f64 * payload.percent / 100.0).floor() as i64
    } else if !payload.is_percent && payload.value != 0.0 {
        payload.value.floor() as i64
    } else {
        return Ok(0);
    };

    match payload.direction {
        Direction::Sell => Ok(qty),
        Direction::Buy if qty > current => Err(GatewayError::BuyNotAllowed),
        Direction::Buy => Ok(qty),
    }
}
