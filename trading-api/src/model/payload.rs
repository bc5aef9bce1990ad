use super::direction::Direction;
use serde::{Deserialize, Serialize};

/// Request to change the size of an open position.
///
/// `is_percent` selects which of `percent` / `value` is meaningful; both may be
/// present on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditPayload {
    pub direction: Direction,
    pub is_percent: bool,
    pub percent: f64,
    pub value: f64,
}

impl EditPayload {
    pub fn percent(direction: Direction, percent: f64) -> Self {
        Self {
            direction,
            is_percent: true,
            percent,
            value: 0.0,
        }
    }

    pub fn absolute(direction: Direction, value: f64) -> Self {
        Self {
            direction,
            is_percent: false,
            percent: 0.0,
            value,
        }
    }
}
