//! Validation of untyped request bodies into typed payloads.

use crate::error::{GatewayError, Result};
use serde_json::{Map, Value};
use trading::{Direction, EditPayload, Item, Limit, LimitKind};

pub const INSTRUMENT_NOT_DEFINED: &str = "Instrument is not defined";
pub const DIRECTION_NOT_DEFINED: &str = "Direction is not defined";
pub const TYPE_NOT_DEFINED: &str = "Type is not defined";
pub const QTY_NOT_INT: &str = "qty must be int";
pub const PERCENT_OUT_OF_RANGE: &str = "percent must be between 0 and 100";
pub const VALUE_NEGATIVE: &str = "value must not be negative";

fn invalid(message: impl Into<String>) -> GatewayError {
    GatewayError::InputValidation(message.into())
}

fn object(value: &Value) -> Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| invalid(format!("Wrong data type input: '{}'", value)))
}

fn direction(data: &Map<String, Value>) -> Result<Direction> {
    match data.get("direction").and_then(Value::as_str) {
        Some(text) if !text.is_empty() => Ok(text.parse()?),
        _ => Err(invalid(DIRECTION_NOT_DEFINED)),
    }
}

/// Builds an [`Item`] from a creation request.
///
/// Expects `instrument`, `direction`, `is_order` and `qty`; `price` is only
/// required for orders. `limits.tp` / `limits.sl` are optional.
pub fn parse_item(value: &Value) -> Result<Item> {
    let data = object(value)?;
    let instrument = data
        .get("instrument")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(INSTRUMENT_NOT_DEFINED))?;
    let direction = direction(data)?;
    let is_order = data
        .get("is_order")
        .and_then(Value::as_bool)
        .ok_or_else(|| invalid(TYPE_NOT_DEFINED))?;
    let quantity = data
        .get("qty")
        .and_then(Value::as_u64)
        .and_then(|qty| i64::try_from(qty).ok())
        .ok_or_else(|| invalid(QTY_NOT_INT))?;
    let price = data.get("price").and_then(Value::as_f64);

    let mut item = Item::new(instrument, direction, quantity);
    item = match (is_order, price) {
        (true, Some(price)) => item.as_order(price),
        (true, None) => return Err(invalid("price not found")),
        (false, price) => item.with_price(price.unwrap_or_default()),
    };

    let limits = match data.get("limits") {
        None | Some(Value::Null) => None,
        Some(Value::Object(limits)) => Some(limits),
        Some(_) => return Err(invalid("error while parsing limits")),
    };
    for kind in LimitKind::ALL {
        let limit = match limits.and_then(|l| l.get(kind.as_str())) {
            None | Some(Value::Null) => Limit::default(),
            Some(raw) => serde_json::from_value(raw.clone())
                .map_err(|_| invalid("error while parsing limits"))?,
        };
        item = item.with_limit(kind, limit);
    }
    Ok(item)
}

/// Reads the `quantity` member of an edit request.
///
/// `percent` lies in `[0, 100]` for a buy and is only bounded below for a
/// sell; `value` may not be negative.
pub fn parse_edit(value: &Value) -> Result<EditPayload> {
    let data = object(value)?;
    let quantity = match data.get("quantity") {
        Some(Value::Object(quantity)) => quantity,
        _ => return Err(invalid("error while parsing args")),
    };
    let direction = direction(quantity)?;
    let number = |name: &str| quantity.get(name).and_then(Value::as_f64).unwrap_or_default();
    let payload = EditPayload {
        direction,
        is_percent: quantity
            .get("is_percent")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        percent: number("percent"),
        value: number("value"),
    };

    let ceiling = match direction {
        Direction::Buy => 100.0,
        Direction::Sell => f64::MAX,
    };
    if !(0.0..=ceiling).contains(&payload.percent) {
        return Err(invalid(PERCENT_OUT_OF_RANGE));
    }
    if payload.value < 0.0 {
        return Err(invalid(VALUE_NEGATIVE));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trading::ItemKind;

    fn message(err: GatewayError) -> String {
        match err {
            GatewayError::InputValidation(message) => message,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_market_item() {
        let item = parse_item(&json!({
            "instrument": "EURUSD",
            "direction": "buy",
            "is_order": false,
            "qty": 10,
            "limits": {"tp": {"is_use": true, "price": 1.2}}
        }))
        .unwrap();

        assert_eq!(item.instrument(), "EURUSD");
        assert_eq!(item.direction(), Direction::Buy);
        assert_eq!(item.kind(), ItemKind::Position);
        assert_eq!(item.quantity(), 10);
        assert!(item.active_limit(LimitKind::TakeProfit).is_some());
        assert!(item.active_limit(LimitKind::StopLoss).is_none());
    }

    #[test]
    fn test_order_needs_price() {
        let body = json!({"instrument": "EURUSD", "direction": "sell", "is_order": true, "qty": 1});
        assert_eq!(message(parse_item(&body).unwrap_err()), "price not found");

        let mut body = body;
        body["price"] = json!(1.05);
        let item = parse_item(&body).unwrap();
        assert_eq!(item.kind(), ItemKind::Order);
        assert_eq!(item.price(), 1.05);
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(
            message(parse_item(&json!({"direction": "buy"})).unwrap_err()),
            INSTRUMENT_NOT_DEFINED
        );
        assert_eq!(
            message(parse_item(&json!({"instrument": "X", "direction": ""})).unwrap_err()),
            DIRECTION_NOT_DEFINED
        );
        assert_eq!(
            message(parse_item(&json!({"instrument": "X", "direction": "buy"})).unwrap_err()),
            TYPE_NOT_DEFINED
        );
        assert_eq!(
            message(
                parse_item(&json!({"instrument": "X", "direction": "buy", "is_order": false, "qty": "ten"}))
                    .unwrap_err()
            ),
            QTY_NOT_INT
        );
        assert!(message(parse_item(&json!([1, 2])).unwrap_err()).starts_with("Wrong data type input"));
    }

    #[test]
    fn test_qty_must_be_a_whole_non_negative_number() {
        let body = |qty: Value| {
            json!({"instrument": "X", "direction": "buy", "is_order": false, "qty": qty})
        };
        for qty in [json!(-5), json!(2.5), json!(1e30), json!(u64::MAX)] {
            assert_eq!(message(parse_item(&body(qty)).unwrap_err()), QTY_NOT_INT);
        }
        assert_eq!(parse_item(&body(json!(0))).unwrap().quantity(), 0);
    }

    #[test]
    fn test_unknown_direction_is_unacceptable() {
        let err = parse_item(&json!({"instrument": "X", "direction": "hold", "is_order": false, "qty": 1}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Unacceptable value: hold");
    }

    #[test]
    fn test_parse_edit() {
        let payload = parse_edit(&json!({
            "quantity": {"direction": "sell", "is_percent": true, "percent": 50}
        }))
        .unwrap();
        assert_eq!(payload, EditPayload::percent(Direction::Sell, 50.0));

        assert_eq!(
            message(parse_edit(&json!({"direction": "sell"})).unwrap_err()),
            "error while parsing args"
        );
    }

    #[test]
    fn test_edit_amounts_are_bounded() {
        let edit = |direction: &str, percent: f64, value: f64| {
            parse_edit(&json!({
                "quantity": {"direction": direction, "is_percent": true, "percent": percent, "value": value}
            }))
        };

        assert_eq!(message(edit("buy", -50.0, 0.0).unwrap_err()), PERCENT_OUT_OF_RANGE);
        assert_eq!(message(edit("sell", -1.0, 0.0).unwrap_err()), PERCENT_OUT_OF_RANGE);
        assert_eq!(message(edit("buy", 150.0, 0.0).unwrap_err()), PERCENT_OUT_OF_RANGE);
        assert_eq!(message(edit("sell", 0.0, -3.0).unwrap_err()), VALUE_NEGATIVE);

        assert_eq!(edit("buy", 100.0, 0.0).unwrap().percent, 100.0);
        assert_eq!(edit("sell", 150.0, 0.0).unwrap().percent, 150.0);
    }
}
