use super::*;
use crate::config::Timings;
use crate::driver::fake::{Effect, FakeDriver, FakeElement};
use crate::error::QuantityBound;
use crate::selectors::Selectors;
use std::sync::Arc;
use trading::Limit;

fn setup() -> (Arc<FakeDriver>, Page) {
    let driver = Arc::new(FakeDriver::new());
    let page = Page::new(driver.clone(), Selectors::default(), Timings::immediate());
    (driver, page)
}

fn css(locator: impl Into<String>) -> By {
    By::css(locator)
}

fn result_row(s: &Selectors, n: usize) -> By {
    By::xpath(format!("{}[{}]", s.result_row, n))
}

/// Renders the create control, the search box and the given search results.
fn render_search(driver: &FakeDriver, s: &Selectors, results: &[&str]) {
    driver.add(css(&s.add_order), FakeElement::new());
    driver.add(css(&s.search_box), FakeElement::new());
    driver.add(css(&s.dialog_close), FakeElement::new());
    for (i, name) in results.iter().enumerate() {
        driver.add(
            result_row(s, i + 1),
            FakeElement::new().with_child(css(&s.result_name), FakeElement::text(*name)),
        );
    }
}

fn render_dialog(driver: &FakeDriver, s: &Selectors) {
    driver.add(css(&s.dialog), FakeElement::new());
    driver.add(css(&s.dialog_close), FakeElement::new());
}

fn message(s: &Selectors, title: &str, text: &str) -> FakeElement {
    FakeElement::new()
        .with_child(css(&s.message_title), FakeElement::text(title))
        .with_child(css(&s.message_text), FakeElement::text(text))
}

#[tokio::test]
async fn test_confirm_and_close_require_active_state() {
    let (driver, page) = setup();
    let s = page.selectors().clone();
    render_dialog(&driver, &s);
    driver.add(css(&s.confirm_button), FakeElement::new());

    let mut dialog = OrderDialog::new(&page);
    assert!(matches!(dialog.confirm().await, Err(GatewayError::DialogNotOpen)));
    assert!(matches!(dialog.close().await, Err(GatewayError::DialogNotOpen)));
    assert!(driver.clicks().is_empty());

    dialog.edit().await.unwrap();
    dialog.close().await.unwrap();
    assert_eq!(dialog.state(), DialogState::Closed);

    assert!(matches!(dialog.confirm().await, Err(GatewayError::DialogNotOpen)));
    assert!(matches!(dialog.close().await, Err(GatewayError::DialogNotOpen)));
    assert!(matches!(dialog.edit().await, Err(GatewayError::DialogNotOpen)));
    assert_eq!(driver.clicks().len(), 1);
}

#[tokio::test]
async fn test_inputs_require_active_state() {
    let (driver, page) = setup();
    let dialog = OrderDialog::new(&page);

    assert!(matches!(dialog.set_quantity(5).await, Err(GatewayError::DialogNotOpen)));
    assert!(matches!(dialog.get_quantity().await, Err(GatewayError::DialogNotOpen)));
    assert!(matches!(
        dialog.set_direction(Direction::Buy).await,
        Err(GatewayError::DialogNotOpen)
    ));
    assert!(matches!(dialog.get_price().await, Err(GatewayError::DialogNotOpen)));
    assert!(matches!(dialog.get_info().await, Err(GatewayError::DialogNotOpen)));
    assert!(driver.actions().is_empty());
}

#[tokio::test]
async fn test_edit_needs_rendered_dialog() {
    let (_driver, page) = setup();
    let mut dialog = OrderDialog::new(&page);
    assert!(matches!(dialog.edit().await, Err(GatewayError::DialogNotOpen)));
    assert!(matches!(dialog.info().await, Err(GatewayError::DialogNotOpen)));
    assert_eq!(dialog.state(), DialogState::Init);
}

#[tokio::test]
async fn test_open_selects_matching_instrument() {
    let (driver, page) = setup();
    let s = page.selectors().clone();
    render_search(&driver, &s, &["EURUSD", ""]);

    let item = Item::new("EURUSD", Direction::Buy, 10);
    let mut dialog = OrderDialog::for_item(&page, item);
    dialog.open().await.unwrap();

    assert_eq!(dialog.state(), DialogState::Open);
    assert_eq!(driver.keys(&css(&s.search_box)), vec!["EURUSD"]);
    assert_eq!(driver.click_count(&css(&s.add_order)), 1);
    assert_eq!(driver.click_count(&result_row(&s, 1)), 1);
    assert!(!dialog.insufficient_funds());
}

#[tokio::test]
async fn test_open_falls_back_to_empty_table_entry() {
    let (driver, page) = setup();
    let s = page.selectors().clone();
    render_search(&driver, &s, &["EUR/USD", ""]);
    driver.remove(&css(&s.add_order));
    driver.add(css(&s.add_order), FakeElement::new().hidden());
    driver.add(css(&s.empty_table_entry), FakeElement::new());

    let mut dialog = OrderDialog::for_item(&page, Item::new("eurusd", Direction::Sell, 1));
    dialog.open().await.unwrap();

    assert_eq!(driver.click_count(&css(&s.add_order)), 0);
    assert_eq!(driver.click_count(&css(&s.empty_table_entry)), 1);
}

#[tokio::test]
async fn test_open_unknown_instrument_closes_dialog() {
    let (driver, page) = setup();
    let s = page.selectors().clone();
    render_search(&driver, &s, &["EUR/USD", "EUR/GBP", ""]);

    let mut dialog = OrderDialog::for_item(&page, Item::new("XYZ", Direction::Buy, 1));
    let err = dialog.open().await.unwrap_err();

    assert!(matches!(err, GatewayError::InstrumentNotFound(ref name) if name == "XYZ"));
    assert_eq!(driver.click_count(&css(&s.dialog_close)), 1);
    assert_eq!(dialog.state(), DialogState::Init);
}

#[tokio::test]
async fn test_open_with_no_results() {
    let (driver, page) = setup();
    let s = page.selectors().clone();
    render_search(&driver, &s, &[]);

    let mut dialog = OrderDialog::for_item(&page, Item::new("EURUSD", Direction::Buy, 1));
    assert!(matches!(
        dialog.open().await,
        Err(GatewayError::InstrumentNotFound(_))
    ));
    assert_eq!(driver.click_count(&css(&s.dialog_close)), 1);
}

#[tokio::test]
async fn test_open_fails_on_quantity_limit_notice() {
    let (driver, page) = setup();
    let s = page.selectors().clone();
    render_search(&driver, &s, &["EURUSD", ""]);
    driver.on_click(
        &result_row(&s, 1),
        vec![Effect::Insert(
            css(&s.widget_message),
            message(&s, "Maximum Quantity Limit", "500"),
        )],
    );

    let mut dialog = OrderDialog::for_item(&page, Item::new("EURUSD", Direction::Buy, 900));
    match dialog.open().await {
        Err(GatewayError::QuantityLimit { bound, limit }) => {
            assert_eq!(bound, QuantityBound::Max);
            assert_eq!(limit, 500);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(dialog.state(), DialogState::Init);
}

#[tokio::test]
async fn test_open_tolerates_insufficient_funds() {
    let (driver, page) = setup();
    let s = page.selectors().clone();
    render_search(&driver, &s, &["EURUSD", ""]);
    driver.on_click(
        &result_row(&s, 1),
        vec![Effect::Insert(
            css(&s.widget_message),
            message(&s, "Insufficient Funds", "Deposit to continue"),
        )],
    );

    let mut dialog = OrderDialog::for_item(&page, Item::new("EURUSD", Direction::Buy, 900));
    dialog.open().await.unwrap();

    assert!(dialog.insufficient_funds());
    assert_eq!(dialog.state(), DialogState::Open);
}

#[tokio::test]
async fn test_confirm_success() {
    let (driver, page) = setup();
    let s = page.selectors().clone();
    render_dialog(&driver, &s);
    let confirm = css(&s.confirm_button);
    driver.add(confirm.clone(), FakeElement::new());
    driver.on_click(&confirm, vec![Effect::Remove(confirm.clone())]);

    let mut dialog = OrderDialog::new(&page);
    dialog.edit().await.unwrap();
    dialog.confirm().await.unwrap();

    assert_eq!(dialog.state(), DialogState::Confirmed);
    assert!(matches!(dialog.close().await, Err(GatewayError::DialogNotOpen)));
}

#[tokio::test]
async fn test_confirm_rejected_carries_notification_text() {
    let (driver, page) = setup();
    let s = page.selectors().clone();
    render_dialog(&driver, &s);
    driver.add(css(&s.confirm_button), FakeElement::new());
    driver.add(css(&s.widget_message), message(&s, "Error", "Market is closed"));

    let mut dialog = OrderDialog::new(&page);
    dialog.edit().await.unwrap();
    let err = dialog.confirm().await.unwrap_err();

    assert!(matches!(err, GatewayError::ConfirmationRejected(ref text) if text == "Market is closed"));
    assert_eq!(dialog.state(), DialogState::Edit);
}

#[tokio::test]
async fn test_set_quantity_types_one_digit_at_a_time() {
    let (driver, page) = setup();
    let s = page.selectors().clone();
    render_dialog(&driver, &s);
    let input = By::xpath(&s.quantity_input);
    driver.add(input.clone(), FakeElement::new());

    let mut dialog = OrderDialog::new(&page);
    dialog.edit().await.unwrap();
    dialog.set_quantity(105).await.unwrap();

    assert_eq!(driver.keys(&input), vec!["1", "0", "5"]);
    assert_eq!(driver.click_count(&input), 1);
}

#[tokio::test]
async fn test_edit_quantity_sells_half() {
    let (driver, page) = setup();
    let s = page.selectors().clone();
    render_dialog(&driver, &s);
    let input = By::xpath(&s.quantity_input);
    let sell = css(fill(&s.mode_button, "sell"));
    driver.add(css(&s.market_order_tab), FakeElement::new());
    driver.add(sell.clone(), FakeElement::new());
    driver.add(css(&s.quantity_value), FakeElement::text("20 @ 1.0841"));
    driver.add(input.clone(), FakeElement::new());

    let mut dialog = OrderDialog::new(&page);
    dialog.edit().await.unwrap();
    let qty = dialog
        .edit_quantity(&EditPayload::percent(Direction::Sell, 50.0))
        .await
        .unwrap();

    assert_eq!(qty, 10);
    assert_eq!(driver.keys(&input), vec!["1", "0"]);
    assert_eq!(driver.click_count(&sell), 1);
    assert_eq!(driver.click_count(&css(&s.market_order_tab)), 1);
}

#[tokio::test]
async fn test_edit_quantity_refuses_oversized_buy() {
    let (driver, page) = setup();
    let s = page.selectors().clone();
    render_dialog(&driver, &s);
    let input = By::xpath(&s.quantity_input);
    driver.add(css(&s.market_order_tab), FakeElement::new());
    driver.add(css(fill(&s.mode_button, "buy")), FakeElement::new());
    driver.add(css(&s.quantity_value), FakeElement::text("20 @1.0841"));
    driver.add(input.clone(), FakeElement::new());

    let mut dialog = OrderDialog::new(&page);
    dialog.edit().await.unwrap();
    let err = dialog
        .edit_quantity(&EditPayload::absolute(Direction::Buy, 25.0))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::BuyNotAllowed));
    assert!(driver.keys(&input).is_empty());
}

#[test]
fn test_parse_quantity() {
    assert_eq!(parse_quantity("20 @1.0841").unwrap(), 20);
    assert_eq!(parse_quantity(" 1 500 @ 12.5 ").unwrap(), 1500);
    assert!(matches!(
        parse_quantity("20"),
        Err(GatewayError::MalformedText { what: "quantity", .. })
    ));
    assert!(parse_quantity("abc @1.2").is_err());
}

#[tokio::test]
async fn test_set_limit_applies_once() {
    let (driver, page) = setup();
    let s = page.selectors().clone();
    render_dialog(&driver, &s);
    for toggle in [
        &s.market_tp_toggle,
        &s.market_sl_toggle,
        &s.order_tp_toggle,
        &s.order_sl_toggle,
    ] {
        driver.add(css(toggle), FakeElement::new());
    }

    let item = Item::new("EURUSD", Direction::Buy, 1)
        .as_order(1.05)
        .with_limit(LimitKind::TakeProfit, Limit::active())
        .with_limit(LimitKind::StopLoss, Limit::default());
    let limits = item.limits().clone();
    let mut dialog = OrderDialog::for_item(&page, item);
    dialog.edit().await.unwrap();
    dialog.set_limit(&limits).await.unwrap();
    dialog.set_limit(&limits).await.unwrap();

    assert_eq!(driver.click_count(&css(&s.order_tp_toggle)), 1);
    assert_eq!(driver.click_count(&css(&s.order_sl_toggle)), 0);
    assert_eq!(driver.click_count(&css(&s.market_tp_toggle)), 0);
}

#[tokio::test]
async fn test_get_price_reads_direction_tradebox() {
    let (driver, page) = setup();
    let s = page.selectors().clone();
    render_dialog(&driver, &s);
    driver.add(css(fill(&s.tradebox_price, "sell")), FakeElement::text(" 1.0839 "));
    driver.add(css(fill(&s.tradebox_price, "buy")), FakeElement::text("1.0841"));

    let item = Item::new("EURUSD", Direction::Sell, 1);
    let mut dialog = OrderDialog::for_item(&page, item);
    dialog.edit().await.unwrap();

    assert_eq!(dialog.get_price().await.unwrap(), 1.0839);
}

#[tokio::test]
async fn test_get_info_skips_unreadable_numbers() {
    let (driver, page) = setup();
    let s = page.selectors().clone();
    render_dialog(&driver, &s);
    driver.add(css(&s.info_tab), FakeElement::new());
    driver.add(css(&s.info_close), FakeElement::new());
    driver.add(css(&s.info_name), FakeElement::text("EUR/USD"));
    let cells = [
        (&s.info_created, "2024-03-01 10:15"),
        (&s.info_quantity, " 20"),
        (&s.info_direction, "buy"),
        (&s.info_price, " 1.0841"),
        (&s.info_current_price, " 1.0850"),
        (&s.info_take_profit, "1.1000 (+159)"),
        (&s.info_stop_loss, "-"),
        (&s.info_trailing_stop, "-"),
        (&s.info_margin, " n/a"),
        (&s.info_result, " 18.5"),
    ];
    for (xpath, text) in cells {
        driver.add(By::xpath(xpath), FakeElement::text(text));
    }

    let mut dialog = OrderDialog::new(&page);
    dialog.info().await.unwrap();
    let position = dialog.get_info().await.unwrap();

    let expected = Position::new("EUR/USD")
        .with_date_created("2024-03-01 10:15")
        .with_quantity(20)
        .with_direction("buy")
        .with_prices(1.0841, 1.0850)
        .with_exits("1.1000 (+159)", "-", "-")
        .with_result(18.5);
    assert_eq!(position, expected);
    assert_eq!(driver.click_count(&css(&s.info_tab)), 1);
    assert_eq!(driver.click_count(&css(&s.info_close)), 1);
}
