//! Locators for every element of the trading platform the gateway touches.
//!
//! Templates carry `{}` placeholders filled with [`fill`]. Whether a locator is
//! CSS, XPath or an element id is decided by the code using it.

use serde::{Deserialize, Serialize};

/// Replaces every `{}` in `template` with `value`.
pub fn fill(template: &str, value: &str) -> String {
    template.replace("{}", value)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    // Message widget (session expiry, insufficient funds, rejections)
    pub widget_message: String,
    pub message_title: String,
    pub message_text: String,
    pub message_ok: String,

    // Login page
    pub login_id: String,
    pub password_id: String,
    pub login_button: String,
    pub nav_logo: String,
    pub alert_box: String,

    // Tables
    pub tab: String,
    pub item_row: String,
    pub table_rows: String,
    pub date_created_header: String,
    pub table_settings: String,
    /// XPath
    pub settings_menu: String,
    pub column_toggles: Vec<String>,
    pub context_menu: String,
    pub remove_item: String,

    // Order dialog
    pub add_order: String,
    pub empty_table_entry: String,
    pub dialog: String,
    pub dialog_close: String,
    pub confirm_button: String,
    pub search_box: String,
    /// XPath, indexed 1-based by appending `[n]`
    pub result_row: String,
    pub result_name: String,
    pub mode_button: String,
    pub market_order_tab: String,
    pub quantity_value: String,
    /// XPath
    pub quantity_input: String,
    pub quantity_echo: String,
    pub tradebox_price: String,
    pub market_tp_toggle: String,
    pub market_sl_toggle: String,
    pub order_tp_toggle: String,
    pub order_sl_toggle: String,

    // Info panel, XPath unless noted
    pub info_tab: String,
    /// CSS
    pub info_name: String,
    pub info_created: String,
    pub info_quantity: String,
    pub info_direction: String,
    pub info_price: String,
    pub info_current_price: String,
    pub info_take_profit: String,
    pub info_stop_loss: String,
    pub info_trailing_stop: String,
    pub info_margin: String,
    pub info_result: String,
    pub info_close: String,
}

fn info_field(name: &str) -> String {
    format!("//div[contains(@class,'info-panel')]//*[@data-field='{}']", name)
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            widget_message: ".widget-message".to_string(),
            message_title: ".widget-message__title".to_string(),
            message_text: ".widget-message__text".to_string(),
            message_ok: ".widget-message__ok".to_string(),

            login_id: "login".to_string(),
            password_id: "password".to_string(),
            login_button: "button.login-submit".to_string(),
            nav_logo: ".nav-logo".to_string(),
            alert_box: ".alert-box .alert-box__close".to_string(),

            tab: "#tab-{}".to_string(),
            item_row: "#item-{}".to_string(),
            table_rows: "#{}-table tbody tr[id^='item-']".to_string(),
            date_created_header: "th[data-column='dateCreated']".to_string(),
            table_settings: ".table-settings".to_string(),
            settings_menu: "//div[contains(@class,'table-settings__menu')]".to_string(),
            column_toggles: [
                "name",
                "quantity",
                "direction",
                "price",
                "currentPrice",
                "takeProfit",
                "stopLoss",
                "trailingStop",
                "margin",
                "dateCreated",
                "result",
            ]
            .iter()
            .map(|c| format!("li[data-column='{}']", c))
            .collect(),
            context_menu: ".context-menu".to_string(),
            remove_item: "li[data-action='remove-{}']".to_string(),

            add_order: "#add-order".to_string(),
            empty_table_entry: ".dt-no-data .add-first".to_string(),
            dialog: ".order-dialog".to_string(),
            dialog_close: ".order-dialog .dialog-close".to_string(),
            confirm_button: ".order-dialog .btn-confirm".to_string(),
            search_box: ".order-dialog .search-box input".to_string(),
            result_row: "//ul[contains(@class,'search-results')]/li".to_string(),
            result_name: ".instrument-name".to_string(),
            mode_button: ".order-dialog .mode-btn-{}".to_string(),
            market_order_tab: ".order-dialog .tab-market-order".to_string(),
            quantity_value: ".order-dialog .qty-value".to_string(),
            quantity_input: "//div[contains(@class,'order-dialog')]//input[@name='quantity']"
                .to_string(),
            quantity_echo: ".order-dialog .qty-input-value".to_string(),
            tradebox_price: ".tradebox-{} .tradebox-{}-price".to_string(),
            market_tp_toggle: ".market-order .tp-toggle".to_string(),
            market_sl_toggle: ".market-order .sl-toggle".to_string(),
            order_tp_toggle: ".limit-order .tp-toggle".to_string(),
            order_sl_toggle: ".limit-order .sl-toggle".to_string(),

            info_tab: ".order-dialog .tab-info".to_string(),
            info_name: ".info-panel .instrument-title".to_string(),
            info_created: info_field("dateCreated"),
            info_quantity: info_field("quantity"),
            info_direction: info_field("direction"),
            info_price: info_field("price"),
            info_current_price: info_field("currentPrice"),
            info_take_profit: info_field("takeProfit"),
            info_stop_loss: info_field("stopLoss"),
            info_trailing_stop: info_field("trailingStop"),
            info_margin: info_field("margin"),
            info_result: info_field("result"),
            info_close: ".info-panel .info-close".to_string(),
        }
    }
}
