//! The order dialog: the modal used to create, edit and inspect a position
//! or an order.
//!
//! An [`OrderDialog`] drives one interaction through [`DialogState`]. Every
//! transition is checked against the table in [`DialogState::next`] before
//! any UI element is touched, and every input operation requires one of the
//! active states (open, edit, info).

pub mod matcher;
pub mod popup;
pub mod quantity;
pub mod state;

#[cfg(test)]
mod tests;

pub use popup::Notice;
pub use quantity::calc_quantity;
pub use state::{DialogState, Transition};

use crate::driver::{By, ElementHandle};
use crate::error::{GatewayError, Result};
use crate::page::Page;
use crate::selectors::fill;
use log::{debug, error, info, warn};
use std::str::FromStr;
use trading::{Direction, EditPayload, Item, ItemKind, LimitKind, Limits, Position};

pub struct OrderDialog<'a> {
    page: &'a Page,
    state: DialogState,
    item: Option<Item>,
    insufficient_funds: bool,
    limits_applied: bool,
}

impl<'a> OrderDialog<'a> {
    /// A dialog for an existing row (edit or info).
    pub fn new(page: &'a Page) -> Self {
        Self {
            page,
            state: DialogState::Init,
            item: None,
            insufficient_funds: false,
            limits_applied: false,
        }
    }

    /// A dialog creating `item`.
    pub fn for_item(page: &'a Page, item: Item) -> Self {
        Self {
            item: Some(item),
            ..Self::new(page)
        }
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn into_item(self) -> Option<Item> {
        self.item
    }

    /// Set when an "Insufficient Funds" notice was shown while opening.
    pub fn insufficient_funds(&self) -> bool {
        self.insufficient_funds
    }

    fn allowed(&self, transition: Transition) -> Result<DialogState> {
        self.state.next(transition).ok_or_else(|| {
            debug!("{:?} is not allowed from {}", transition, self.state);
            GatewayError::DialogNotOpen
        })
    }

    fn advance(&mut self, next: DialogState) {
        debug!("Dialog {} -> {}", self.state, next);
        self.state = next;
    }

    fn ensure_active(&self) -> Result<()> {
        if self.state.is_active() {
            Ok(())
        } else {
            Err(GatewayError::DialogNotOpen)
        }
    }

    async fn ensure_rendered(&self) -> Result<()> {
        let root = By::css(&self.page.selectors().dialog);
        match self.page.find(&root).await? {
            Some(_) => Ok(()),
            None => Err(GatewayError::DialogNotOpen),
        }
    }

    /// Opens the creation dialog and selects the item's instrument.
    ///
    /// The create control is used when it is visible; an empty table offers
    /// its own entry point instead. If the instrument is not in the search
    /// results the dialog is closed again before failing.
    pub async fn open(&mut self) -> Result<()> {
        let next = self.allowed(Transition::Open)?;
        let instrument = match &self.item {
            Some(item) => item.instrument().to_string(),
            None => return Err(GatewayError::InputValidation("Instrument is not defined".into())),
        };
        let s = self.page.selectors();

        match self.page.find(&By::css(&s.add_order)).await? {
            Some(add) if self.page.driver().is_displayed(&add).await? => {
                self.page.click(&add).await?
            }
            _ => {
                debug!("Create control is hidden, using the empty table entry");
                let entry = self.page.require(&By::css(&s.empty_table_entry)).await?;
                self.page.click(&entry).await?;
            }
        }
        self.page.pause(self.page.timings().dialog_open()).await;

        let search_box = self.page.require(&By::css(&s.search_box)).await?;
        self.page.driver().send_keys(&search_box, &instrument).await?;

        let found = match matcher::search(self.page, &instrument).await {
            Ok(found) => found,
            Err(err) => {
                self.dismiss().await?;
                return Err(err);
            }
        };
        self.page.click(&found.element).await?;

        if let Some(widget) = self.page.message_widget().await? {
            self.decode(&widget).await?;
        }

        info!("Opened dialog for {} ({})", found.name, instrument);
        self.advance(next);
        Ok(())
    }

    /// Takes over a dialog already brought up by clicking a row.
    pub async fn edit(&mut self) -> Result<()> {
        self.enter(Transition::Edit).await
    }

    /// Like [`OrderDialog::edit`], for reading the info panel.
    pub async fn info(&mut self) -> Result<()> {
        self.enter(Transition::Info).await
    }

    async fn enter(&mut self, transition: Transition) -> Result<()> {
        let next = self.allowed(transition)?;
        self.ensure_rendered().await?;
        self.advance(next);
        Ok(())
    }

    /// Clicks the confirmation control and checks that the platform accepted.
    ///
    /// # Returns
    ///
    /// * `Err(ConfirmationRejected)` with the notification text when the
    ///   control is still there after the settle interval.
    pub async fn confirm(&mut self) -> Result<()> {
        let next = self.allowed(Transition::Confirm)?;
        let s = self.page.selectors();
        let confirm = By::css(&s.confirm_button);

        let button = self.page.require(&confirm).await?;
        self.page.click(&button).await?;
        self.page.pause(self.page.timings().confirm_settle()).await;

        let message = match self.page.message_widget().await? {
            Some(widget) => {
                self.page
                    .text_in(&widget, &By::css(&s.message_text))
                    .await?
            }
            None => String::new(),
        };
        if self.page.find(&confirm).await?.is_some() {
            error!("Confirmation rejected: {}", message);
            return Err(GatewayError::ConfirmationRejected(message));
        }

        if !message.is_empty() {
            info!("Confirmed: {}", message);
        }
        self.advance(next);
        Ok(())
    }

    pub async fn close(&mut self) -> Result<()> {
        let next = self.allowed(Transition::Close)?;
        let close = self
            .page
            .require(&By::css(&self.page.selectors().dialog_close))
            .await?;
        self.page.click(&close).await?;
        self.advance(next);
        Ok(())
    }

    /// Releases the modal after a failed interaction.
    ///
    /// An active dialog goes through [`OrderDialog::close`]; otherwise any
    /// dialog still on screen is dismissed. Failures here are logged and
    /// dropped so the caller can report the original error.
    pub async fn abandon(&mut self) {
        let outcome = if self.state.is_active() {
            self.close().await
        } else {
            self.dismiss().await
        };
        if let Err(err) = outcome {
            warn!("Could not close the dialog from {}: {}", self.state, err);
        }
    }

    /// Closes a dialog that failed to open, if it is showing at all.
    async fn dismiss(&self) -> Result<()> {
        let close = By::css(&self.page.selectors().dialog_close);
        if let Some(close) = self.page.find(&close).await? {
            self.page.click(&close).await?;
        }
        Ok(())
    }

    /// Reads a notification and acts on its title.
    pub async fn decode(&mut self, widget: &ElementHandle) -> Result<Notice> {
        let s = self.page.selectors();
        let title = self.page.text_in(widget, &By::css(&s.message_title)).await?;
        let body = self.page.text_in(widget, &By::css(&s.message_text)).await?;

        let notice = popup::classify(&title, &body)?;
        match &notice {
            Notice::InsufficientFunds => {
                warn!("Insufficient funds: {}", body.trim());
                self.insufficient_funds = true;
            }
            Notice::Other(title) => debug!("Ignoring notice '{}'", title),
        }
        Ok(notice)
    }

    pub async fn set_direction(&self, direction: Direction) -> Result<()> {
        self.ensure_active()?;
        let mode = fill(&self.page.selectors().mode_button, direction.as_str());
        let button = self.page.require(&By::css(mode)).await?;
        self.page.click(&button).await
    }

    /// Quantity shown by the dialog, read from its `"<qty> @<price>"` label.
    pub async fn get_quantity(&self) -> Result<i64> {
        self.ensure_active()?;
        let label = self
            .page
            .require(&By::css(&self.page.selectors().quantity_value))
            .await?;
        let text = self.page.driver().text(&label).await?;
        parse_quantity(&text)
    }

    pub async fn set_quantity(&self, quantity: i64) -> Result<()> {
        self.ensure_active()?;
        self.type_quantity(quantity).await
    }

    /// Sizes the edit from `payload` and types it in.
    ///
    /// # Returns
    ///
    /// The quantity typed into the dialog.
    pub async fn edit_quantity(&self, payload: &EditPayload) -> Result<i64> {
        self.ensure_active()?;
        let tab = self
            .page
            .require(&By::css(&self.page.selectors().market_order_tab))
            .await?;
        self.page.click(&tab).await?;
        self.set_direction(payload.direction).await?;

        let current = self.get_quantity().await?;
        let quantity = calc_quantity(payload, current)?;
        debug!(
            "Edit {} from {}: {:?} -> {}",
            payload.direction, current, payload, quantity
        );
        self.type_quantity(quantity).await?;
        Ok(quantity)
    }

    /// The quantity field only reacts to individual key events, so the
    /// digits go in one at a time.
    async fn type_quantity(&self, quantity: i64) -> Result<()> {
        let s = self.page.selectors();
        let input = self.page.require(&By::xpath(&s.quantity_input)).await?;
        self.page.click(&input).await?;

        let pacing = self.page.timings().keystroke_pacing();
        for digit in quantity.to_string().chars() {
            self.page
                .driver()
                .send_keys(&input, digit.encode_utf8(&mut [0; 4]))
                .await?;
            self.page.pause(pacing).await;
        }

        let echo = self.page.text_of(&By::css(&s.quantity_echo)).await?;
        debug!("Typed quantity {}, field shows '{}'", quantity, echo.trim());
        Ok(())
    }

    /// Toggles take-profit and stop-loss for every active limit.
    ///
    /// The toggles flip state, so only the first call on a dialog has any
    /// effect.
    pub async fn set_limit(&mut self, limits: &Limits) -> Result<()> {
        self.ensure_active()?;
        if self.limits_applied {
            warn!("Limits were already applied to this dialog, skipping");
            return Ok(());
        }

        let kind = self.item.as_ref().map_or(ItemKind::Position, Item::kind);
        let s = self.page.selectors();
        for limit in LimitKind::ALL {
            if !limits.get(&limit).is_some_and(|l| l.is_use) {
                continue;
            }
            let toggle = match (kind, limit) {
                (ItemKind::Position, LimitKind::TakeProfit) => &s.market_tp_toggle,
                (ItemKind::Position, LimitKind::StopLoss) => &s.market_sl_toggle,
                (ItemKind::Order, LimitKind::TakeProfit) => &s.order_tp_toggle,
                (ItemKind::Order, LimitKind::StopLoss) => &s.order_sl_toggle,
            };
            match self.page.find(&By::css(toggle)).await? {
                Some(toggle) => {
                    self.page.click(&toggle).await?;
                    info!("Enabled {} for {}", limit.as_str(), kind);
                }
                None => warn!("No {} toggle for {}", limit.as_str(), kind),
            }
        }
        self.limits_applied = true;
        Ok(())
    }

    /// Trade box price for the item's direction.
    pub async fn get_price(&self) -> Result<f64> {
        self.ensure_active()?;
        let direction = match &self.item {
            Some(item) => item.direction(),
            None => return Err(GatewayError::InputValidation("Direction is not defined".into())),
        };
        let locator = fill(&self.page.selectors().tradebox_price, direction.as_str());
        let text = self.page.text_of(&By::css(locator)).await?;
        text.trim()
            .parse()
            .map_err(|_| GatewayError::MalformedText { what: "price", text })
    }

    /// Reads the info panel into a [`Position`].
    ///
    /// Numeric cells that do not parse leave their field at zero.
    pub async fn get_info(&self) -> Result<Position> {
        self.ensure_active()?;
        self.ensure_rendered().await?;
        let s = self.page.selectors();

        let tab = self.page.require(&By::css(&s.info_tab)).await?;
        self.page.click(&tab).await?;

        let name = self.page.text_of(&By::css(&s.info_name)).await?;
        let created = self.cell(&s.info_created).await?;
        let quantity = self.cell(&s.info_quantity).await?;
        let direction = self.cell(&s.info_direction).await?;
        let price = self.cell(&s.info_price).await?;
        let current_price = self.cell(&s.info_current_price).await?;
        let take_profit = self.cell(&s.info_take_profit).await?;
        let stop_loss = self.cell(&s.info_stop_loss).await?;
        let trailing_stop = self.cell(&s.info_trailing_stop).await?;
        let margin = self.cell(&s.info_margin).await?;
        let result = self.cell(&s.info_result).await?;

        let position = Position::new(name.trim())
            .with_date_created(created.trim())
            .with_quantity(lenient("quantity", &quantity).unwrap_or_default())
            .with_direction(direction.trim())
            .with_prices(
                lenient("price", &price).unwrap_or_default(),
                lenient("current price", &current_price).unwrap_or_default(),
            )
            .with_exits(take_profit, stop_loss, trailing_stop)
            .with_margin(lenient("margin", &margin).unwrap_or_default())
            .with_result(lenient("result", &result).unwrap_or_default());

        if let Some(close) = self.page.find(&By::css(&s.info_close)).await? {
            self.page.click(&close).await?;
        }
        Ok(position)
    }

    async fn cell(&self, xpath: &str) -> Result<String> {
        self.page.text_of(&By::xpath(xpath)).await
    }
}

/// Parses the leading integer of `"<qty> @<price>"`, ignoring whitespace.
pub fn parse_quantity(text: &str) -> Result<i64> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .split_once('@')
        .and_then(|(qty, _)| qty.parse().ok())
        .ok_or_else(|| GatewayError::MalformedText {
            what: "quantity",
            text: text.to_string(),
        })
}

/// Info panel cells carry one leading space before the number.
fn lenient<T: FromStr>(what: &str, text: &str) -> Option<T> {
    let value = text.strip_prefix(' ').unwrap_or(text);
    match value.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!("Skipping unreadable {} '{}'", what, text);
            None
        }
    }
}
