//! The platform's login page.

use crate::account::AccountPage;
use crate::config::Credentials;
use crate::driver::{By, Condition};
use crate::error::{GatewayError, Result};
use crate::page::Page;
use log::{debug, info, warn};
use std::sync::Arc;

pub struct HomePage {
    page: Arc<Page>,
}

impl HomePage {
    pub fn new(page: Arc<Page>) -> Self {
        Self { page }
    }

    /// Submits the login form and waits for the account page to render.
    ///
    /// # Returns
    ///
    /// * `Err(LoginFailed)` if the navigation logo does not show up within the
    ///   login timeout.
    pub async fn login(self, credentials: &Credentials) -> Result<AccountPage> {
        let s = self.page.selectors();
        let driver = self.page.driver();
        info!("Login page: {}", driver.title().await?);

        let login = self.page.require(&By::id(&s.login_id)).await?;
        driver.send_keys(&login, &credentials.login).await?;
        let password = self.page.require(&By::id(&s.password_id)).await?;
        driver.send_keys(&password, &credentials.password).await?;
        let submit = self.page.require(&By::css(&s.login_button)).await?;
        self.page.click(&submit).await?;

        let logo = Condition::Present(By::css(&s.nav_logo));
        if let Err(err) = driver
            .wait_until(&logo, self.page.timings().login_timeout())
            .await
        {
            warn!("Current page: {}", driver.title().await.unwrap_or_default());
            return Err(GatewayError::LoginFailed(err.to_string()));
        }
        info!(
            "Logged in as {}, page: {}",
            credentials.login,
            driver.title().await?
        );

        if let Some(alert) = self.page.find(&By::css(&s.alert_box)).await? {
            self.page.click(&alert).await?;
            debug!("Trading alert box closed");
        }
        Ok(AccountPage::new(self.page))
    }
}
