use crate::selectors::Selectors;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebDriverConfig {
    /// WebDriver server, e.g. a local chromedriver.
    pub url: String,
    pub browser: String,
    pub headless: bool,
    /// Login page of the trading platform.
    pub start_url: String,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9515".to_string(),
            browser: "chrome".to_string(),
            headless: false,
            start_url: "https://trade.example.com/login".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            path: "data/items.db".to_string(),
        }
    }
}

/// Pauses and timeouts used while driving the UI, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Delay between two keystrokes typed into a quantity field.
    pub keystroke_pacing_ms: u64,
    /// Wait after clicking confirm before inspecting the outcome.
    pub confirm_settle_ms: u64,
    /// How long the session-expired widget may take to go away.
    pub session_expiry_timeout_ms: u64,
    /// How long the login redirect may take.
    pub login_timeout_ms: u64,
    /// Interval between two checks while waiting on the UI.
    pub poll_interval_ms: u64,
    pub dialog_open_ms: u64,
    pub row_click_ms: u64,
    pub sort_click_ms: u64,
    pub settings_menu_ms: u64,
    pub hover_ms: u64,
    pub context_menu_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            keystroke_pacing_ms: 50,
            confirm_settle_ms: 1000,
            session_expiry_timeout_ms: 3000,
            login_timeout_ms: 10_000,
            poll_interval_ms: 100,
            dialog_open_ms: 200,
            row_click_ms: 300,
            sort_click_ms: 200,
            settings_menu_ms: 300,
            hover_ms: 100,
            context_menu_ms: 200,
        }
    }
}

impl Timings {
    /// Every pause and timeout set to zero.
    pub fn immediate() -> Self {
        Self {
            keystroke_pacing_ms: 0,
            confirm_settle_ms: 0,
            session_expiry_timeout_ms: 0,
            login_timeout_ms: 0,
            poll_interval_ms: 1,
            dialog_open_ms: 0,
            row_click_ms: 0,
            sort_click_ms: 0,
            settings_menu_ms: 0,
            hover_ms: 0,
            context_menu_ms: 0,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn keystroke_pacing(&self) -> Duration {
        Duration::from_millis(self.keystroke_pacing_ms)
    }

    pub fn confirm_settle(&self) -> Duration {
        Duration::from_millis(self.confirm_settle_ms)
    }

    pub fn session_expiry_timeout(&self) -> Duration {
        Duration::from_millis(self.session_expiry_timeout_ms)
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_millis(self.login_timeout_ms)
    }

    pub fn dialog_open(&self) -> Duration {
        Duration::from_millis(self.dialog_open_ms)
    }

    pub fn row_click(&self) -> Duration {
        Duration::from_millis(self.row_click_ms)
    }

    pub fn sort_click(&self) -> Duration {
        Duration::from_millis(self.sort_click_ms)
    }

    pub fn settings_menu(&self) -> Duration {
        Duration::from_millis(self.settings_menu_ms)
    }

    pub fn hover(&self) -> Duration {
        Duration::from_millis(self.hover_ms)
    }

    pub fn context_menu(&self) -> Duration {
        Duration::from_millis(self.context_menu_ms)
    }
}

/// Full gateway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub log_level: Option<String>,
    pub server: ServerConfig,
    pub webdriver: WebDriverConfig,
    pub credentials: Credentials,
    pub store: StoreConfig,
    pub timings: Timings,
    pub selectors: Selectors,
}

impl GatewayConfig {
    /// Layers an optional TOML file and `GATEWAY__*` environment variables
    /// over the defaults.
    ///
    /// # Arguments
    ///
    /// * `path` - Config file; silently skipped when it does not exist.
    pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("GATEWAY").separator("__"))
            .build()?
            .try_deserialize()
    }
}
