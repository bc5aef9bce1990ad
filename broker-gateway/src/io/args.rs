use crate::config::StoreBackend;
use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum StoreArg {
    Sqlite,
    Memory,
}

impl From<StoreArg> for StoreBackend {
    fn from(arg: StoreArg) -> Self {
        match arg {
            StoreArg::Sqlite => StoreBackend::Sqlite,
            StoreArg::Memory => StoreBackend::Memory,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file (TOML). Missing files are ignored.
    #[arg(long, default_value = "broker-gateway.toml")]
    pub config: String,

    /// Port for the HTTP API, overrides `server.port`
    #[arg(long)]
    pub port: Option<u16>,

    /// Log filter, e.g. `debug` or `broker_gateway=trace`
    #[arg(long)]
    pub log_level: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Key store backend, overrides `store.backend`
    #[arg(long, value_enum)]
    pub store: Option<StoreArg>,
}

impl Args {
    /// Applies the command line overrides to a loaded configuration.
    pub fn apply(&self, config: &mut crate::config::GatewayConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = &self.log_level {
            config.log_level = Some(level.clone());
        }
        if self.headless {
            config.webdriver.headless = true;
        }
        if let Some(store) = self.store {
            config.store.backend = store.into();
        }
    }
}
