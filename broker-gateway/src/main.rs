use anyhow::Context;
use broker_gateway::config::GatewayConfig;
use broker_gateway::driver::webdriver::WebDriverClient;
use broker_gateway::home::HomePage;
use broker_gateway::io::Args;
use broker_gateway::{api, store, Page, TradingService};
use clap::Parser;
use log::info;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = GatewayConfig::load(Path::new(&args.config))
        .with_context(|| format!("loading {}", args.config))?;
    args.apply(&mut config);

    let filter = config.log_level.as_deref().unwrap_or("info");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
    info!("=== Broker Gateway Starting ===");

    // 1. Key store
    let store = store::open(&config.store)?;
    info!("Key store: {:?} ({})", config.store.backend, config.store.path);

    // 2. Browser session
    let web = &config.webdriver;
    let driver = WebDriverClient::connect(&web.url, &web.browser, web.headless)
        .await?
        .with_poll_interval(config.timings.poll_interval());
    driver.goto(&web.start_url).await?;
    let driver = Arc::new(driver);

    // 3. Login
    let page = Arc::new(Page::new(
        driver.clone(),
        config.selectors.clone(),
        config.timings.clone(),
    ));
    let account = HomePage::new(page).login(&config.credentials).await?;

    // 4. Serve
    let service = Arc::new(TradingService::new(store, Arc::new(account)));
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let served = api::serve(&addr, service).await;

    if let Err(e) = driver.quit().await {
        log::warn!("Failed to end the browser session: {}", e);
    }
    served
}
