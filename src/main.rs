use anyhow::Result;
use tracing::{error, info};

mod browser;
mod card_scanner;
mod config;
mod error;
mod models;
mod presenter;
mod prompt;
mod query;
mod scraper;
mod traits;

use browser::{PollingWaiter, WebDriverSource};
use card_scanner::CardScanner;
use config::ScannerConfig;
use prompt::StdinPrompt;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    info!("Starting TCG sales scanner");

    let config = ScannerConfig::from_env()?;
    let scraper = scraper::Scraper::new(&config)?;

    // One browser session serves every search until exit
    let source = WebDriverSource::connect(&config.browser).await?;
    let waiter = PollingWaiter::new(config.poll_interval);
    let scanner = CardScanner::new(source, waiter, scraper, config);

    let mut prompt = StdinPrompt::new();
    let result = scanner.interactive_loop(&mut prompt).await;
    if let Err(e) = &result {
        error!("Prompt loop stopped: {:#}", e);
    }

    scanner.into_source().close().await?;
    result
}
