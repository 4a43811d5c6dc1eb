//! WebDriver-backed document source and a polling waiter

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use thirtyfour::prelude::*;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::config::BrowserConfig;
use crate::traits::{DocumentSource, WaitCondition, Waiter};

/// One Chrome session driven through a running chromedriver
pub struct WebDriverSource {
    driver: WebDriver,
}

impl WebDriverSource {
    pub async fn connect(config: &BrowserConfig) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--disable-blink-features=AutomationControlled")?;
        caps.add_arg(&format!(
            "--window-size={},{}",
            config.window_size.0, config.window_size.1
        ))?;
        if config.headless {
            caps.add_arg("--headless=new")?;
        }

        let driver = WebDriver::new(config.webdriver_url.as_str(), caps)
            .await
            .with_context(|| format!("failed to connect to WebDriver at {}", config.webdriver_url))?;

        info!("Browser session started via {}", config.webdriver_url);
        Ok(Self { driver })
    }

    /// End the browser session
    pub async fn close(self) -> Result<()> {
        self.driver.quit().await?;
        info!("Browser session closed");
        Ok(())
    }

    async fn first(&self, selector: &str) -> Result<Option<WebElement>> {
        Ok(self.driver.find_all(By::Css(selector)).await?.into_iter().next())
    }
}

#[async_trait]
impl DocumentSource for WebDriverSource {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.driver
            .goto(url)
            .await
            .with_context(|| format!("failed to load {url}"))?;
        Ok(())
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.driver.source().await?)
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        Ok(!self.driver.find_all(By::Css(selector)).await?.is_empty())
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        for element in self.driver.find_all(By::Css(selector)).await? {
            // Elements can go stale between lookup and query while the page renders
            if element.is_displayed().await.unwrap_or(false) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn is_clickable(&self, selector: &str) -> Result<bool> {
        match self.first(selector).await? {
            Some(element) => Ok(element.is_clickable().await.unwrap_or(false)),
            None => Ok(false),
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .first(selector)
            .await?
            .with_context(|| format!("nothing to click for {selector}"))?;
        element.click().await?;
        Ok(())
    }

    async fn outer_html(&self, selector: &str) -> Result<Option<String>> {
        match self.first(selector).await? {
            Some(element) => Ok(Some(element.outer_html().await?)),
            None => Ok(None),
        }
    }
}

/// Re-checks a condition every `interval` until it holds or time runs out
pub struct PollingWaiter {
    interval: Duration,
}

impl PollingWaiter {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl Waiter for PollingWaiter {
    async fn wait_for(
        &self,
        source: &dyn DocumentSource,
        condition: WaitCondition<'_>,
        timeout: Duration,
    ) -> Result<bool> {
        let deadline = Instant::now() + timeout;

        loop {
            if condition.is_met(source).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                debug!("Gave up waiting for {:?} after {:?}", condition, timeout);
                return Ok(false);
            }
            sleep(self.interval).await;
        }
    }
}
