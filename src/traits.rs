//! Capabilities the scanner drives: a navigable document, a waiter and a prompt

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

/// A rendered page that can be navigated, queried and clicked
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Navigate to `url` and return once the browser has loaded it
    async fn goto(&self, url: &str) -> Result<()>;

    /// Full markup of the current page as rendered
    async fn page_source(&self) -> Result<String>;

    /// Whether any element matching `selector` is present
    async fn exists(&self, selector: &str) -> Result<bool>;

    /// Whether any element matching `selector` is displayed
    async fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Whether the first element matching `selector` is displayed and enabled
    async fn is_clickable(&self, selector: &str) -> Result<bool>;

    /// Click the first element matching `selector`
    async fn click(&self, selector: &str) -> Result<()>;

    /// Outer HTML of the first element matching `selector`, if any
    async fn outer_html(&self, selector: &str) -> Result<Option<String>>;
}

/// Something worth waiting for on the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition<'a> {
    Present(&'a str),
    Visible(&'a str),
    Clickable(&'a str),
}

impl WaitCondition<'_> {
    /// Check the condition once against `source`
    pub async fn is_met(&self, source: &dyn DocumentSource) -> Result<bool> {
        match self {
            Self::Present(selector) => source.exists(selector).await,
            Self::Visible(selector) => source.is_visible(selector).await,
            Self::Clickable(selector) => source.is_clickable(selector).await,
        }
    }
}

/// Blocks until a condition holds or a timeout elapses
#[async_trait]
pub trait Waiter: Send + Sync {
    /// # Returns
    /// * `Ok(true)` - the condition held before `timeout`
    /// * `Ok(false)` - the timeout elapsed first
    async fn wait_for(
        &self,
        source: &dyn DocumentSource,
        condition: WaitCondition<'_>,
        timeout: Duration,
    ) -> Result<bool>;
}

/// Line-based interaction with the user
#[async_trait]
pub trait Prompt: Send {
    /// Print one line of output
    async fn say(&mut self, line: &str) -> Result<()>;

    /// Print `question` and read one line; `None` once input is closed
    async fn ask(&mut self, question: &str) -> Result<Option<String>>;
}
