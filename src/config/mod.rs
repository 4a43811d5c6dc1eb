//! Scanner configuration, read from the environment (and `.env`)

use std::str::FromStr;
use std::time::Duration;

use crate::error::ScanError;

/// What to send when the search term names no condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnspecifiedCondition {
    /// Leave the filter off and let the site show its default listing.
    SiteDefault,
    /// Always ask for Near Mint.
    NearMint,
}

impl FromStr for UnspecifiedCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "site-default" | "default" | "none" => Ok(Self::SiteDefault),
            "near-mint" | "nm" => Ok(Self::NearMint),
            other => Err(format!("expected 'site-default' or 'near-mint', got '{other}'")),
        }
    }
}

/// CSS selectors for the parts of the marketplace we read
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    /// Container holding all result cards
    pub search_results: String,
    /// Individual product card within the results
    pub product_card: String,
    /// Labels scanned for a `#`-prefixed catalog id
    pub catalog_label: String,
    pub title: String,
    pub set_name: String,
    pub market_price: String,
    pub link: String,
    /// Numbered page buttons
    pub pagination_links: String,
    /// Button that opens the latest sales modal
    pub sales_activator: String,
    /// Heading shown when a condition filter matches no listings
    pub no_results: String,
    pub sales_table: String,
    pub sale_row: String,
    pub sale_price: String,
    pub sale_date: String,
    pub sale_quantity: String,
    /// Condition label, class name differs between layouts
    pub sale_condition: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            search_results: "section.search-results".to_string(),
            product_card: "div.product-card".to_string(),
            catalog_label: "span".to_string(),
            title: "span.product-card__title".to_string(),
            set_name: "h4.product-card__set-name".to_string(),
            market_price: "span.product-card__market-price--value".to_string(),
            link: "a[href]".to_string(),
            pagination_links: "div.tcg-pagination__pages a".to_string(),
            sales_activator: ".modal__activator".to_string(),
            no_results: ".no-result__heading".to_string(),
            sales_table: "tbody.latest-sales-table__tbody".to_string(),
            sale_row: "tr".to_string(),
            sale_price: "td.latest-sales-table__tbody__price".to_string(),
            sale_date: "td.latest-sales-table__tbody__date".to_string(),
            sale_quantity: "td.latest-sales-table__tbody_quantity".to_string(),
            sale_condition: ".tcg-tooltip__toggle, .tcg-tooltiptoggle".to_string(),
        }
    }
}

/// WebDriver session settings
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub window_size: (u32, u32),
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: false,
            window_size: (1920, 1080),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Keep scanning pages after the first page with a match
    pub look_for_multiple_products: bool,
    /// Upper bound on result pages, also the default page limit of a query
    pub max_pages: u32,
    /// Drop oversized "Jumbo Cards" printings that share a number
    pub ignore_jumbo_cards: bool,
    pub unspecified_condition: UnspecifiedCondition,
    pub base_url: String,
    pub browser: BrowserConfig,
    /// Bound on every wait-for-element step
    pub wait_timeout: Duration,
    /// How long to look for late-rendered content before treating it as absent
    pub settle_timeout: Duration,
    pub poll_interval: Duration,
    pub selectors: SiteSelectors,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            look_for_multiple_products: false,
            max_pages: 5,
            ignore_jumbo_cards: true,
            unspecified_condition: UnspecifiedCondition::SiteDefault,
            base_url: "https://www.tcgplayer.com".to_string(),
            browser: BrowserConfig::default(),
            wait_timeout: Duration::from_secs(10),
            settle_timeout: Duration::from_millis(1000),
            poll_interval: Duration::from_millis(250),
            selectors: SiteSelectors::default(),
        }
    }
}

impl ScannerConfig {
    pub fn from_env() -> Result<Self, ScanError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ScanError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_pages: u32 = parse_var(&lookup, "TCG_MAX_PAGES", defaults.max_pages)?;
        if max_pages == 0 {
            return Err(ScanError::Config("TCG_MAX_PAGES must be at least 1".to_string()));
        }

        let browser = BrowserConfig {
            webdriver_url: lookup("TCG_WEBDRIVER_URL")
                .unwrap_or(defaults.browser.webdriver_url),
            headless: parse_var(&lookup, "TCG_HEADLESS", defaults.browser.headless)?,
            window_size: defaults.browser.window_size,
        };

        Ok(Self {
            look_for_multiple_products: parse_var(
                &lookup,
                "TCG_LOOK_FOR_MULTIPLE_PRODUCTS",
                defaults.look_for_multiple_products,
            )?,
            max_pages,
            ignore_jumbo_cards: parse_var(
                &lookup,
                "TCG_IGNORE_JUMBO_CARDS",
                defaults.ignore_jumbo_cards,
            )?,
            unspecified_condition: parse_var(
                &lookup,
                "TCG_UNSPECIFIED_CONDITION",
                defaults.unspecified_condition,
            )?,
            base_url: lookup("TCG_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            browser,
            wait_timeout: Duration::from_secs(parse_var(
                &lookup,
                "TCG_WAIT_TIMEOUT_SECS",
                defaults.wait_timeout.as_secs(),
            )?),
            settle_timeout: Duration::from_millis(parse_var(
                &lookup,
                "TCG_SETTLE_MILLIS",
                defaults.settle_timeout.as_millis() as u64,
            )?),
            poll_interval: Duration::from_millis(parse_var(
                &lookup,
                "TCG_POLL_MILLIS",
                defaults.poll_interval.as_millis() as u64,
            )?),
            selectors: defaults.selectors,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ScanError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| ScanError::Config(format!("{key}={raw}: {e}"))),
        _ => Ok(default),
    }
}
