use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::ScannerConfig;
use crate::error::ScanError;
use crate::models::{Condition, ProductCandidate, SalesReport, SearchQuery};
use crate::presenter::render_report;
use crate::prompt::choose_product;
use crate::query::parse_search_term;
use crate::scraper::Scraper;
use crate::scraper::urls::{format_product_url, search_url};
use crate::traits::{DocumentSource, Prompt, WaitCondition, Waiter};

/// Result of one search that did not fail outright
#[derive(Debug)]
pub enum ScanOutcome {
    Report(SalesReport),
    /// Nothing matched within the pages searched
    NotFound { pages: u32 },
}

/// Drives one browser session through search, selection and sales lookup
pub struct CardScanner<S, W> {
    source: S,
    waiter: W,
    scraper: Scraper,
    config: ScannerConfig,
}

impl<S: DocumentSource, W: Waiter> CardScanner<S, W> {
    pub fn new(source: S, waiter: W, scraper: Scraper, config: ScannerConfig) -> Self {
        Self {
            source,
            waiter,
            scraper,
            config,
        }
    }

    /// Hand back the document source, e.g. to close the browser
    pub fn into_source(self) -> S {
        self.source
    }

    /// Prompt for searches until `exit` or end of input.
    ///
    /// Per-query failures are reported and the loop continues.
    pub async fn interactive_loop(&self, prompt: &mut dyn Prompt) -> Result<()> {
        loop {
            let Some(line) = prompt
                .ask("\nEnter card search (or type 'exit' to quit): ")
                .await?
            else {
                break;
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("exit") {
                prompt.say("Exiting...").await?;
                break;
            }

            match self.run_query(line, prompt).await {
                Ok(ScanOutcome::Report(report)) => prompt.say(&render_report(&report)).await?,
                Ok(ScanOutcome::NotFound { pages }) => {
                    prompt
                        .say(&format!(
                            "Could not find that product within {pages} pages. Retry your query or raise TCG_MAX_PAGES\n"
                        ))
                        .await?;
                }
                Err(e) => match e.downcast_ref::<ScanError>() {
                    Some(scan_error) => prompt.say(&scan_error.to_string()).await?,
                    None => {
                        error!("Search failed: {:#}", e);
                        prompt.say("Search failed, see log for details.").await?;
                    }
                },
            }
        }

        Ok(())
    }

    /// Parse `input`, find the card and read its latest sales.
    pub async fn run_query(&self, input: &str, prompt: &mut dyn Prompt) -> Result<ScanOutcome> {
        let query = parse_search_term(input, self.config.max_pages)?;
        prompt
            .say(&format!(
                "Searching for: name='{}', number='{}', condition='{}', pages to search={}",
                query.name,
                query.catalog_number,
                query.condition,
                self.page_bound(&query)
            ))
            .await?;

        let products = self.search_products(&query).await?;
        if products.is_empty() {
            return Ok(ScanOutcome::NotFound {
                pages: self.page_bound(&query),
            });
        }

        let (index, candidate) = choose_product(&products, prompt).await?;
        info!("Selected product {} of {}: {}", index + 1, products.len(), candidate.detail_url);

        let report = self.load_sales(query, candidate.clone()).await?;
        Ok(ScanOutcome::Report(report))
    }

    fn page_bound(&self, query: &SearchQuery) -> u32 {
        self.config.max_pages.min(query.page_limit)
    }

    /// Walk result pages collecting matching products.
    ///
    /// Stops at the page bound, when pagination runs out, or (unless
    /// multiple products are wanted) at the first page with a match.
    pub async fn search_products(&self, query: &SearchQuery) -> Result<Vec<ProductCandidate>> {
        let last_page = self.page_bound(query);
        let selectors = &self.config.selectors;
        let mut products = Vec::new();
        let mut page = 1;

        while page <= last_page {
            info!("Checking page {}...", page);
            self.source
                .goto(&search_url(&self.config.base_url, &query.name, page))
                .await?;

            let loaded = self
                .waiter
                .wait_for(
                    &self.source,
                    WaitCondition::Visible(&selectors.search_results),
                    self.config.wait_timeout,
                )
                .await?;
            if !loaded {
                return Err(ScanError::Timeout("while looking for products".to_string()).into());
            }

            let html = self.source.page_source().await?;
            products.extend(self.scraper.find_products(&html, &query.catalog_number, page));

            if !self.config.look_for_multiple_products && !products.is_empty() {
                break;
            }
            if !self.scraper.has_next_page(&html, page) {
                break;
            }
            page += 1;
        }

        info!("Found {} matching products", products.len());
        Ok(products)
    }

    /// Open the product page with the condition filter and read the sales table.
    pub async fn load_sales(
        &self,
        query: SearchQuery,
        candidate: ProductCandidate,
    ) -> Result<SalesReport> {
        let selectors = &self.config.selectors;
        let url = format_product_url(
            &self.config.base_url,
            &candidate.detail_url,
            query.condition,
            self.config.unspecified_condition,
        );

        info!("Loading product data from {}", url);
        self.source.goto(&url).await?;

        let ready = self
            .waiter
            .wait_for(
                &self.source,
                WaitCondition::Clickable(&selectors.sales_activator),
                self.config.wait_timeout,
            )
            .await?;
        if !ready {
            return Err(ScanError::Timeout("waiting for data to load".to_string()).into());
        }

        // The filtered listing renders after the activator, give it a moment
        let fell_back = self
            .waiter
            .wait_for(
                &self.source,
                WaitCondition::Present(&selectors.no_results),
                self.config.settle_timeout,
            )
            .await?;
        let condition_shown = if fell_back {
            warn!(
                "No listings for condition '{}', showing recent sales without the filter",
                query.condition
            );
            Condition::Unspecified
        } else {
            query.condition
        };

        self.source.click(&selectors.sales_activator).await?;

        let shown = self
            .waiter
            .wait_for(
                &self.source,
                WaitCondition::Visible(&selectors.sales_table),
                self.config.wait_timeout,
            )
            .await?;
        if !shown {
            return Err(ScanError::Timeout("waiting for sales history".to_string()).into());
        }

        let table = self
            .source
            .outer_html(&selectors.sales_table)
            .await?
            .unwrap_or_default();
        let sales = self.scraper.extract_sales(&table);
        info!("Read {} sales for {}", sales.len(), candidate.name);

        Ok(SalesReport {
            query,
            candidate,
            condition_shown,
            fell_back,
            sales,
        })
    }
}
