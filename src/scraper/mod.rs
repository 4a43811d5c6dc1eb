use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::config::{ScannerConfig, SiteSelectors};
use crate::error::ScanError;
use crate::models::{NOT_AVAILABLE, ProductCandidate};

mod sales;
pub mod urls;

/// Set-name marker for oversized printings that reuse regular card numbers.
const JUMBO_MARKER: &str = "Jumbo Cards";

/// Compiled selectors and matching policy for TCGplayer pages.
pub struct Scraper {
    search_results: Selector,
    product_card: Selector,
    catalog_label: Selector,
    title: Selector,
    set_name: Selector,
    market_price: Selector,
    link: Selector,
    pagination_links: Selector,
    sales_table: Selector,
    sale_row: Selector,
    sale_price: Selector,
    sale_date: Selector,
    sale_quantity: Selector,
    sale_condition: Selector,
    ignore_jumbo_cards: bool,
}

impl Scraper {
    pub fn new(config: &ScannerConfig) -> Result<Self, ScanError> {
        Self::with_selectors(&config.selectors, config.ignore_jumbo_cards)
    }

    pub fn with_selectors(
        selectors: &SiteSelectors,
        ignore_jumbo_cards: bool,
    ) -> Result<Self, ScanError> {
        Ok(Self {
            search_results: compile("search results", &selectors.search_results)?,
            product_card: compile("product card", &selectors.product_card)?,
            catalog_label: compile("catalog label", &selectors.catalog_label)?,
            title: compile("title", &selectors.title)?,
            set_name: compile("set name", &selectors.set_name)?,
            market_price: compile("market price", &selectors.market_price)?,
            link: compile("link", &selectors.link)?,
            pagination_links: compile("pagination", &selectors.pagination_links)?,
            sales_table: compile("sales table", &selectors.sales_table)?,
            sale_row: compile("sale row", &selectors.sale_row)?,
            sale_price: compile("sale price", &selectors.sale_price)?,
            sale_date: compile("sale date", &selectors.sale_date)?,
            sale_quantity: compile("sale quantity", &selectors.sale_quantity)?,
            sale_condition: compile("sale condition", &selectors.sale_condition)?,
            ignore_jumbo_cards,
        })
    }

    /// Collect the cards on a results page whose catalog id contains `number`.
    ///
    /// Matching is by substring, so `105` matches `#105/112`. Cards without a
    /// `#` label or without a link are skipped; missing name, set or price
    /// fall back to placeholders.
    pub fn find_products(&self, html: &str, number: &str, page: u32) -> Vec<ProductCandidate> {
        let document = Html::parse_document(html);
        let mut products = Vec::new();

        let Some(results) = document.select(&self.search_results).next() else {
            debug!("No search results container on page {}", page);
            return products;
        };

        for card in results.select(&self.product_card) {
            let Some(catalog_id) = card
                .select(&self.catalog_label)
                .map(|label| element_text(&label))
                .find(|text| text.starts_with('#'))
            else {
                continue;
            };

            if !catalog_id.contains(number) {
                continue;
            }

            let name = first_text(&card, &self.title).unwrap_or_else(|| "Unknown Product".to_string());
            let set_name = first_text(&card, &self.set_name).unwrap_or_else(|| "Unknown Set".to_string());

            if self.ignore_jumbo_cards && set_name.contains(JUMBO_MARKER) {
                debug!("Skipping jumbo printing {} ({})", name, set_name);
                continue;
            }

            let market_price =
                first_text(&card, &self.market_price).unwrap_or_else(|| NOT_AVAILABLE.to_string());

            let Some(href) = card
                .select(&self.link)
                .find_map(|link| link.value().attr("href"))
            else {
                debug!("Matching card {} has no link", catalog_id);
                continue;
            };

            info!("Found matching product on page {}", page);
            products.push(ProductCandidate {
                name,
                set_name,
                catalog_id,
                detail_url: href.to_string(),
                market_price,
            });
        }

        products
    }

    /// Whether the pagination control offers a page numbered above `current`.
    pub fn has_next_page(&self, html: &str, current: u32) -> bool {
        let document = Html::parse_document(html);

        let has_next = document
            .select(&self.pagination_links)
            .filter_map(|button| element_text(&button).parse::<u32>().ok())
            .any(|number| number > current);

        if !has_next {
            info!("No page {} found", current.saturating_add(1));
        }
        has_next
    }
}

fn compile(name: &str, css: &str) -> Result<Selector, ScanError> {
    Selector::parse(css).map_err(|e| ScanError::Selector(format!("for {name} '{css}': {e:?}")))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(scope: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(|el| element_text(&el))
}
