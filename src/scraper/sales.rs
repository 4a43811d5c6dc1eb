//! Latest sales table extraction

use scraper::{ElementRef, Html};

use super::{Scraper, first_text};
use crate::models::{NOT_AVAILABLE, SaleRecord};

impl Scraper {
    /// Read every row of the latest sales table, in the order rendered.
    ///
    /// Accepts either a whole page or the table body's outer HTML. Each cell
    /// falls back to "N/A" on its own.
    pub fn extract_sales(&self, html: &str) -> Vec<SaleRecord> {
        let document = parse_table_markup(html);

        let Some(table) = document.select(&self.sales_table).next() else {
            return Vec::new();
        };

        table
            .select(&self.sale_row)
            .map(|row| SaleRecord {
                price: cell(&row, &self.sale_price),
                date: cell(&row, &self.sale_date),
                quantity: cell(&row, &self.sale_quantity),
                condition: row
                    .select(&self.sale_condition)
                    .next()
                    .and_then(|toggle| own_text(&toggle))
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            })
            .collect()
    }
}

// A bare <tbody> or <tr> outside a table is dropped by the HTML parser.
fn parse_table_markup(html: &str) -> Html {
    let trimmed = html.trim_start();
    if trimmed.starts_with("<tbody") || trimmed.starts_with("<tr") {
        Html::parse_document(&format!("<table>{trimmed}</table>"))
    } else {
        Html::parse_document(html)
    }
}

fn cell(row: &ElementRef<'_>, selector: &scraper::Selector) -> String {
    first_text(row, selector).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// First non-blank text node directly under `element`, ignoring its children.
fn own_text(element: &ElementRef<'_>) -> Option<String> {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use crate::config::SiteSelectors;
    use crate::scraper::Scraper;

    fn scraper() -> Scraper {
        Scraper::with_selectors(&SiteSelectors::default(), true).unwrap()
    }

    const TABLE: &str = r#"<tbody class="latest-sales-table__tbody">
        <tr>
            <td class="latest-sales-table__tbody__date">3/14/25</td>
            <td class="latest-sales-table__tbody__condition">
                <div class="tcg-tooltip"><span class="tcg-tooltip__toggle">
                    Near Mint
                    <button class="tcg-tooltip__trigger">Holofoil</button>
                </span></div>
            </td>
            <td class="latest-sales-table__tbody_quantity">1</td>
            <td class="latest-sales-table__tbody__price">$12.99</td>
        </tr>
        <tr>
            <td class="latest-sales-table__tbody__date">3/12/25</td>
            <td><span class="tcg-tooltiptoggle">Lightly Played</span></td>
            <td class="latest-sales-table__tbody_quantity">2</td>
        </tr>
        <tr>
            <td class="latest-sales-table__tbody__date">3/10/25</td>
            <td class="latest-sales-table__tbody__price">$9.00</td>
        </tr>
    </tbody>"#;

    #[test]
    fn rows_are_read_in_order() {
        let sales = scraper().extract_sales(TABLE);
        assert_eq!(sales.len(), 3);

        assert_eq!(sales[0].price, "$12.99");
        assert_eq!(sales[0].date, "3/14/25");
        assert_eq!(sales[0].quantity, "1");
        assert_eq!(sales[1].date, "3/12/25");
        assert_eq!(sales[2].date, "3/10/25");
    }

    #[test]
    fn condition_excludes_nested_text() {
        let sales = scraper().extract_sales(TABLE);
        assert_eq!(sales[0].condition, "Near Mint");
        assert_eq!(sales[1].condition, "Lightly Played");
    }

    #[test]
    fn fields_fail_independently() {
        let sales = scraper().extract_sales(TABLE);

        assert_eq!(sales[1].price, "N/A");
        assert_eq!(sales[1].quantity, "2");
        assert_eq!(sales[1].condition, "Lightly Played");

        assert_eq!(sales[2].price, "$9.00");
        assert_eq!(sales[2].quantity, "N/A");
        assert_eq!(sales[2].condition, "N/A");
    }

    #[test]
    fn toggle_with_only_child_text_is_not_available() {
        let html = r#"<table><tbody class="latest-sales-table__tbody"><tr>
            <td><span class="tcg-tooltip__toggle"><b>Near Mint</b></span></td>
        </tr></tbody></table>"#;

        let sales = scraper().extract_sales(html);
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].condition, "N/A");
    }

    #[test]
    fn full_page_and_missing_table() {
        let page = format!("<html><body><div class=\"modal\"><table>{TABLE}</table></div></body></html>");
        assert_eq!(scraper().extract_sales(&page).len(), 3);

        assert!(scraper().extract_sales("<html><body></body></html>").is_empty());
    }
}
