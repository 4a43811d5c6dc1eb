//! Search and product page URLs

use crate::config::UnspecifiedCondition;
use crate::models::Condition;

/// Results page `page` for a product name, spaces sent as `+`.
pub fn search_url(base_url: &str, name: &str, page: u32) -> String {
    let query = urlencoding::encode(name.trim()).replace("%20", "+");
    format!("{base_url}/search/all/product?&q={query}&page={page}")
}

/// Absolute product URL with the condition filter appended.
///
/// The listing href already carries a query string, so the filter is
/// appended with `&`.
pub fn format_product_url(
    base_url: &str,
    detail_url: &str,
    condition: Condition,
    unspecified: UnspecifiedCondition,
) -> String {
    let url = if detail_url.starts_with("http") {
        detail_url.to_string()
    } else {
        format!("{base_url}{detail_url}")
    };

    let label = match (condition, unspecified) {
        (Condition::Unspecified, UnspecifiedCondition::NearMint) => Condition::NearMint.label(),
        (condition, _) => condition.label(),
    };

    match label {
        Some(label) => format!("{url}&Condition={}", label.replace(' ', "+")),
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.tcgplayer.com";

    #[test]
    fn condition_is_appended() {
        assert_eq!(
            format_product_url(
                BASE,
                "/product/123",
                Condition::LightlyPlayed,
                UnspecifiedCondition::SiteDefault
            ),
            "https://www.tcgplayer.com/product/123&Condition=Lightly+Played"
        );
        assert_eq!(
            format_product_url(
                BASE,
                "/product/123?Language=English",
                Condition::Damaged,
                UnspecifiedCondition::SiteDefault
            ),
            "https://www.tcgplayer.com/product/123?Language=English&Condition=Damaged"
        );
    }

    #[test]
    fn unspecified_follows_policy() {
        assert_eq!(
            format_product_url(
                BASE,
                "/product/123",
                Condition::Unspecified,
                UnspecifiedCondition::SiteDefault
            ),
            "https://www.tcgplayer.com/product/123"
        );
        assert_eq!(
            format_product_url(
                BASE,
                "/product/123",
                Condition::Unspecified,
                UnspecifiedCondition::NearMint
            ),
            "https://www.tcgplayer.com/product/123&Condition=Near+Mint"
        );
    }

    #[test]
    fn absolute_links_are_kept() {
        assert_eq!(
            format_product_url(
                BASE,
                "https://www.tcgplayer.com/product/5",
                Condition::HeavilyPlayed,
                UnspecifiedCondition::SiteDefault
            ),
            "https://www.tcgplayer.com/product/5&Condition=Heavily+Played"
        );
    }

    #[test]
    fn search_url_encodes_name() {
        assert_eq!(
            search_url(BASE, "charizard ex", 2),
            "https://www.tcgplayer.com/search/all/product?&q=charizard+ex&page=2"
        );
        assert_eq!(
            search_url(BASE, "farfetch'd & co", 1),
            "https://www.tcgplayer.com/search/all/product?&q=farfetch%27d+%26+co&page=1"
        );
    }
}
