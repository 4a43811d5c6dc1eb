//! Search term parsing: `"charizard ex #105/112 nm p4"` into a [`SearchQuery`]

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ScanError;
use crate::models::{Condition, SearchQuery};

const EXPECTED_FORMAT: &str = "Search term must be in a format like 'charizard ex #105/112 nm p4'";

// A condition word may not start with `p`, which keeps `p3`, `pg3` and `page`
// out of the condition slot.
static SEARCH_TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(.+?)\s+#([\w/]+)(?:\s+([^\WpP]\w*))?(?:\s+(?:p|pg|page)\s*(\d+))?\s*$",
    )
    .expect("search term pattern is valid")
});

/// Split a free-text search into name, number, condition and page limit.
///
/// `default_pages` is used when the text has no page marker.
pub fn parse_search_term(input: &str, default_pages: u32) -> Result<SearchQuery, ScanError> {
    let caps = SEARCH_TERM
        .captures(input.trim())
        .ok_or_else(|| ScanError::Format(EXPECTED_FORMAT.to_string()))?;

    let name = caps[1].trim().to_string();
    let catalog_number = caps[2].trim().to_uppercase();

    let condition = match caps.get(3) {
        Some(word) => word
            .as_str()
            .parse::<Condition>()
            .map_err(|e| ScanError::Format(format!("{e}. {EXPECTED_FORMAT}")))?,
        None => Condition::Unspecified,
    };

    let page_limit = match caps.get(4) {
        Some(digits) => digits
            .as_str()
            .parse::<u32>()
            .ok()
            .filter(|page| *page > 0)
            .ok_or_else(|| {
                ScanError::Format(format!(
                    "Page count '{}' must be a positive number. {EXPECTED_FORMAT}",
                    digits.as_str()
                ))
            })?,
        None => default_pages,
    };

    Ok(SearchQuery {
        name,
        catalog_number,
        condition,
        page_limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_fields() {
        let query = parse_search_term("charizard ex #105/112 nm p3", 5).unwrap();
        assert_eq!(query.name, "charizard ex");
        assert_eq!(query.catalog_number, "105/112");
        assert_eq!(query.condition, Condition::NearMint);
        assert_eq!(query.page_limit, 3);
    }

    #[test]
    fn keywords_are_case_insensitive_and_whitespace_tolerant() {
        let query = parse_search_term("   Charizard EX   #105/112sv   LP   PAGE 4  ", 5).unwrap();
        assert_eq!(query.name, "Charizard EX");
        assert_eq!(query.catalog_number, "105/112SV");
        assert_eq!(query.condition, Condition::LightlyPlayed);
        assert_eq!(query.page_limit, 4);
    }

    #[test]
    fn condition_and_page_default() {
        let query = parse_search_term("pikachu #25/102", 7).unwrap();
        assert_eq!(query.name, "pikachu");
        assert_eq!(query.catalog_number, "25/102");
        assert_eq!(query.condition, Condition::Unspecified);
        assert_eq!(query.page_limit, 7);
    }

    #[test]
    fn page_marker_is_not_taken_as_condition() {
        for (input, page) in [
            ("pikachu #25 p2", 2),
            ("pikachu #25 pg9", 9),
            ("pikachu #25 page 3", 3),
            ("pikachu #25 p 12", 12),
        ] {
            let query = parse_search_term(input, 5).unwrap();
            assert_eq!(query.condition, Condition::Unspecified, "{input}");
            assert_eq!(query.page_limit, page, "{input}");
        }
    }

    #[test]
    fn condition_without_page() {
        let query = parse_search_term("mew #8 d", 5).unwrap();
        assert_eq!(query.condition, Condition::Damaged);
        assert_eq!(query.page_limit, 5);
    }

    #[test]
    fn missing_number_is_a_format_error() {
        let err = parse_search_term("pikachu", 5).unwrap_err();
        assert!(matches!(err, ScanError::Format(msg) if msg.contains("charizard ex #105/112 nm p4")));
        assert!(parse_search_term("#25/102", 5).is_err());
        assert!(parse_search_term("pikachu#25", 5).is_err());
        assert!(parse_search_term("", 5).is_err());
    }

    #[test]
    fn dangling_page_keyword_is_rejected() {
        assert!(parse_search_term("pikachu #25 page", 5).is_err());
    }

    #[test]
    fn unknown_condition_is_rejected() {
        let err = parse_search_term("pikachu #25 mint", 5).unwrap_err();
        assert!(matches!(err, ScanError::Format(msg) if msg.contains("mint")));
    }

    #[test]
    fn zero_pages_is_rejected() {
        assert!(parse_search_term("pikachu #25 p0", 5).is_err());
    }
}
