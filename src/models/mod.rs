//! Flat records passed between the scanning stages

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Placeholder for any field the page did not render.
pub const NOT_AVAILABLE: &str = "N/A";

/// Physical grading requested for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "unspecified")]
    Unspecified,
    #[serde(rename = "nm")]
    NearMint,
    #[serde(rename = "lp")]
    LightlyPlayed,
    #[serde(rename = "mp")]
    ModeratelyPlayed,
    #[serde(rename = "hp")]
    HeavilyPlayed,
    #[serde(rename = "d")]
    Damaged,
}

impl Condition {
    /// Short code as typed in a search term.
    pub fn code(self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::NearMint => "nm",
            Self::LightlyPlayed => "lp",
            Self::ModeratelyPlayed => "mp",
            Self::HeavilyPlayed => "hp",
            Self::Damaged => "d",
        }
    }

    /// Marketplace label, `None` when no filter was asked for.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Unspecified => None,
            Self::NearMint => Some("Near Mint"),
            Self::LightlyPlayed => Some("Lightly Played"),
            Self::ModeratelyPlayed => Some("Moderately Played"),
            Self::HeavilyPlayed => Some("Heavily Played"),
            Self::Damaged => Some("Damaged"),
        }
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unspecified" => Ok(Self::Unspecified),
            "nm" => Ok(Self::NearMint),
            "lp" => Ok(Self::LightlyPlayed),
            "mp" => Ok(Self::ModeratelyPlayed),
            "hp" => Ok(Self::HeavilyPlayed),
            "d" => Ok(Self::Damaged),
            other => Err(format!(
                "Unknown condition '{other}', expected one of nm, lp, mp, hp, d"
            )),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub name: String,
    /// Uppercased set-relative number, e.g. `105/112`.
    pub catalog_number: String,
    pub condition: Condition,
    pub page_limit: u32,
}

/// A result card whose catalog id contains the requested number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCandidate {
    pub name: String,
    pub set_name: String,
    pub catalog_id: String,
    pub detail_url: String,
    pub market_price: String,
}

/// One row of the latest sales table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub price: String,
    pub date: String,
    pub quantity: String,
    pub condition: String,
}

/// Everything the presenter needs for one finished query.
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub query: SearchQuery,
    pub candidate: ProductCandidate,
    /// Condition actually shown; `Unspecified` after a fallback.
    pub condition_shown: Condition,
    pub fell_back: bool,
    pub sales: Vec<SaleRecord>,
}
