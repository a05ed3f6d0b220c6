use serde::{Deserialize, Serialize};

/// Number of pricing tiers a well-formed pricing cell carries. Rows with
/// fewer parsed entries are excluded from aggregation (documented
/// precondition of the export format, not a business rule).
pub const TIER_COUNT: usize = 3;

/// The three fixed pricing levels, in the positional order they occupy in a
/// parsed pricing cell (index 0, 1, 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Basic,
    Standard,
    Premium,
}

impl Tier {
    pub const ALL: [Tier; TIER_COUNT] = [Tier::Basic, Tier::Standard, Tier::Premium];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One pricing tier record recovered from a pricing cell. `price` is already
/// normalized (currency markup stripped, divisor applied).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingEntry {
    pub tier: String,
    pub price: u64,
    pub title: String,
    pub description: String,
}

/// One FAQ record. The answer is optional in the source data; the report
/// builder substitutes an explicit sentinel for missing or empty answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Answer", default)]
    pub answer: Option<String>,
}

/// Outcome of parsing one cell. "Empty" and "malformed" are distinct states
/// so the report builder can render each explicitly instead of collapsing
/// both into a caught error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCell<T> {
    Records(Vec<T>),
    Empty,
    Malformed,
}

impl<T> ParsedCell<T> {
    pub fn records(&self) -> Option<&[T]> {
        match self {
            ParsedCell::Records(entries) => Some(entries),
            _ => None,
        }
    }
}
