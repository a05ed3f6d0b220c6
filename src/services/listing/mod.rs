pub mod aggregate;
pub mod parser;
pub mod price;
pub mod types;

pub use aggregate::{PriceBook, PricingSummary, TierSummary};
pub use types::{FaqEntry, ParsedCell, PricingEntry, Tier};
