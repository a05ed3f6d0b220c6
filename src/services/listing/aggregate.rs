use serde::Serialize;

use super::types::{ParsedCell, PricingEntry, Tier, TIER_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierStats {
    pub lowest: u64,
    pub highest: u64,
    pub average: u64,
}

/// Aggregate outcome for one tier. A tier nobody priced is reported as an
/// explicit no-data marker, never a numeric placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "stats", rename_all = "snake_case")]
pub enum TierSummary {
    Available(TierStats),
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingSummary {
    pub basic: TierSummary,
    pub standard: TierSummary,
    pub premium: TierSummary,
}

/// Collects per-tier prices across the rows of one dataset.
///
/// Skip-the-row semantics: a row contributes to all three tiers or to none.
/// Malformed or empty pricing cells, and cells with fewer than `TIER_COUNT`
/// parsed entries, leave every tier untouched for that row.
#[derive(Debug, Default)]
pub struct PriceBook {
    tiers: [Vec<u64>; TIER_COUNT],
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, cell: &ParsedCell<PricingEntry>) {
        let Some(entries) = cell.records() else {
            return;
        };
        if entries.len() < TIER_COUNT {
            return;
        }
        for tier in Tier::ALL {
            self.tiers[tier.index()].push(entries[tier.index()].price);
        }
    }

    /// Number of rows that contributed prices. Every contributing row fills
    /// all three tiers, so any tier's length works.
    pub fn rows_counted(&self) -> usize {
        self.tiers[0].len()
    }

    pub fn summarize(self) -> PricingSummary {
        let [basic, standard, premium] = self.tiers.map(summarize_tier);
        PricingSummary {
            basic,
            standard,
            premium,
        }
    }
}

fn summarize_tier(mut prices: Vec<u64>) -> TierSummary {
    if prices.is_empty() {
        return TierSummary::NoData;
    }
    prices.sort_unstable();
    let lowest = prices[0];
    let highest = prices[prices.len() - 1];
    let average = prices.iter().sum::<u64>() / prices.len() as u64;
    TierSummary::Available(TierStats {
        lowest,
        highest,
        average,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(prices: [u64; 3]) -> ParsedCell<PricingEntry> {
        let records = Tier::ALL
            .iter()
            .zip(prices)
            .map(|(tier, price)| PricingEntry {
                tier: format!("{:?}", tier),
                price,
                title: String::new(),
                description: String::new(),
            })
            .collect();
        ParsedCell::Records(records)
    }

    #[test]
    fn computes_min_max_average_per_tier() {
        let mut book = PriceBook::new();
        book.record(&entries([1000, 5000, 9000]));
        book.record(&entries([2000, 4000, 8000]));
        book.record(&entries([1500, 4500, 8500]));

        let summary = book.summarize();
        assert_eq!(
            summary.basic,
            TierSummary::Available(TierStats {
                lowest: 1000,
                highest: 2000,
                average: 1500,
            })
        );
        assert_eq!(
            summary.premium,
            TierSummary::Available(TierStats {
                lowest: 8000,
                highest: 9000,
                average: 8500,
            })
        );
    }

    #[test]
    fn average_floors_toward_zero() {
        let mut book = PriceBook::new();
        book.record(&entries([10, 10, 10]));
        book.record(&entries([11, 11, 11]));

        let TierSummary::Available(stats) = book.summarize().basic else {
            panic!("expected stats");
        };
        assert_eq!(stats.average, 10);
    }

    #[test]
    fn short_rows_are_skipped_whole() {
        let mut book = PriceBook::new();
        book.record(&entries([1000, 2000, 3000]));
        book.record(&ParsedCell::Records(vec![PricingEntry {
            tier: "Basic".to_string(),
            price: 1,
            title: String::new(),
            description: String::new(),
        }]));
        book.record(&ParsedCell::Malformed);
        book.record(&ParsedCell::Empty);

        assert_eq!(book.rows_counted(), 1);
        let summary = book.summarize();
        assert_eq!(
            summary.basic,
            TierSummary::Available(TierStats {
                lowest: 1000,
                highest: 1000,
                average: 1000,
            })
        );
    }

    #[test]
    fn empty_tier_reports_no_data() {
        let summary = PriceBook::new().summarize();
        assert_eq!(summary.basic, TierSummary::NoData);
        assert_eq!(summary.standard, TierSummary::NoData);
        assert_eq!(summary.premium, TierSummary::NoData);
    }
}
