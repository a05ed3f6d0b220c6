//! Report builder: composes the aggregate pricing summary and the per-row
//! listing cards into the display-ready tree the rendering layer consumes.
//! Every card slot always renders; missing scalars get documented defaults
//! and unparseable cells get explicit placeholders.

use calamine::Data;
use rayon::prelude::*;
use serde::Serialize;

use super::listing::parser::{parse_faq_cell, parse_pricing_cell, parse_tags_cell};
use super::listing::{FaqEntry, ParsedCell, PriceBook, PricingEntry, PricingSummary};
use super::workbook::{cell_text, cell_u64, SheetRows};

// Positional row layout of the export format. Position is the sole means of
// field identification.
const COL_TITLE: usize = 0;
const COL_DESCRIPTION: usize = 1;
const COL_PRICING: usize = 2;
const COL_FAQS: usize = 3;
const COL_TAGS: usize = 4;
const COL_ACTIVE_ORDERS: usize = 5;
const COL_SELLER_LEVEL: usize = 6;
const COL_REVIEWS: usize = 7;
const COL_RATING: usize = 8;
const COL_LIKES: usize = 9;
const COL_LINK: usize = 10;

const DEFAULT_TITLE: &str = "N/A";
const DEFAULT_DESCRIPTION: &str = "No description available";
const DEFAULT_SELLER_LEVEL: &str = "N/A";
const DEFAULT_RATING: &str = "N/A";
const DEFAULT_LINK: &str = "#";

const NO_PACKAGE_DATA: &str = "No package data available.";
const NO_FAQS_FOR_LISTING: &str = "No FAQs for this gig!";
const NO_FAQS_AVAILABLE: &str = "No FAQs available.";
const MISSING_ANSWER: &str = "[ANSWER IS MISSING]";

/// One section of the report tree, one per input file. Sections for files
/// that failed to fetch or decode still render, with a generic message; the
/// underlying error is logged, never shown.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileSection {
    Report {
        source: String,
        summary: PricingSummary,
        cards: Vec<ListingCard>,
    },
    NoData {
        source: String,
        message: String,
    },
    Failed {
        source: String,
        message: String,
    },
}

impl FileSection {
    pub fn failed(source: &str) -> Self {
        FileSection::Failed {
            source: source.to_string(),
            message: "File could not be processed.".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingCard {
    /// 1-based data-row position within the file.
    pub position: usize,
    pub title: String,
    pub description: String,
    pub packages: PackageBlock,
    pub faqs: FaqBlock,
    pub tags: Vec<String>,
    pub stats: ListingStats,
    pub link: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PackageBlock {
    Parsed { entries: Vec<PricingEntry> },
    Empty { message: String },
    Unavailable { message: String },
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FaqBlock {
    Parsed { entries: Vec<FaqCard> },
    Empty { message: String },
    Unavailable { message: String },
}

/// Display form of one FAQ: the answer is always present, with the missing-
/// answer sentinel substituted where the source had none.
#[derive(Debug, Serialize)]
pub struct FaqCard {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct ListingStats {
    pub active_orders: u64,
    pub seller_level: String,
    pub reviews: u64,
    pub rating: String,
    pub likes: u64,
}

/// Builds the report section for one file. All sheets contribute data rows
/// to one dataset (the first row of each sheet is a header and is skipped);
/// the summary aggregates across them and cards follow source row order.
pub fn build_file_section(source: &str, sheets: &[SheetRows], divisor: f64) -> FileSection {
    let data_rows: Vec<&[Data]> = sheets
        .iter()
        .flat_map(|sheet| sheet.rows.iter().skip(1).map(Vec::as_slice))
        .collect();

    if data_rows.is_empty() {
        return FileSection::NoData {
            source: source.to_string(),
            message: format!("No valid data found in {}", source),
        };
    }

    // Rows are independent; parse them in parallel, keep source order.
    let parsed: Vec<ParsedRow> = data_rows
        .par_iter()
        .map(|row| parse_row(row, divisor))
        .collect();

    let mut book = PriceBook::new();
    for row in &parsed {
        book.record(&row.packages);
    }
    tracing::info!(
        "{}: {} data rows, {} priced across all tiers",
        source,
        parsed.len(),
        book.rows_counted()
    );
    let summary = book.summarize();

    let cards = parsed
        .into_iter()
        .enumerate()
        .map(|(i, row)| row.into_card(i + 1))
        .collect();

    FileSection::Report {
        source: source.to_string(),
        summary,
        cards,
    }
}

/// Intermediate per-row result: parsed once, consumed by both the
/// aggregator and the card builder.
struct ParsedRow {
    title: String,
    description: String,
    packages: ParsedCell<PricingEntry>,
    faqs: ParsedCell<FaqEntry>,
    tags: Vec<String>,
    stats: ListingStats,
    link: String,
}

fn parse_row(row: &[Data], divisor: f64) -> ParsedRow {
    let packages = match cell_text(row, COL_PRICING) {
        Some(raw) => parse_pricing_cell(&raw, divisor),
        None => ParsedCell::Empty,
    };
    let faqs = match cell_text(row, COL_FAQS) {
        Some(raw) => parse_faq_cell(&raw),
        None => ParsedCell::Empty,
    };
    let tags = cell_text(row, COL_TAGS)
        .map(|raw| parse_tags_cell(&raw))
        .unwrap_or_default();

    ParsedRow {
        title: cell_text(row, COL_TITLE).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: cell_text(row, COL_DESCRIPTION)
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        packages,
        faqs,
        tags,
        stats: ListingStats {
            active_orders: cell_u64(row, COL_ACTIVE_ORDERS).unwrap_or(0),
            seller_level: cell_text(row, COL_SELLER_LEVEL)
                .unwrap_or_else(|| DEFAULT_SELLER_LEVEL.to_string()),
            reviews: cell_u64(row, COL_REVIEWS).unwrap_or(0),
            rating: cell_text(row, COL_RATING).unwrap_or_else(|| DEFAULT_RATING.to_string()),
            likes: cell_u64(row, COL_LIKES).unwrap_or(0),
        },
        link: cell_text(row, COL_LINK).unwrap_or_else(|| DEFAULT_LINK.to_string()),
    }
}

impl ParsedRow {
    fn into_card(self, position: usize) -> ListingCard {
        ListingCard {
            position,
            title: self.title,
            description: self.description,
            packages: package_block(self.packages),
            faqs: faq_block(self.faqs),
            tags: self.tags,
            stats: self.stats,
            link: self.link,
        }
    }
}

fn package_block(cell: ParsedCell<PricingEntry>) -> PackageBlock {
    match cell {
        ParsedCell::Records(entries) => PackageBlock::Parsed { entries },
        ParsedCell::Empty => PackageBlock::Empty {
            message: NO_PACKAGE_DATA.to_string(),
        },
        ParsedCell::Malformed => PackageBlock::Unavailable {
            message: NO_PACKAGE_DATA.to_string(),
        },
    }
}

fn faq_block(cell: ParsedCell<FaqEntry>) -> FaqBlock {
    match cell {
        ParsedCell::Records(entries) => FaqBlock::Parsed {
            entries: entries
                .into_iter()
                .map(|entry| FaqCard {
                    question: entry.question,
                    answer: entry
                        .answer
                        .filter(|a| !a.is_empty())
                        .unwrap_or_else(|| MISSING_ANSWER.to_string()),
                })
                .collect(),
        },
        ParsedCell::Empty => FaqBlock::Empty {
            message: NO_FAQS_FOR_LISTING.to_string(),
        },
        ParsedCell::Malformed => FaqBlock::Unavailable {
            message: NO_FAQS_AVAILABLE.to_string(),
        },
    }
}
