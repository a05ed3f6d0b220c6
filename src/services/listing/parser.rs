//! Record parser for the semi-structured cell formats embedded in listing
//! exports. Pricing cells arrive as pseudo-JSON with unreliable quoting, so
//! the scanner discards quotes and recovers entries positionally: `}, {`
//! separates entries, each carrying four fields in fixed order (Type,
//! Price, Title, Description). Not a general parser.

use smallvec::SmallVec;
use thiserror::Error;

use super::price::{normalize_price, NormalizationError};
use super::types::{FaqEntry, ParsedCell, PricingEntry};

/// Fixed field arity of one pricing entry.
const FIELDS_PER_ENTRY: usize = 4;

/// Separator between adjacent entries once whitespace has been collapsed.
const ENTRY_SEPARATOR: &str = "}, {";

/// Separator between the positional fields of one entry.
const FIELD_SEPARATOR: &str = ", ";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingParseError {
    #[error("entry {entry} has {found} fields, expected 4")]
    FieldArity { entry: usize, found: usize },
    #[error("entry {entry}, field {field} has no ':' separator")]
    MissingColon { entry: usize, field: usize },
    #[error("entry {entry}: {source}")]
    Price {
        entry: usize,
        #[source]
        source: NormalizationError,
    },
}

/// Parses a pricing cell into the three-way `ParsedCell` outcome. Scan
/// failures are downgraded here, at the cell boundary: they are logged and
/// become `Malformed`, never an error on the render path.
pub fn parse_pricing_cell(raw: &str, divisor: f64) -> ParsedCell<PricingEntry> {
    let sanitized = sanitize_pricing_cell(raw);
    if sanitized.is_empty() {
        return ParsedCell::Empty;
    }

    match scan_pricing(&sanitized, divisor) {
        Ok(entries) if entries.is_empty() => ParsedCell::Empty,
        Ok(entries) => ParsedCell::Records(entries),
        Err(err) => {
            tracing::debug!("pricing cell rejected: {}", err);
            ParsedCell::Malformed
        }
    }
}

/// Normalizes a pricing cell down to the scannable core: quoting is
/// unreliable in this format, so all quote characters are discarded rather
/// than repaired; then the outer list brackets go and whitespace runs
/// collapse to single spaces.
fn sanitize_pricing_cell(raw: &str) -> String {
    let unquoted: String = raw.chars().filter(|c| *c != '\'' && *c != '"').collect();
    let trimmed = unquoted.trim();
    let trimmed = trimmed.strip_prefix('[').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(']').unwrap_or(trimmed);

    let mut collapsed = String::with_capacity(trimmed.len());
    let mut in_whitespace = false;
    for c in trimmed.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                collapsed.push(' ');
            }
            in_whitespace = true;
        } else {
            collapsed.push(c);
            in_whitespace = false;
        }
    }

    collapsed.trim().to_string()
}

/// Scans a sanitized pricing cell into entries. Exposed for tests; callers
/// on the render path go through `parse_pricing_cell`.
pub fn scan_pricing(
    sanitized: &str,
    divisor: f64,
) -> Result<Vec<PricingEntry>, PricingParseError> {
    EntryScanner::new(sanitized)
        .enumerate()
        .map(|(index, entry)| scan_entry(entry, index, divisor))
        .collect()
}

/// Yields entry substrings, splitting on the closing-then-opening brace pair
/// and shedding the residual braces at each entry's extremes.
struct EntryScanner<'a> {
    rest: Option<&'a str>,
}

impl<'a> EntryScanner<'a> {
    fn new(sanitized: &'a str) -> Self {
        Self {
            rest: Some(sanitized),
        }
    }
}

impl<'a> Iterator for EntryScanner<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        let entry = match rest.find(ENTRY_SEPARATOR) {
            Some(at) => {
                self.rest = Some(&rest[at + ENTRY_SEPARATOR.len()..]);
                &rest[..at]
            }
            None => {
                self.rest = None;
                rest
            }
        };
        Some(entry.trim_matches(|c| c == '{' || c == '}').trim())
    }
}

/// Extracts the four positional fields of one entry. The first three fields
/// terminate at the field separator; the description takes whatever remains,
/// so a description containing `", "` survives intact. Each field's value is
/// everything after its first colon.
fn scan_entry(
    entry: &str,
    index: usize,
    divisor: f64,
) -> Result<PricingEntry, PricingParseError> {
    let mut fields: SmallVec<[&str; FIELDS_PER_ENTRY]> = SmallVec::new();
    let mut rest = entry;
    for _ in 0..FIELDS_PER_ENTRY - 1 {
        match rest.find(FIELD_SEPARATOR) {
            Some(at) => {
                fields.push(&rest[..at]);
                rest = &rest[at + FIELD_SEPARATOR.len()..];
            }
            None => break,
        }
    }
    fields.push(rest);

    if fields.len() < FIELDS_PER_ENTRY {
        return Err(PricingParseError::FieldArity {
            entry: index,
            found: fields.len(),
        });
    }

    let mut values: SmallVec<[&str; FIELDS_PER_ENTRY]> = SmallVec::new();
    for (field, part) in fields.iter().enumerate() {
        let (_, value) = part
            .split_once(':')
            .ok_or(PricingParseError::MissingColon { entry: index, field })?;
        values.push(value.trim());
    }

    let price = normalize_price(values[1], divisor)
        .map_err(|source| PricingParseError::Price { entry: index, source })?;

    Ok(PricingEntry {
        tier: values[0].to_string(),
        price,
        title: values[2].to_string(),
        description: values[3].to_string(),
    })
}

/// Parses an FAQ cell. The format is valid list-of-object syntax modulo
/// quote style, so every single quote becomes a double quote before a
/// standard JSON decode. A literal apostrophe inside a question or answer
/// corrupts the decode; that is a known limitation of the source format and
/// surfaces as `Malformed`, not a silent fix.
pub fn parse_faq_cell(raw: &str) -> ParsedCell<FaqEntry> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParsedCell::Empty;
    }

    let repaired = trimmed.replace('\'', "\"");
    match serde_json::from_str::<Vec<FaqEntry>>(&repaired) {
        Ok(entries) if entries.is_empty() => ParsedCell::Empty,
        Ok(entries) => ParsedCell::Records(entries),
        Err(err) => {
            tracing::debug!("FAQ cell rejected: {}", err);
            ParsedCell::Malformed
        }
    }
}

/// Parses a tags cell of the shape `[a, b, c]`: strip the bracket characters
/// at the extremes, split on comma, trim. No escaping is supported, so a tag
/// containing a comma mis-splits; known limitation.
pub fn parse_tags_cell(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.len() < 2 {
        return Vec::new();
    }

    let mut inner = trimmed.chars();
    inner.next();
    inner.next_back();
    inner
        .as_str()
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
