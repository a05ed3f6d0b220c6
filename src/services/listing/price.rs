use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

// Matches the currency-code literal (with its trailing space) and the
// thousands separators, both of which are stripped before parsing.
static CURRENCY_MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"PKR\s|,").expect("valid regex"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("price token {token:?} is not an integer amount")]
pub struct NormalizationError {
    pub token: String,
}

/// Clamps a caller-supplied divisor to something usable: anything that is
/// not a positive finite number means "no conversion".
pub fn effective_divisor(divisor: f64) -> f64 {
    if divisor.is_finite() && divisor > 0.0 {
        divisor
    } else {
        1.0
    }
}

/// Converts a raw price token such as `"PKR 1,200"` into a non-negative
/// integer unit amount, divided by `divisor` and truncated toward zero.
pub fn normalize_price(raw: &str, divisor: f64) -> Result<u64, NormalizationError> {
    let stripped = CURRENCY_MARKUP.replace_all(raw.trim(), "");
    let amount: u64 = stripped.trim().parse().map_err(|_| NormalizationError {
        token: raw.to_string(),
    })?;

    let divisor = effective_divisor(divisor);
    if divisor == 1.0 {
        return Ok(amount);
    }
    Ok((amount as f64 / divisor).floor() as u64)
}
