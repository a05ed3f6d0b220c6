use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Upper bound on downloaded spreadsheet size, in bytes.
    pub max_file_size: usize,
    /// Divisor applied to every normalized price when the request does not
    /// supply one. 1.0 means no conversion.
    pub default_divisor: f64,
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        let max_file_size = std::env::var("MAX_FILE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_max_file_size);

        let default_divisor = std::env::var("DEFAULT_CONVERSION_DIVISOR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1.0);

        Ok(Config {
            max_file_size,
            default_divisor,
        })
    }
}
