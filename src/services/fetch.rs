use bytes::Bytes;
use reqwest::Client;

use crate::error::AppError;

pub async fn load_file_from_url(url: &str, max_file_size: usize) -> Result<Bytes, AppError> {
    let client = Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::Http(format!("Failed to fetch file: {}", e)))?;

    if !response.status().is_success() {
        return Err(AppError::Http(format!(
            "Failed to fetch file. Status: {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::Http(format!("Failed to read response bytes: {}", e)))?;

    if bytes.len() > max_file_size {
        return Err(AppError::InvalidInput(format!(
            "File exceeds the {} byte limit",
            max_file_size
        )));
    }

    Ok(bytes)
}
