use axum::{extract::State, http::Method, routing::post, Json, Router};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    error::AppError,
    services::{
        fetch,
        listing::price,
        report::{self, FileSection},
        workbook,
    },
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/reports/generate", post(generate_report))
        .layer(cors)
}

#[derive(Debug, Deserialize)]
pub struct FileInfo {
    name: String,
    signed_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    files: Vec<FileInfo>,
    /// Divisor applied to every normalized price in this run. Falls back to
    /// the configured default, and to 1.0 when that is unusable.
    conversion_divisor: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    generated_at: String,
    conversion_divisor: f64,
    sections: Vec<FileSection>,
}

#[axum::debug_handler]
async fn generate_report(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    let start = std::time::Instant::now();

    // Surfaces before any download or decode starts.
    if request.files.is_empty() {
        return Err(AppError::MissingInput);
    }

    // Resolved once per request and threaded explicitly from here down.
    let divisor = price::effective_divisor(
        request
            .conversion_divisor
            .unwrap_or(state.config.default_divisor),
    );
    tracing::info!(
        "Generating report for {} files with divisor {}",
        request.files.len(),
        divisor
    );

    let mut pending: FuturesUnordered<_> = request
        .files
        .iter()
        .map(|file| process_file(file, divisor, state.config.max_file_size))
        .collect();

    // Files are independent; sections land in completion order.
    let mut sections = Vec::with_capacity(request.files.len());
    while let Some(section) = pending.next().await {
        sections.push(section);
    }

    tracing::info!("Report generated in {:?}", start.elapsed());

    Ok(Json(ReportResponse {
        generated_at: chrono::Utc::now().to_rfc3339(),
        conversion_divisor: divisor,
        sections,
    }))
}

/// Fetches, decodes, and reports one file. Failures become a visible
/// placeholder section; they never abort the other files and the raw error
/// stays in the logs.
async fn process_file(file: &FileInfo, divisor: f64, max_file_size: usize) -> FileSection {
    let fetch_start = std::time::Instant::now();
    let bytes = match fetch::load_file_from_url(&file.signed_url, max_file_size).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!("Failed to fetch {}: {}", file.name, err);
            return FileSection::failed(&file.name);
        }
    };
    tracing::info!(
        "Fetched {} ({}KB) in {:?}",
        file.name,
        bytes.len() / 1024,
        fetch_start.elapsed()
    );

    let sheets = match workbook::decode_workbook(bytes) {
        Ok(sheets) => sheets,
        Err(err) => {
            tracing::error!("Failed to decode {}: {}", file.name, err);
            return FileSection::failed(&file.name);
        }
    };

    let build_start = std::time::Instant::now();
    let section = report::build_file_section(&file.name, &sheets, divisor);
    tracing::info!("Built section for {} in {:?}", file.name, build_start.elapsed());
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn state() -> State<Arc<AppState>> {
        State(Arc::new(AppState::new(Config {
            max_file_size: 1024,
            default_divisor: 1.0,
        })))
    }

    #[tokio::test]
    async fn empty_file_list_is_rejected_before_processing() {
        let request = ReportRequest {
            files: Vec::new(),
            conversion_divisor: None,
        };

        let result = generate_report(state(), Json(request)).await;
        assert!(matches!(result, Err(AppError::MissingInput)));
    }

    #[tokio::test]
    async fn unreachable_file_yields_failed_section() {
        let request = ReportRequest {
            files: vec![FileInfo {
                name: "gigs.xlsx".to_string(),
                signed_url: "http://127.0.0.1:1/gigs.xlsx".to_string(),
            }],
            conversion_divisor: Some(2.0),
        };

        let response = generate_report(state(), Json(request))
            .await
            .expect("request itself should succeed");
        assert_eq!(response.0.conversion_divisor, 2.0);
        assert_eq!(response.0.sections.len(), 1);
        assert!(matches!(response.0.sections[0], FileSection::Failed { .. }));
    }

    #[tokio::test]
    async fn one_failing_file_does_not_drop_the_others() {
        let request = ReportRequest {
            files: vec![
                FileInfo {
                    name: "first.xlsx".to_string(),
                    signed_url: "http://127.0.0.1:1/first.xlsx".to_string(),
                },
                FileInfo {
                    name: "second.xlsx".to_string(),
                    signed_url: "http://127.0.0.1:1/second.xlsx".to_string(),
                },
            ],
            conversion_divisor: None,
        };

        let response = generate_report(state(), Json(request))
            .await
            .expect("request itself should succeed");

        // Every file gets a section, failures included; completion order is
        // not guaranteed, so match by name.
        assert_eq!(response.0.sections.len(), 2);
        let mut sources: Vec<&str> = response
            .0
            .sections
            .iter()
            .map(|section| match section {
                FileSection::Failed { source, .. } => source.as_str(),
                other => panic!("expected failed section, got {:?}", other),
            })
            .collect();
        sources.sort_unstable();
        assert_eq!(sources, vec!["first.xlsx", "second.xlsx"]);
    }
}
