use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::auth::extractor::Session;
use crate::error::AppError;
use crate::state::SharedState;

/// PDFs open in the browser; everything else is downloaded.
pub fn content_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && *c != '"')
        .collect();
    let mode = if safe.to_lowercase().ends_with(".pdf") {
        "inline"
    } else {
        "attachment"
    };
    format!("{mode}; filename=\"{safe}\"")
}

pub async fn download(
    session: Session,
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let file = state
        .api
        .download_file(&session.token, &filename)
        .await
        .map_err(|e| AppError::from(e).with_message("Gagal mengunduh file"))?;

    tracing::debug!(%filename, size = file.bytes.len(), "Proxying document");

    let disposition = content_disposition(&filename);
    // An inline document must be typed as PDF or the browser downloads it anyway.
    let content_type = if disposition.starts_with("inline") {
        "application/pdf".to_string()
    } else {
        file.content_type.unwrap_or_else(|| "application/octet-stream".to_string())
    };
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}
