//! Generated downloads: the diet chart and the health summary.

use axum::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::layout::{ComposeError, DownloadableArtifact};

pub mod diet_chart;
pub mod handlers;
pub mod health_summary;

/// Runs a layout pass on the blocking pool.
pub async fn generate_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, ComposeError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("document task failed: {e}")))?;
    Ok(result?)
}

/// Serves an artifact as a file download.
pub fn attachment(artifact: DownloadableArtifact) -> Response {
    let disposition = content_disposition(&artifact.filename);
    (
        [
            (CONTENT_TYPE, artifact.content_type.to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}

/// `attachment` disposition with a quoted ASCII fallback name and the exact
/// UTF-8 name as an RFC 5987 `filename*` parameter.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        percent_encode(filename)
    )
}

/// Percent-encodes everything outside the RFC 5987 `attr-char` set.
fn percent_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
