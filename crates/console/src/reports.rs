//! Report generation and download.

use std::path::Path;

use thiserror::Error;

use warden_client::{AdminApi, ClientError, ReportRequest};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("failed to write report file: {0}")]
    Io(#[from] std::io::Error),
}

/// Request a report and write the returned blob to `path`.
///
/// The blob is opaque to the console (PDF or spreadsheet, per the request's
/// format flag). Returns the number of bytes written.
pub async fn download_report<A: AdminApi>(
    api: &A,
    request: &ReportRequest,
    path: &Path,
) -> Result<usize, ReportError> {
    let blob = api.generate_report(request).await?;
    tokio::fs::write(path, &blob).await?;
    tracing::info!(
        path = %path.display(),
        bytes = blob.len(),
        format = request.format.extension(),
        "report written"
    );
    Ok(blob.len())
}
