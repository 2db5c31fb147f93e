use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::upload::gate::CvFormat;

/// GET /uploads/:name
///
/// Streams a stored CV back through the active store backend, so the URL
/// shape is the same whether files live on disk, in memory, or in S3.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state.store.load(&name).await?;
    let mime = CvFormat::from_extension(&name)
        .map(|f| f.mime())
        .unwrap_or("application/octet-stream");
    Ok(([(header::CONTENT_TYPE, mime)], bytes))
}
