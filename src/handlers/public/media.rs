use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct MediaQuery {
    pub path: String,
}

/// GET /media/file?path= - proxy a file from the practice's OneDrive
pub async fn media_get(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
) -> Result<Response, ApiError> {
    let drive = state.file_store()?;
    let (bytes, content_type) = drive.download(&query.path).await?;

    tracing::info!("[MEDIA] served {} ({} bytes)", query.path, bytes.len());
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "private, max-age=300".to_string()),
        ],
        bytes,
    )
        .into_response())
}
