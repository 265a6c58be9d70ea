use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap},
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::handlers::public::media::MediaQuery;
use crate::middleware::{ApiResponse, ApiResult};

/// PUT /media/file?path= - upload the request body to OneDrive
pub async fn media_put(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Value> {
    let drive = state.file_store()?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let size = body.len();
    drive.upload(&query.path, body.to_vec(), content_type).await?;

    tracing::info!("[MEDIA] stored {} ({} bytes)", query.path, size);
    Ok(ApiResponse::created(json!({ "path": query.path, "size": size })))
}
