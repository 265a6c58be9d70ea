use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{Map, Value};

use crate::analysis::Phase;
use crate::app::AppState;
use crate::database::phase_store::validate_values;
use crate::database::PhaseStore;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

// Each phase table gets the same route family; the phase arrives as an extension.

/// GET /{phase}
pub async fn phase_list(State(state): State<AppState>, Extension(phase): Extension<Phase>) -> ApiResult<Vec<Value>> {
    let rows = PhaseStore::new(phase, state.pool()).select_all().await?;
    Ok(ApiResponse::success(rows))
}

/// GET /{phase}/:blessure_id
pub async fn phase_get(
    State(state): State<AppState>,
    Extension(phase): Extension<Phase>,
    Path(blessure_id): Path<i64>,
) -> ApiResult<Value> {
    let row = PhaseStore::new(phase, state.pool()).select_404(blessure_id).await?;
    Ok(ApiResponse::success(row))
}

/// POST /{phase} - upsert by `blessure_id`, touching only the supplied columns
pub async fn phase_post(
    State(state): State<AppState>,
    Extension(phase): Extension<Phase>,
    Json(mut body): Json<Map<String, Value>>,
) -> ApiResult<Value> {
    let Some(blessure_id) = body.remove("blessure_id").as_ref().and_then(Value::as_i64) else {
        let mut errors = HashMap::new();
        errors.insert("blessure_id".to_string(), "This field is required".to_string());
        return Err(ApiError::unprocessable_entity("Invalid phase record", errors));
    };

    let errors = validate_values(phase, &body);
    if !errors.is_empty() {
        tracing::warn!("[PHASE] rejected {} columns for {}", errors.len(), phase);
        return Err(ApiError::unprocessable_entity("Invalid phase record", errors));
    }

    let row = PhaseStore::new(phase, state.pool()).upsert(blessure_id, &body).await?;
    tracing::info!("[PHASE] saved {} for blessure {}", phase.label(), blessure_id);
    Ok(ApiResponse::success(row))
}

/// DELETE /{phase}/:blessure_id
pub async fn phase_delete(
    State(state): State<AppState>,
    Extension(phase): Extension<Phase>,
    Path(blessure_id): Path<i64>,
) -> ApiResult<()> {
    PhaseStore::new(phase, state.pool()).delete(blessure_id).await?;
    tracing::info!("[PHASE] deleted {} for blessure {}", phase.label(), blessure_id);
    Ok(ApiResponse::<()>::no_content())
}
