use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{Map, Value};

use crate::app::AppState;
use crate::database::models::{Blessure, BlessureInput, BlessureSummary, BLESSURE_OPTIONS};
use crate::database::BlessureRepository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /blessure/options - allowed values of every categorical field
pub async fn blessure_options() -> ApiResult<Value> {
    let options: Map<String, Value> = BLESSURE_OPTIONS
        .iter()
        .map(|(field, values)| (field.to_string(), Value::from(values.to_vec())))
        .collect();
    Ok(ApiResponse::success(Value::Object(options)))
}

/// GET /blessure - injury list with patient details
pub async fn blessures_get(State(state): State<AppState>) -> ApiResult<Vec<BlessureSummary>> {
    let rows = BlessureRepository::new(state.pool()).select_summaries().await?;
    Ok(ApiResponse::success(rows))
}

/// GET /blessure/:id
pub async fn blessure_get(
    State(state): State<AppState>,
    Path(blessure_id): Path<i64>,
) -> ApiResult<Blessure> {
    let blessure = BlessureRepository::new(state.pool()).select_404(blessure_id).await?;
    Ok(ApiResponse::success(blessure))
}

/// POST /blessure - the patient must exist
pub async fn blessure_post(
    State(state): State<AppState>,
    Json(input): Json<BlessureInput>,
) -> ApiResult<Blessure> {
    let errors = input.validate(true);
    let Some(patient_id) = input.patient_id.filter(|_| errors.is_empty()) else {
        return Err(ApiError::unprocessable_entity("Invalid injury", errors));
    };

    let blessure = BlessureRepository::new(state.pool()).insert(patient_id, &input).await?;
    tracing::info!("[BLESSURE] created {} for patient {}", blessure.blessure_id, patient_id);
    Ok(ApiResponse::created(blessure))
}

/// PUT /blessure/:id - partial update
pub async fn blessure_put(
    State(state): State<AppState>,
    Path(blessure_id): Path<i64>,
    Json(input): Json<BlessureInput>,
) -> ApiResult<Blessure> {
    let errors = input.validate(false);
    if !errors.is_empty() {
        return Err(ApiError::unprocessable_entity("Invalid injury", errors));
    }

    let blessure = BlessureRepository::new(state.pool()).update(blessure_id, &input).await?;
    tracing::info!("[BLESSURE] updated {}", blessure_id);
    Ok(ApiResponse::success(blessure))
}

/// DELETE /blessure/:id
pub async fn blessure_delete(
    State(state): State<AppState>,
    Path(blessure_id): Path<i64>,
) -> ApiResult<()> {
    BlessureRepository::new(state.pool()).delete(blessure_id).await?;
    tracing::info!("[BLESSURE] deleted {}", blessure_id);
    Ok(ApiResponse::<()>::no_content())
}
