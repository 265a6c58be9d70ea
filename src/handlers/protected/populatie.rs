use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::population::{InjuryProfile, PopulationSummary};
use crate::database::PopulationRepository;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /populatie/summary - patient count, mean milestone intervals and category shares
pub async fn populatie_summary(State(state): State<AppState>) -> ApiResult<PopulationSummary> {
    let summary = PopulationRepository::new(state.pool()).summary().await?;
    tracing::info!("[POPULATIE] summary over {} patients", summary.total_patients);
    Ok(ApiResponse::success(summary))
}

/// GET /populatie/:blessure_id
pub async fn populatie_injury(
    State(state): State<AppState>,
    Path(blessure_id): Path<i64>,
) -> ApiResult<InjuryProfile> {
    let profile = PopulationRepository::new(state.pool()).injury_profile(blessure_id).await?;
    Ok(ApiResponse::success(profile))
}
