use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::analysis::Phase;
use crate::app::AppState;
use crate::database::models::{Blessure, Patient};
use crate::database::{BlessureRepository, PatientRepository, PhaseStore};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct Timeline {
    pub blessure: Blessure,
    pub patient: Option<Patient>,
    /// phase name -> record, null when the phase has not been recorded
    pub phases: Map<String, Value>,
}

/// GET /timeline/:blessure_id
pub async fn timeline_get(State(state): State<AppState>, Path(blessure_id): Path<i64>) -> ApiResult<Timeline> {
    let pool = state.pool();
    let blessure = BlessureRepository::new(pool.clone()).select_404(blessure_id).await?;
    let patient = PatientRepository::new(pool.clone()).select_one(blessure.patient_id).await?;

    let mut phases = Map::new();
    for phase in Phase::ALL {
        let row = PhaseStore::new(phase, pool.clone()).select_one(blessure_id).await?;
        phases.insert(phase.table().to_string(), row.unwrap_or(Value::Null));
    }

    Ok(ApiResponse::success(Timeline { blessure, patient, phases }))
}
