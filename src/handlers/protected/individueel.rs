use axum::extract::{Path, State};
use serde::Serialize;

use crate::analysis::hop::HopCluster;
use crate::analysis::individual::{
    functional_by_injury, hop_by_injury, metrics_by_injury, overview, strength_by_injury, InjuryAnalysis,
    PatientOverview,
};
use crate::analysis::report::{FunctionalPhase, MetricsPhase, StrengthPhase};
use crate::analysis::Cohort;
use crate::app::AppState;
use crate::database::{load_cohort, BlessureRepository, PatientRepository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct PatientDashboard {
    pub patient_id: i64,
    pub naam: String,
    #[serde(flatten)]
    pub overview: PatientOverview,
    pub hop_cluster: Vec<InjuryAnalysis<HopCluster>>,
}

#[derive(Debug, Serialize)]
pub struct PatientAnalysis<T> {
    pub patient_id: i64,
    pub blessures: Vec<InjuryAnalysis<T>>,
}

struct PatientScope {
    patient_id: i64,
    naam: String,
    injury_ids: Vec<i64>,
    cohort: Cohort,
}

// Unknown patient -> 404. A patient without injuries yields empty analyses.
async fn scope(state: &AppState, patient_id: i64) -> Result<PatientScope, ApiError> {
    let pool = state.pool();
    let patient = PatientRepository::new(pool.clone()).select_404(patient_id).await?;
    let injury_ids: Vec<i64> = BlessureRepository::new(pool.clone())
        .select_for_patient(patient_id)
        .await?
        .into_iter()
        .map(|b| b.blessure_id)
        .collect();
    let cohort = load_cohort(&pool, Some(&injury_ids)).await?;

    tracing::info!("[INDIVIDUEEL] patient {} with {} injuries", patient_id, injury_ids.len());
    Ok(PatientScope {
        patient_id,
        naam: patient.naam,
        injury_ids,
        cohort,
    })
}

/// GET /individueel/:patient_id/dashboard
pub async fn individueel_dashboard(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
) -> ApiResult<PatientDashboard> {
    let s = scope(&state, patient_id).await?;
    Ok(ApiResponse::success(PatientDashboard {
        patient_id: s.patient_id,
        naam: s.naam,
        overview: overview(&s.cohort, &s.injury_ids),
        hop_cluster: hop_by_injury(&s.cohort, &s.injury_ids),
    }))
}

/// GET /individueel/:patient_id/summary
pub async fn individueel_summary(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
) -> ApiResult<PatientOverview> {
    let s = scope(&state, patient_id).await?;
    Ok(ApiResponse::success(overview(&s.cohort, &s.injury_ids)))
}

/// GET /individueel/:patient_id/kracht
pub async fn individueel_kracht(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
) -> ApiResult<PatientAnalysis<Vec<StrengthPhase>>> {
    let s = scope(&state, patient_id).await?;
    let blessures = strength_by_injury(&s.cohort, &s.injury_ids, &state.config.analysis_options());
    Ok(ApiResponse::success(PatientAnalysis { patient_id, blessures }))
}

/// GET /individueel/:patient_id/metrics
pub async fn individueel_metrics(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
) -> ApiResult<PatientAnalysis<Vec<MetricsPhase>>> {
    let s = scope(&state, patient_id).await?;
    let blessures = metrics_by_injury(&s.cohort, &s.injury_ids, &state.config.analysis_options());
    Ok(ApiResponse::success(PatientAnalysis { patient_id, blessures }))
}

/// GET /individueel/:patient_id/functioneel
pub async fn individueel_functioneel(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
) -> ApiResult<PatientAnalysis<Vec<FunctionalPhase>>> {
    let s = scope(&state, patient_id).await?;
    let blessures = functional_by_injury(&s.cohort, &s.injury_ids, &state.config.analysis_options());
    Ok(ApiResponse::success(PatientAnalysis { patient_id, blessures }))
}
