// Group analysis endpoints. Each reads the full phase record sets and runs the
// engine over them; nothing is cached between requests.
use axum::extract::State;

use crate::analysis::report::{
    functional_report, metrics_report, strength_report, FunctionalReport, MetricsPhase, StrengthPhase,
};
use crate::app::AppState;
use crate::database::load_cohort;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /kracht/group - strength tests and H/Q, ADD/ABD ratios per follow-up phase
pub async fn kracht_group(State(state): State<AppState>) -> ApiResult<Vec<StrengthPhase>> {
    let cohort = load_cohort(&state.pool(), None).await?;
    let report = strength_report(&cohort, &state.config.analysis_options());
    tracing::info!("[KRACHT] group report over {} phases", report.len());
    Ok(ApiResponse::success(report))
}

/// GET /functioneel/group - baseline screening, functional and jump tests, hop cluster
pub async fn functioneel_group(State(state): State<AppState>) -> ApiResult<FunctionalReport> {
    let cohort = load_cohort(&state.pool(), None).await?;
    let report = functional_report(&cohort, &state.config.analysis_options());
    tracing::info!("[FUNCTIONEEL] group report over {} phases", report.phases.len());
    Ok(ApiResponse::success(report))
}

/// GET /metrics/summary - girth and knee mobility per phase
pub async fn metrics_summary(State(state): State<AppState>) -> ApiResult<Vec<MetricsPhase>> {
    let cohort = load_cohort(&state.pool(), None).await?;
    let report = metrics_report(&cohort, &state.config.analysis_options());
    tracing::info!("[METRICS] summary over {} phases", report.len());
    Ok(ApiResponse::success(report))
}
