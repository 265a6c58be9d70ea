use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::auth::Role;
use crate::database::models::{Patient, PatientInput, PatientWithBlessures};
use crate::database::PatientRepository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /patients - every patient with their injuries
pub async fn patients_get(State(state): State<AppState>) -> ApiResult<Vec<PatientWithBlessures>> {
    let patients = PatientRepository::new(state.pool()).select_all().await?;
    Ok(ApiResponse::success(patients))
}

/// GET /patients/:id
pub async fn patient_get(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
) -> ApiResult<PatientWithBlessures> {
    let patient = PatientRepository::new(state.pool())
        .select_with_blessures(patient_id)
        .await?;
    Ok(ApiResponse::success(patient))
}

/// POST /patients
pub async fn patient_post(
    State(state): State<AppState>,
    Json(input): Json<PatientInput>,
) -> ApiResult<Patient> {
    let errors = input.validate(true);
    if !errors.is_empty() {
        return Err(ApiError::unprocessable_entity("Invalid patient", errors));
    }

    let patient = PatientRepository::new(state.pool()).insert(&input).await?;
    tracing::info!("[PATIENT] created {}", patient.patient_id);
    Ok(ApiResponse::created(patient))
}

/// PUT /patients/:id - partial update
pub async fn patient_put(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
    Json(input): Json<PatientInput>,
) -> ApiResult<Patient> {
    let errors = input.validate(false);
    if !errors.is_empty() {
        return Err(ApiError::unprocessable_entity("Invalid patient", errors));
    }

    let patient = PatientRepository::new(state.pool()).update(patient_id, &input).await?;
    tracing::info!("[PATIENT] updated {}", patient_id);
    Ok(ApiResponse::success(patient))
}

/// DELETE /patients/:id - owner only; cascades to injuries and phase records
pub async fn patient_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(patient_id): Path<i64>,
) -> ApiResult<()> {
    user.require_role(Role::Owner)?;

    PatientRepository::new(state.pool()).delete(patient_id).await?;
    tracing::info!("[PATIENT] {} deleted {}", user.email, patient_id);
    Ok(ApiResponse::<()>::no_content())
}
