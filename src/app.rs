use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, put},
    Extension, Router,
};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::analysis::Phase;
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::storage::OneDriveClient;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseManager,
    pub config: Arc<AppConfig>,
    pub onedrive: Option<Arc<OneDriveClient>>,
}

impl AppState {
    pub fn new(db: DatabaseManager, config: AppConfig, onedrive: Option<OneDriveClient>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            onedrive: onedrive.map(Arc::new),
        }
    }

    pub fn pool(&self) -> PgPool {
        self.db.pool().clone()
    }

    /// 503 while Graph credentials are not configured.
    pub fn file_store(&self) -> Result<&OneDriveClient, ApiError> {
        self.onedrive
            .as_deref()
            .ok_or_else(|| ApiError::service_unavailable("File store is not configured"))
    }
}

pub fn build_router(state: AppState) -> Router {
    let auth = middleware::from_fn_with_state(state.clone(), jwt_auth_middleware);

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Media: GET is public (embedded in plans), PUT needs a token
        .route(
            "/media/file",
            get(public::media_get).merge(put(protected::media_put).route_layer(auth.clone())),
        )
        // Protected
        .merge(protected_routes().route_layer(auth))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected_routes() -> Router<AppState> {
    let mut router = Router::new()
        .merge(patient_routes())
        .merge(blessure_routes())
        .merge(analysis_routes())
        .route("/timeline/:blessure_id", get(protected::timeline_get))
        .route("/populatie/summary", get(protected::populatie_summary))
        .route("/populatie/:blessure_id", get(protected::populatie_injury));

    for phase in Phase::ALL {
        router = router.nest(&format!("/{}", phase.table()), phase_routes(phase));
    }
    router
}

fn patient_routes() -> Router<AppState> {
    Router::new()
        .route("/patients", get(protected::patients_get).post(protected::patient_post))
        .route(
            "/patients/:id",
            get(protected::patient_get)
                .put(protected::patient_put)
                .delete(protected::patient_delete),
        )
}

fn blessure_routes() -> Router<AppState> {
    Router::new()
        .route("/blessure/options", get(protected::blessure_options))
        .route("/blessure", get(protected::blessures_get).post(protected::blessure_post))
        .route(
            "/blessure/:id",
            get(protected::blessure_get)
                .put(protected::blessure_put)
                .delete(protected::blessure_delete),
        )
}

// Same route family for every phase table.
fn phase_routes(phase: Phase) -> Router<AppState> {
    Router::new()
        .route("/", get(protected::phase_list).post(protected::phase_post))
        .route(
            "/:blessure_id",
            get(protected::phase_get).delete(protected::phase_delete),
        )
        .layer(Extension(phase))
}

fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/kracht/group", get(protected::kracht_group))
        .route("/functioneel/group", get(protected::functioneel_group))
        .route("/metrics/summary", get(protected::metrics_summary))
        .route("/individueel/:patient_id/dashboard", get(protected::individueel_dashboard))
        .route("/individueel/:patient_id/summary", get(protected::individueel_summary))
        .route("/individueel/:patient_id/kracht", get(protected::individueel_kracht))
        .route("/individueel/:patient_id/metrics", get(protected::individueel_metrics))
        .route("/individueel/:patient_id/functioneel", get(protected::individueel_functioneel))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}
