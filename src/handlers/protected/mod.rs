// Protected handlers (JWT authentication required)
//
// Middleware: jwt_auth_middleware inserts an AuthUser extension for every request.
pub mod analysis;
pub mod blessure;
pub mod individueel;
pub mod media;
pub mod patients;
pub mod phase;
pub mod populatie;
pub mod timeline;

pub use analysis::{functioneel_group, kracht_group, metrics_summary};
pub use blessure::{blessure_delete, blessure_get, blessure_options, blessure_post, blessure_put, blessures_get};
pub use individueel::{
    individueel_dashboard, individueel_functioneel, individueel_kracht, individueel_metrics, individueel_summary,
};
pub use media::media_put;
pub use patients::{patient_delete, patient_get, patient_post, patient_put, patients_get};
pub use phase::{phase_delete, phase_get, phase_list, phase_post};
pub use populatie::{populatie_injury, populatie_summary};
pub use timeline::timeline_get;
