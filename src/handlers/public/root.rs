use serde_json::{json, Value};

use crate::middleware::ApiResponse;

/// GET / - service descriptor
pub async fn root() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": "Revo Sport API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "ACL rehabilitation follow-up: patients, injuries, phase measurements and group analysis",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "media": "/media/file?path= (GET public, PUT protected)",
            "patients": "/patients[/:id] (protected)",
            "blessure": "/blessure[/:id], /blessure/options (protected)",
            "phases": "/baseline, /week6, /maand3, /maand45, /maand6 [/:blessure_id] (protected)",
            "timeline": "/timeline/:blessure_id (protected)",
            "populatie": "/populatie/summary, /populatie/:blessure_id (protected)",
            "analysis": "/kracht/group, /functioneel/group, /metrics/summary (protected)",
            "individueel": "/individueel/:patient_id/{dashboard,summary,kracht,metrics,functioneel} (protected)"
        }
    }))
}
