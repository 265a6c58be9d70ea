mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;

fn post_json(uri: &str, body: serde_json::Value) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?)
}

#[tokio::test]
async fn unknown_phase_is_not_found() -> Result<()> {
    let (status, _) = common::send(common::router(false)?, common::get("/maand9/1", None)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::send(common::router(false)?, common::get("/maand12", None)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn phase_record_without_injury_is_rejected() -> Result<()> {
    let request = post_json("/week6", json!({ "knie_flexie": 110 }))?;
    let (status, body) = common::send(common::router(false)?, request).await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"]["blessure_id"].is_string());
    Ok(())
}

#[tokio::test]
async fn phase_columns_are_checked_against_the_phase() -> Result<()> {
    // sidehop is only recorded at Month 6
    let request = post_json(
        "/maand3",
        json!({ "blessure_id": 4, "sidehop_l": 150, "kracht_soleus_r": 80.5 }),
    )?;
    let (status, body) = common::send(common::router(false)?, request).await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"]["sidehop_l"].is_string());
    assert!(body["field_errors"].get("kracht_soleus_r").is_none());
    Ok(())
}

#[tokio::test]
async fn invalid_patient_is_unprocessable() -> Result<()> {
    let request = post_json("/patients", json!({ "geslacht": "M" }))?;
    let (status, body) = common::send(common::router(false)?, request).await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"]["naam"].is_string());
    assert!(body["field_errors"]["geslacht"].is_string());
    Ok(())
}

#[tokio::test]
async fn injury_categories_are_validated() -> Result<()> {
    let request = post_json(
        "/blessure",
        json!({ "patient_id": 1, "zijde": "Left", "sportniveau": "Topsport" }),
    )?;
    let (status, body) = common::send(common::router(false)?, request).await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"]["zijde"].is_string());
    assert!(body["field_errors"].get("sportniveau").is_none());
    Ok(())
}

#[tokio::test]
async fn health_reports_unreachable_database() -> Result<()> {
    let (status, body) = common::send(common::router(false)?, common::get("/health", None)).await?;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["data"]["status"], "degraded");
    Ok(())
}
