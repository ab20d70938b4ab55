use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::screening::router::{classify_handler, model_handler};
use crate::screening::screening_router;

#[tokio::test]
async fn classify_handler_returns_report() {
    let response = classify_handler(State(trained_pipeline()), axum::Json(submission()))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["decision"], "Approved");
    assert_eq!(
        payload["class_order"],
        json!(["Approved", "PartiallyApproved", "Rejected"])
    );
    let probabilities = payload["probabilities"].as_object().expect("named map");
    assert_eq!(probabilities.len(), 3);
    let explanation = payload["explanation"].as_array().expect("explanation list");
    assert_eq!(explanation.len(), 3);
    assert!(explanation[0].get("feature").and_then(Value::as_str).is_some());
    assert!(payload.get("explanation_error").is_none());
}

#[tokio::test]
async fn classify_handler_rejects_out_of_range_scores() {
    let mut submission = submission();
    submission.technical_score = 140;

    let response = classify_handler(State(trained_pipeline()), axum::Json(submission))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("technical_score"));
}

#[tokio::test]
async fn classify_handler_rejects_unknown_language() {
    let mut submission = submission();
    submission.languages.push("Haskell".to_string());

    let response = classify_handler(State(trained_pipeline()), axum::Json(submission))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    let message = payload["error"].as_str().expect("error message");
    assert!(message.starts_with("screening error:"));
    assert!(message.contains("unknown language 'Haskell'"));
}

#[tokio::test]
async fn model_handler_exposes_schema_and_card() {
    let response = model_handler(State(trained_pipeline())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["schema"].as_array().map(Vec::len), Some(10));
    assert_eq!(payload["card"]["samples"], 1000);
    assert!(payload["card"]["trained_at"].is_string());
}

#[tokio::test]
async fn classify_route_accepts_payloads() {
    let router = screening_router(trained_pipeline());

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/screening/classify")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({
                        "experience_years": 1,
                        "education": "bootcamp",
                        "technical_score": 40,
                        "soft_skill_score": 1,
                        "months_unemployed": 14,
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["decision"], "Rejected");
}

#[tokio::test]
async fn model_route_is_mounted() {
    let router = screening_router(trained_pipeline());

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/screening/model")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
}
