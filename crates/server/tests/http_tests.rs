//! Router tests: form page, prediction round trips, and the error contract.

use std::sync::Arc;

use anemia_core::features::SCALE;
use anemia_core::{Model, Node, Tree};
use anemia_server::{build_router, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Single tree keyed entirely on diet (feature 2): poor diet scores 1.0,
/// anything else 0.0
fn test_router() -> Router {
    let tree = Tree::new(
        vec![
            Node::internal(0, 2, 500_000, 1, 2, 333_333),
            Node::leaf(1, SCALE),
            Node::leaf(2, 0),
        ],
        SCALE,
    );
    let model = Model::new(vec![tree], 0);
    let state = AppState::new(model).unwrap();
    build_router(Arc::new(state))
}

fn predict_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

const HEALTHY_FORM: &str = "age=30&gender=1&diet=2&activity=1&menstrual_cycle=0&iron_intake=1&sleep_duration=1&bmi=1";
const POOR_DIET_FORM: &str = "age=30&gender=1&diet=0&activity=1&menstrual_cycle=0&iron_intake=1&sleep_duration=1&bmi=1";

#[tokio::test]
async fn test_index_serves_the_form() {
    let response = test_router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("<form action=\"/predict\""));
    assert!(body.contains("name=\"age\""));
}

#[tokio::test]
async fn test_predict_at_risk_with_explanation() {
    let response = test_router()
        .oneshot(predict_request(POOR_DIET_FORM))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("At Risk of Anemia"));
    // diet drove the whole score, so it leads the attribution text
    assert!(body.contains("diet (increases risk by"));
    // diet=0 always carries the poor-diet advice
    assert!(body.contains("Your diet seems poor."));
}

#[tokio::test]
async fn test_predict_not_at_risk() {
    let response = test_router()
        .oneshot(predict_request(HEALTHY_FORM))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Not at Risk"));
    assert!(!body.contains("At Risk of Anemia"));
}

#[tokio::test]
async fn test_missing_required_field_is_an_error() {
    // No age field at all
    let body = "gender=1&diet=2&activity=1&menstrual_cycle=0&iron_intake=1&sleep_duration=1&bmi=1";
    let response = test_router().oneshot(predict_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let text = body_text(response).await;
    assert!(text.starts_with("Error: "));
    assert!(text.contains("age"));
}

#[tokio::test]
async fn test_non_numeric_field_is_an_error() {
    let body = "age=thirty&gender=1&diet=2&activity=1&menstrual_cycle=0&iron_intake=1&sleep_duration=1&bmi=1";
    let response = test_router().oneshot(predict_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let text = body_text(response).await;
    assert!(text.starts_with("Error: "));
}

#[tokio::test]
async fn test_symptom_checkboxes_default_off() {
    // Same as healthy form plus one symptom; only that symptom shows up
    let body = format!("{HEALTHY_FORM}&weakness=1");
    let response = test_router().oneshot(predict_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(text.contains("You have symptoms like weakness."));
    assert!(!text.contains("pale skin"));
}

#[tokio::test]
async fn test_health_reports_model() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["trees"], 1);
    assert_eq!(json["model_hash"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_predict_with_trained_model() {
    // End to end with a genuinely trained ensemble instead of the fixture
    use anemia_trainer::{synthesize, Dataset, GbdtTrainer, SynthConfig, TrainParams};

    let rows = synthesize(&SynthConfig {
        records: 400,
        seed: 42,
    });
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("anemia.csv");
    anemia_trainer::synth::write_csv(&csv, &rows).unwrap();

    let mut dataset = Dataset::from_csv(&csv).unwrap();
    dataset.shuffle(42);
    let model = GbdtTrainer::new(TrainParams {
        num_trees: 24,
        max_depth: 4,
        min_samples_leaf: 4,
        learning_rate: 100_000,
        quant_step: 1_000_000,
    })
    .train(&dataset)
    .unwrap();

    let state = AppState::new(model).unwrap();
    let router = build_router(Arc::new(state));

    let response = router.oneshot(predict_request(POOR_DIET_FORM)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("At Risk of Anemia"));
}
