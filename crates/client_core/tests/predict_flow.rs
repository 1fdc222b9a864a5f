use std::{sync::Arc, time::Duration};

use axum::{http::StatusCode, routing::post, Json, Router};
use client_core::{
    ClientSettings, Orchestrator, PageSlots, PredictionClient, StaticInput, SubmitOutcome,
    UiState, TRANSPORT_FAILURE_MESSAGE,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn spawn_predict_server(status: StatusCode, body: Value) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route(
        "/predict",
        post(move |Json(_payload): Json<Value>| {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn orchestrator_for(server_url: String, page: Arc<PageSlots>) -> Orchestrator {
    let settings = ClientSettings {
        server_url,
        request_timeout: Duration::from_secs(5),
    };
    let client = PredictionClient::new(&settings).expect("client");
    Orchestrator::with_timeout(Arc::new(client), page, settings.request_timeout)
}

#[tokio::test]
async fn springfield_flu_scenario_renders_single_card() {
    let server_url = spawn_predict_server(
        StatusCode::OK,
        json!({
            "predicted_disease": "Flu",
            "specialist": "General Physician",
            "doctors": [{
                "name": "Dr. A",
                "rating": "4.8",
                "open_now_status": "Open",
                "address": "123 Main St",
                "phone": "555-1234",
                "website": "https://a.example",
                "gmaps_url": "https://maps.example/a"
            }]
        }),
    )
    .await;
    let page = Arc::new(PageSlots::new());
    let orchestrator = orchestrator_for(server_url, page.clone());

    let outcome = orchestrator
        .handle_submit(&StaticInput::new(["fever", "cough"], "Springfield"))
        .await;

    assert!(outcome.is_success());
    let html = page.snapshot().results_html;
    assert!(html.contains("<strong>Predicted Condition:</strong> Flu"));
    assert!(html.contains("Recommended Specialist: <strong>General Physician</strong>"));
    assert!(html.contains("Top 5 General Physicians near you:"));
    assert_eq!(html.matches("class=\"provider-card\"").count(), 1);
    assert!(html.contains("href=\"https://a.example\""));
    assert!(html.contains("href=\"https://maps.example/a\""));
    assert!(html.contains("4.8 ⭐"));
}

#[tokio::test]
async fn server_error_field_with_ok_status_reaches_the_page() {
    let server_url = spawn_predict_server(
        StatusCode::OK,
        json!({ "error": "Missing symptoms or location." }),
    )
    .await;
    let page = Arc::new(PageSlots::new());
    let orchestrator = orchestrator_for(server_url, page.clone());

    let outcome = orchestrator
        .handle_submit(&StaticInput::new(["fever"], "Springfield"))
        .await;

    assert_eq!(
        outcome,
        SubmitOutcome::Completed(UiState::Error("Missing symptoms or location.".to_string()))
    );
    assert!(page
        .snapshot()
        .results_html
        .contains("Missing symptoms or location."));
}

#[tokio::test]
async fn server_500_renders_generic_failure() {
    let server_url = spawn_predict_server(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "Backend server is not configured correctly." }),
    )
    .await;
    let page = Arc::new(PageSlots::new());
    let orchestrator = orchestrator_for(server_url, page.clone());

    let outcome = orchestrator
        .handle_submit(&StaticInput::new(["fever"], "Springfield"))
        .await;

    assert_eq!(
        outcome,
        SubmitOutcome::Completed(UiState::Error(TRANSPORT_FAILURE_MESSAGE.to_string()))
    );
    let snapshot = page.snapshot();
    assert!(!snapshot.results_html.contains("not configured"));
    assert!(!snapshot.loading_visible);
}
