use super::*;
use std::sync::Arc;

use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use shared::{
    domain::{LocationQuery, SymptomSelection},
    protocol::RatingValue,
};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

fn sample_request() -> PredictionRequest {
    PredictionRequest {
        symptoms: SymptomSelection::new(["fever", "cough"]),
        location: LocationQuery::parse("Springfield").expect("location"),
    }
}

fn settings(server_url: String, request_timeout: Duration) -> ClientSettings {
    ClientSettings {
        server_url,
        request_timeout,
    }
}

async fn spawn_router(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn spawn_predict_server(status: StatusCode, body: Value) -> (String, oneshot::Receiver<Value>) {
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));
    let app = Router::new().route(
        "/predict",
        post(move |Json(payload): Json<Value>| {
            let tx = tx.clone();
            let body = body.clone();
            async move {
                if let Some(tx) = tx.lock().await.take() {
                    let _ = tx.send(payload);
                }
                (status, Json(body))
            }
        }),
    );
    (spawn_router(app).await, rx)
}

#[tokio::test]
async fn posts_wire_payload_and_decodes_prediction() {
    let (server_url, payload_rx) = spawn_predict_server(
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
    let client =
        PredictionClient::new(&settings(server_url, Duration::from_secs(5))).expect("client");

    let response = client.predict(&sample_request()).await.expect("predict");

    let payload = payload_rx.await.expect("payload");
    assert_eq!(
        payload,
        json!({ "symptoms": ["fever", "cough"], "location": "Springfield" })
    );
    assert_eq!(response.predicted_disease, "Flu");
    assert_eq!(response.doctors.len(), 1);
    assert_eq!(response.doctors[0].rating, RatingValue::Label("4.8".to_string()));
    assert!(response.error.is_none());
}

#[tokio::test]
async fn logical_error_on_success_status_is_returned_as_payload() {
    let (server_url, _payload_rx) = spawn_predict_server(
        StatusCode::OK,
        json!({ "error": "Missing symptoms or location." }),
    )
    .await;
    let client =
        PredictionClient::new(&settings(server_url, Duration::from_secs(5))).expect("client");

    let response = client.predict(&sample_request()).await.expect("predict");
    assert_eq!(response.error.as_deref(), Some("Missing symptoms or location."));
}

#[tokio::test]
async fn non_success_status_is_transport_error_regardless_of_body() {
    let (server_url, _payload_rx) = spawn_predict_server(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "Backend server is not configured correctly." }),
    )
    .await;
    let client =
        PredictionClient::new(&settings(server_url, Duration::from_secs(5))).expect("client");

    let err = client
        .predict(&sample_request())
        .await
        .expect_err("must fail");
    assert!(matches!(err, TransportError::Status(500)), "unexpected: {err}");
}

#[tokio::test]
async fn undecodable_success_body_is_transport_error() {
    let app = Router::new().route("/predict", post(|| async { "<html>oops</html>" }));
    let server_url = spawn_router(app).await;
    let client =
        PredictionClient::new(&settings(server_url, Duration::from_secs(5))).expect("client");

    let err = client
        .predict(&sample_request())
        .await
        .expect_err("must fail");
    assert!(matches!(err, TransportError::Decode(_)), "unexpected: {err}");
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = PredictionClient::new(&settings(
        format!("http://{addr}"),
        Duration::from_secs(5),
    ))
    .expect("client");

    let err = client
        .predict(&sample_request())
        .await
        .expect_err("must fail");
    assert!(matches!(err, TransportError::Request(_)), "unexpected: {err}");
}

#[tokio::test]
async fn slow_server_hits_client_timeout() {
    let app = Router::new().route(
        "/predict",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({}))
        }),
    );
    let server_url = spawn_router(app).await;
    let client = PredictionClient::new(&settings(server_url, Duration::from_millis(100)))
        .expect("client");

    let err = client
        .predict(&sample_request())
        .await
        .expect_err("must time out");
    assert!(err.is_timeout(), "unexpected: {err}");
}

#[test]
fn endpoint_keeps_base_path() {
    assert_eq!(
        predict_endpoint("http://127.0.0.1:5000").expect("url").as_str(),
        "http://127.0.0.1:5000/predict"
    );
    assert_eq!(
        predict_endpoint("https://example.org/api").expect("url").as_str(),
        "https://example.org/api/predict"
    );
    assert_eq!(
        predict_endpoint(" https://example.org/api/ ").expect("url").as_str(),
        "https://example.org/api/predict"
    );
}

#[test]
fn endpoint_rejects_bad_urls() {
    assert!(matches!(
        predict_endpoint("not a url"),
        Err(TransportError::InvalidEndpoint { .. })
    ));
    assert!(matches!(
        predict_endpoint("ftp://example.org"),
        Err(TransportError::UnsupportedScheme(scheme)) if scheme == "ftp"
    ));
}
