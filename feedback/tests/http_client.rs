//! End-to-end check of `HttpFeedbackClient` against a local axum server
//! standing in for the feedback service.

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use feedback::config::Timeouts;
use feedback::{FeedbackError, FeedbackService, HttpFeedbackClient};
use serde_json::{Value, json};

const ROUTE: &str = "/api/v1/submission/submit/solution";

#[derive(Debug, Default, Clone)]
struct Received {
    authorization: Option<String>,
    field: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: Value,
    received: Arc<Mutex<Received>>,
}

async fn handle(State(stub): State<Stub>, headers: HeaderMap, mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    let mut received = Received {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        ..Received::default()
    };
    while let Some(field) = multipart.next_field().await.unwrap() {
        received.field = field.name().map(str::to_string);
        received.file_name = field.file_name().map(str::to_string);
        received.content_type = field.content_type().map(str::to_string);
        received.bytes = field.bytes().await.unwrap().to_vec();
    }
    *stub.received.lock().unwrap() = received;
    (stub.status, Json(stub.body))
}

async fn serve(status: StatusCode, body: Value) -> (String, Arc<Mutex<Received>>) {
    let received = Arc::new(Mutex::new(Received::default()));
    let stub = Stub { status, body, received: received.clone() };
    let app = Router::new().route(ROUTE, post(handle)).with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}{ROUTE}"), received)
}

fn timeouts() -> Timeouts {
    Timeouts { request_secs: 5, connect_secs: 5 }
}

#[tokio::test]
async fn posts_png_as_multipart_with_bearer_token() {
    let body = json!({
        "image_gcs_url": "gs://bucket/x.png",
        "ai_feedback_data": {
            "translated_handwriting": "2x + 3 = 7",
            "errors": [{ "error_text": "sign error", "box_2d": [100, 200, 300, 400] }]
        }
    });
    let (url, received) = serve(StatusCode::OK, body).await;
    let client = HttpFeedbackClient::new(url, timeouts()).unwrap();

    let report = client.submit("secret-token", vec![0x89, b'P', b'N', b'G']).await.unwrap();

    assert_eq!(report.translated_handwriting.as_deref(), Some("2x + 3 = 7"));
    assert_eq!(report.image_gcs_url.as_deref(), Some("gs://bucket/x.png"));
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].error_text, "sign error");
    assert_eq!(report.errors[0].box_2d.0, [100.0, 200.0, 300.0, 400.0]);

    let received = received.lock().unwrap().clone();
    assert_eq!(received.authorization.as_deref(), Some("Bearer secret-token"));
    assert_eq!(received.field.as_deref(), Some("file"));
    assert_eq!(received.file_name.as_deref(), Some("selection.png"));
    assert_eq!(received.content_type.as_deref(), Some("image/png"));
    assert_eq!(received.bytes, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn non_success_surfaces_detail() {
    let (url, _) = serve(StatusCode::UNAUTHORIZED, json!({ "detail": "Invalid authentication credentials" })).await;
    let client = HttpFeedbackClient::new(url, timeouts()).unwrap();

    let err = client.submit("bad", vec![1, 2, 3]).await.unwrap_err();
    assert!(matches!(&err, FeedbackError::Service(m) if m == "Invalid authentication credentials"));
}

#[tokio::test]
async fn non_success_without_detail_reports_status() {
    let (url, _) = serve(StatusCode::INTERNAL_SERVER_ERROR, json!({ "message": "boom" })).await;
    let client = HttpFeedbackClient::new(url, timeouts()).unwrap();

    let err = client.submit("tok", vec![1]).await.unwrap_err();
    assert_eq!(err.to_string(), "Server responded with status 500");
}

#[tokio::test]
async fn unreachable_service_is_a_service_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = HttpFeedbackClient::new(format!("http://{addr}{ROUTE}"), timeouts()).unwrap();

    let err = client.submit("tok", vec![1]).await.unwrap_err();
    assert!(matches!(err, FeedbackError::Service(_)));
}
