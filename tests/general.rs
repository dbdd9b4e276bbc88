mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_endpoint() {
    let app = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );

    let body = common::body_json(response).await;
    assert_eq!(body["data"]["status"], "OK");
    assert_eq!(body["data"]["users"], 0);
}

#[tokio::test]
async fn test_unknown_route_returns_json_not_found() {
    let app = common::create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "route not found");
}

#[tokio::test]
async fn test_request_id_is_generated_and_propagated() {
    let app = common::create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/api/users").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("response should carry a request id");
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn test_client_request_id_is_echoed() {
    let app = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .header("x-request-id", "trace-me-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-me-42");
}

#[tokio::test]
async fn test_stalled_request_body_times_out_with_json_error() {
    let app_state = userbase::AppState::new(userbase::AppConfig {
        request_timeout_secs: 1,
        ..userbase::AppConfig::default()
    });
    let app = userbase::create_router(app_state.clone());

    // A body that never yields a chunk or finishes
    let stalled = futures_util::stream::pending::<Result<axum::body::Bytes, std::io::Error>>();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from_stream(stalled))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    let body = common::body_json(response).await;
    assert_eq!(body, serde_json::json!({ "error": "request timed out" }));
    assert!(app_state.store.is_empty());
}
