use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use userbase::{config::AppConfig, AppState};

/// Creates a test app backed by a fresh, empty store
#[allow(dead_code)]
pub fn create_test_app() -> Router {
    userbase::create_router(create_test_app_state())
}

/// Creates a test app state with its own store instance
pub fn create_test_app_state() -> AppState {
    let config = AppConfig {
        server_address: "127.0.0.1:0".to_string(),
        environment: "test".to_string(),
        max_body_bytes: 1000,
        request_timeout_secs: 10,
    };

    AppState::new(config)
}

/// Builds a request with an optional JSON body
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(value) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Reads a response body as JSON
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

