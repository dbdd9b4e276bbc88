use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware::map_response,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use http::{header::CONTENT_TYPE, HeaderValue};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, warn};

pub mod config;
pub mod users;

pub use config::AppConfig;
use users::{
    create_user, delete_user, get_user, list_users, update_user, ApiError, ApiResponse, UserStore,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UserStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// State backed by a fresh, empty store.
    pub fn new(config: AppConfig) -> Self {
        Self {
            store: Arc::new(UserStore::new()),
            config: Arc::new(config),
        }
    }
}

pub fn create_router(app_state: AppState) -> Router {
    let config = app_state.config.clone();

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .fallback(route_not_found)
        .with_state(app_state);

    with_middleware(router, &config)
}

fn with_middleware(router: Router, config: &AppConfig) -> Router {
    router.layer(DefaultBodyLimit::max(config.max_body_bytes)).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(SetResponseHeaderLayer::overriding(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ))
            .layer(map_response(timeout_envelope))
            .layer(TimeoutLayer::new(config.request_timeout())),
    )
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "data": {
            "status": "OK",
            "users": state.store.len(),
        }
    }))
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error("route not found")),
    )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Request handler panicked");

    ApiError::Internal.into_response()
}

/// `TimeoutLayer` answers with an empty 408; give it the usual envelope.
async fn timeout_envelope(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    warn!("Request timed out");

    (
        StatusCode::REQUEST_TIMEOUT,
        Json(ApiResponse::error("request timed out")),
    )
        .into_response()
}
