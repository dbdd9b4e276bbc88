use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request, State},
    http::{
        header::{CONTENT_TYPE, LOCATION},
        request::Parts,
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::users::models::{ApiResponse, UserPayload};
use crate::users::store::StoreError;
use crate::AppState;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid id")]
    InvalidId,
    #[error("invalid body")]
    InvalidBody,
    #[error("user not found")]
    NotFound(#[from] StoreError),
    #[error("Something went wrong")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

/// User id taken from the `{id}` path segment.
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to read id from path");
                ApiError::InvalidId
            })?;

        parse_id(&raw).map(UserId)
    }
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| {
        warn!(id = raw, error = %e, "Failed to parse id");
        ApiError::InvalidId
    })
}

/// JSON request body that ignores the request's `Content-Type` and maps every
/// read or decode failure, including an exceeded body limit, to
/// [`ApiError::InvalidBody`].
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            warn!(error = %e, "Failed to read body");
            ApiError::InvalidBody
        })?;

        // Only the first JSON value counts; anything after it is ignored.
        match serde_json::Deserializer::from_slice(&bytes)
            .into_iter::<T>()
            .next()
        {
            Some(Ok(value)) => Ok(JsonBody(value)),
            Some(Err(e)) => {
                warn!(error = %e, "Failed to decode body");
                Err(ApiError::InvalidBody)
            }
            None => {
                warn!("Request body is empty");
                Err(ApiError::InvalidBody)
            }
        }
    }
}

/// Encodes the envelope, falling back to a generic server error when the
/// payload cannot be serialized.
pub fn send_json<T: Serialize>(status: StatusCode, body: &ApiResponse<T>) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to marshal json data");
            ApiError::Internal.into_response()
        }
    }
}

pub async fn list_users(State(state): State<AppState>) -> Response {
    let users = state.store.list();
    debug!(count = users.len(), "Listing users");

    send_json(StatusCode::OK, &ApiResponse::data(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Response, ApiError> {
    let user = state.store.get(id)?;

    Ok(send_json(StatusCode::OK, &ApiResponse::data(user)))
}

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UserPayload>,
) -> Response {
    let user = state.store.create(payload);
    info!(user_id = %user.id, "User created");

    let mut response = send_json(StatusCode::CREATED, &ApiResponse::empty());
    if let Ok(location) = HeaderValue::from_str(&format!("/api/users/{}", user.id)) {
        response.headers_mut().insert(LOCATION, location);
    }
    response
}

pub async fn update_user(
    State(state): State<AppState>,
    UserId(id): UserId,
    JsonBody(payload): JsonBody<UserPayload>,
) -> Result<Response, ApiError> {
    let user = state.store.update(id, payload)?;
    info!(user_id = %id, "User updated");

    Ok(send_json(StatusCode::OK, &ApiResponse::data(user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Response, ApiError> {
    state.store.delete(id)?;
    info!(user_id = %id, "User deleted");

    Ok(send_json(StatusCode::OK, &ApiResponse::empty()))
}
