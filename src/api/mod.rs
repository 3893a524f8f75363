use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::error::FortuneError;
use crate::domain::seed::{format_date, DATE_FORMAT};
use crate::state::AppState;

pub mod fortune;
pub mod lucky;
pub mod user;
#[cfg(test)]
mod tests;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/fortune/today", get(fortune::today))
        .route("/api/v1/fortune/ranking", get(fortune::ranking))
        .route("/api/v1/fortune/history", get(fortune::history))
        .route("/api/v1/catalog/:kind", get(fortune::catalog))
        .route("/api/v1/lucky-numbers", get(lucky::recent).post(lucky::draw))
        .route("/api/v1/users/:id", get(user::get_profile).put(user::put_profile))
        .route("/health", get(|| async { Json(serde_json::json!({ "version": env!("CARGO_PKG_VERSION") })) }))
        .with_state(state)
}

/// `{ success, data?, error? }` envelope every endpoint answers with.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { success: true, data: Some(data), error: None })
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Fortune(#[from] FortuneError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Daily draw quota exhausted")]
    QuotaExhausted,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Fortune(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::QuotaExhausted => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = match &self {
            ApiError::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        let body: ApiResponse<()> = ApiResponse { success: false, data: None, error: Some(message) };
        (status, Json(body)).into_response()
    }
}

/// Query string extractor backed by serde_qs.
pub struct QsQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QsQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or("");
        match serde_qs::from_str(query) {
            Ok(v) => Ok(QsQuery(v)),
            Err(e) => {
                tracing::debug!(error = %e, query, "Rejected query string");
                Err(ApiError::BadRequest(e.to_string()))
            }
        }
    }
}

/// JSON body extractor whose rejections use the `ApiResponse` envelope.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(v)) => Ok(JsonBody(v)),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected JSON body");
                Err(ApiError::BadRequest(e.body_text()))
            }
        }
    }
}

/// Explicit `YYYY-MM-DD` date, or today in the service's offset. Only the
/// zero-padded form is accepted, since it is also the seed text.
pub fn resolve_date(state: &AppState, date: Option<&str>) -> Result<NaiveDate, ApiError> {
    let Some(raw) = date else {
        return Ok(state.today());
    };
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .filter(|parsed| format_date(*parsed) == raw)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid date: {}", raw)))
}
