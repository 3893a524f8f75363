use axum::extract::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::{ok, ApiError, ApiResult, JsonBody, QsQuery};
use crate::db;
use crate::domain::lucky::{draw_lucky_numbers, DrawMethod, LuckyDraw};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRequest {
    pub user_id: Option<String>,
    pub method: DrawMethod,
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResponse {
    #[serde(flatten)]
    pub draw: LuckyDraw,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentParams {
    pub user_id: String,
}

/// Draws a set of lucky numbers. With a `userId` the draw is charged against
/// that user's daily quota and kept in their recent list.
pub async fn draw(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DrawRequest>,
) -> ApiResult<DrawResponse> {
    let today = state.today();
    let now = Utc::now();

    let Some(user_id) = req.user_id else {
        let draw = draw_lucky_numbers(req.method, req.id.as_deref(), today, now)?;
        tracing::info!(method = %req.method, "Guest draw");
        return Ok(ok(DrawResponse { draw, remaining: None }));
    };

    let profile = db::get_user(&state.pool, &user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {}", user_id)))?;

    let quota = profile.quota(today);
    if !quota.allowed {
        tracing::info!(user_id = %user_id, "Draw refused, quota exhausted");
        return Err(ApiError::QuotaExhausted);
    }

    let member_id = req.id.or_else(|| match req.method {
        DrawMethod::Zodiac => Some(profile.zodiac.clone()),
        DrawMethod::Horoscope => Some(profile.horoscope.clone()),
        DrawMethod::Random => None,
    });

    let draw = draw_lucky_numbers(req.method, member_id.as_deref(), today, now)?;
    let draw = LuckyDraw { user_id: user_id.clone(), ..draw };
    let remaining = quota.after_draw();

    if !db::charge_draw(&state.pool, &profile, remaining, today, &draw).await? {
        tracing::info!(user_id = %user_id, "Draw refused, quota spent concurrently");
        return Err(ApiError::QuotaExhausted);
    }

    tracing::info!(user_id = %user_id, method = %req.method, remaining, "Draw recorded");
    Ok(ok(DrawResponse { draw, remaining: Some(remaining) }))
}

pub async fn recent(
    State(state): State<AppState>,
    QsQuery(params): QsQuery<RecentParams>,
) -> ApiResult<Vec<LuckyDraw>> {
    let draws = db::get_recent_draws(&state.pool, &params.user_id).await?;
    Ok(ok(draws))
}
