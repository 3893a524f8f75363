use axum::extract::{Path, State};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::{ok, ApiError, ApiResult, JsonBody};
use crate::db;
use crate::domain::profile::UserProfile;
use crate::domain::quota::Tier;
use crate::state::AppState;

const DEFAULT_NICKNAME: &str = "게스트";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub nickname: Option<String>,
    pub birth_year: i32,
    pub birth_month: u32,
    pub birth_day: u32,
    pub tier: Option<Tier>,
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<UserProfile> {
    let profile = db::get_user(&state.pool, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {}", id)))?;
    Ok(ok(profile))
}

/// Creates or replaces a profile. An existing profile keeps today's quota
/// usage; other fields are taken from the request.
pub async fn put_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ProfileRequest>,
) -> ApiResult<UserProfile> {
    let birth = NaiveDate::from_ymd_opt(req.birth_year, req.birth_month, req.birth_day).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "Invalid birth date: {}-{}-{}",
            req.birth_year, req.birth_month, req.birth_day
        ))
    })?;

    let existing = db::get_user(&state.pool, &id).await?;
    let tier = req.tier.or(existing.as_ref().map(|p| p.tier)).unwrap_or_default();
    let nickname = req
        .nickname
        .or_else(|| existing.as_ref().map(|p| p.nickname.clone()))
        .unwrap_or_else(|| DEFAULT_NICKNAME.to_string());

    let mut profile = UserProfile::new(&id, &nickname, birth, tier, state.today());
    if let Some(prev) = existing {
        profile.draws_left = prev.draws_left;
        profile.quota_date = prev.quota_date;
    }

    db::upsert_user(&state.pool, &profile).await?;
    tracing::info!(user_id = %id, zodiac = %profile.zodiac, horoscope = %profile.horoscope, %tier, "Profile saved");
    Ok(ok(profile))
}
