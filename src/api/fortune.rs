use axum::extract::{Path, State};
use serde::Deserialize;

use crate::api::{ok, resolve_date, ApiError, ApiResult, QsQuery};
use crate::domain::catalog::{CategoryMember, FortuneType};
use crate::domain::fortune::{get_fortune, FortuneRecord};
use crate::domain::history::get_fortune_history;
use crate::domain::ranking::{get_ranking, RankingEntry};
use crate::state::AppState;

pub const DEFAULT_HISTORY_DAYS: u32 = 7;
pub const MAX_HISTORY_DAYS: u32 = 30;

#[derive(Debug, Deserialize)]
pub struct FortuneParams {
    #[serde(rename = "type")]
    pub kind: FortuneType,
    pub id: String,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RankingParams {
    #[serde(rename = "type")]
    pub kind: FortuneType,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(rename = "type")]
    pub kind: FortuneType,
    pub id: String,
    pub days: Option<u32>,
}

pub async fn today(
    State(state): State<AppState>,
    QsQuery(params): QsQuery<FortuneParams>,
) -> ApiResult<FortuneRecord> {
    let date = resolve_date(&state, params.date.as_deref())?;
    let fortune = get_fortune(params.kind, &params.id, date)?;
    tracing::info!(kind = %params.kind, id = %params.id, %date, overall = fortune.scores.overall, "Fortune served");
    Ok(ok(fortune))
}

pub async fn ranking(
    State(state): State<AppState>,
    QsQuery(params): QsQuery<RankingParams>,
) -> ApiResult<Vec<RankingEntry>> {
    let date = resolve_date(&state, params.date.as_deref())?;
    Ok(ok(get_ranking(params.kind, date)))
}

pub async fn history(
    State(state): State<AppState>,
    QsQuery(params): QsQuery<HistoryParams>,
) -> ApiResult<Vec<FortuneRecord>> {
    let days = params.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    if !(1..=MAX_HISTORY_DAYS).contains(&days) {
        return Err(ApiError::BadRequest(format!("days must be between 1 and {}", MAX_HISTORY_DAYS)));
    }
    let history = get_fortune_history(params.kind, &params.id, days, state.today())?;
    Ok(ok(history))
}

pub async fn catalog(Path(kind): Path<String>) -> ApiResult<&'static [CategoryMember]> {
    let kind: FortuneType = kind
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Unknown fortune type: {}", kind)))?;
    Ok(ok(kind.members()))
}
