use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Days, FixedOffset};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use crate::api::router;
use crate::db::{get_recent_draws, init_db, set_draws_left};
use crate::domain::catalog::FortuneType;
use crate::domain::fortune::get_fortune;
use crate::domain::seed::format_date;
use crate::state::AppState;

async fn setup_state() -> AppState {
    let pool = init_db(":memory:").await.unwrap();
    AppState { pool, utc_offset: FixedOffset::east_opt(9 * 3600).unwrap() }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_fortune_today() {
    let app = router(setup_state().await);

    let (status, body) = send(&app, get("/api/v1/fortune/today?type=zodiac&id=dragon&date=2024-01-01")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let expected = get_fortune(FortuneType::Zodiac, "dragon", chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap();
    assert_eq!(body["data"], serde_json::to_value(&expected).unwrap());
}

#[tokio::test]
async fn test_fortune_rejects_unknown_member_and_bad_input() {
    let app = router(setup_state().await);

    let (status, body) = send(&app, get("/api/v1/fortune/today?type=horoscope&id=dragon")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Unknown horoscope member: dragon");

    let (status, _) = send(&app, get("/api/v1/fortune/today?type=zodiac&id=rat&date=01-01-2024")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/api/v1/fortune/today?type=tarot&id=rat")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unpadded_date_is_rejected() {
    let app = router(setup_state().await);

    for uri in [
        "/api/v1/fortune/today?type=zodiac&id=rat&date=2024-1-1",
        "/api/v1/fortune/ranking?type=zodiac&date=2024-01-1",
        "/api/v1/fortune/history?type=zodiac&id=rat&date=2024-1-01",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["success"], false);
    }

    let (status, body) = send(&app, get("/api/v1/fortune/today?type=zodiac&id=rat&date=2024-01-01")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["date"], "2024-01-01");
}

#[tokio::test]
async fn test_ranking() {
    let app = router(setup_state().await);

    let (status, body) = send(&app, get("/api/v1/fortune/ranking?type=zodiac&date=2024-01-01")).await;

    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 12);
    for (index, entry) in entries.iter().enumerate() {
        assert_eq!(entry["rank"], index + 1);
        assert_eq!(entry["type"], "zodiac");
    }
}

#[tokio::test]
async fn test_history_defaults_to_a_week() {
    let state = setup_state().await;
    let today = state.today();
    let app = router(state);

    let (status, body) = send(&app, get("/api/v1/fortune/history?type=horoscope&id=libra")).await;

    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 7);
    assert_eq!(entries[0]["date"], format_date(today));
    assert_eq!(entries[6]["date"], format_date(today - Days::new(6)));

    let (status, _) = send(&app, get("/api/v1/fortune/history?type=horoscope&id=libra&days=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_catalog() {
    let app = router(setup_state().await);

    let (status, body) = send(&app, get("/api/v1/catalog/horoscope")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], "aries");
    assert_eq!(body["data"][0]["englishName"], "Aries");
    assert_eq!(body["data"][0]["element"], "fire");

    let (status, _) = send(&app, get("/api/v1/catalog/tarot")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_guest_draw() {
    let app = router(setup_state().await);

    let (status, body) = send(&app, with_json("POST", "/api/v1/lucky-numbers", json!({ "method": "random" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["method"], "random");
    assert_eq!(body["data"]["userId"], "guest");
    assert_eq!(body["data"]["numbers"].as_array().unwrap().len(), 6);
    assert!(body["data"].get("remaining").is_none());
}

#[tokio::test]
async fn test_malformed_json_uses_envelope() {
    let app = router(setup_state().await);

    let (status, body) = send(&app, with_json("POST", "/api/v1/lucky-numbers", json!({ "method": "pure-random" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Bad request:"));

    let (status, body) = send(
        &app,
        with_json("PUT", "/api/v1/users/u1", json!({ "birthMonth": 8, "birthDay": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/lucky-numbers")
        .body(Body::from(r#"{"method":"random"}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_concurrent_draws_charge_quota_once() {
    let state = setup_state().await;
    let pool = state.pool.clone();
    let today = state.today();
    let app = router(state);

    let (status, _) = send(
        &app,
        with_json("PUT", "/api/v1/users/u1", json!({ "birthYear": 1990, "birthMonth": 8, "birthDay": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    set_draws_left(&pool, "u1", 1, today).await.unwrap();

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                let req = with_json("POST", "/api/v1/lucky-numbers", json!({ "userId": "u1", "method": "random" }));
                send(&app, req).await.0
            })
        })
        .collect();

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::TOO_MANY_REQUESTS).count(), 4);
    assert_eq!(get_recent_draws(&pool, "u1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_profile_and_quota_flow() {
    let app = router(setup_state().await);

    let (status, body) = send(&app, get("/api/v1/users/u1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &app,
        with_json("PUT", "/api/v1/users/u1", json!({ "birthYear": 1990, "birthMonth": 8, "birthDay": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["zodiac"], "horse");
    assert_eq!(body["data"]["horoscope"], "leo");
    assert_eq!(body["data"]["tier"], "free");
    assert_eq!(body["data"]["drawsLeft"], 3);

    for expected_remaining in [2, 1, 0] {
        let (status, body) = send(
            &app,
            with_json("POST", "/api/v1/lucky-numbers", json!({ "userId": "u1", "method": "zodiac" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["remaining"], expected_remaining);
        assert_eq!(body["data"]["method"], "zodiac");
        assert_eq!(body["data"]["userId"], "u1");
    }

    let (status, body) = send(
        &app,
        with_json("POST", "/api/v1/lucky-numbers", json!({ "userId": "u1", "method": "random" })),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Daily draw quota exhausted");

    let (status, body) = send(&app, get("/api/v1/lucky-numbers?userId=u1")).await;
    assert_eq!(status, StatusCode::OK);
    let draws = body["data"].as_array().unwrap();
    assert_eq!(draws.len(), 3);
    assert!(draws.iter().all(|d| d["userId"] == "u1"));
    // same member, same day: identical numbers
    assert_eq!(draws[0]["numbers"], draws[2]["numbers"]);
}

#[tokio::test]
async fn test_draw_for_unknown_user() {
    let app = router(setup_state().await);

    let (status, _) = send(
        &app,
        with_json("POST", "/api/v1/lucky-numbers", json!({ "userId": "ghost", "method": "random" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_birth_date() {
    let app = router(setup_state().await);

    let (status, _) = send(
        &app,
        with_json("PUT", "/api/v1/users/u2", json!({ "birthYear": 1990, "birthMonth": 2, "birthDay": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
