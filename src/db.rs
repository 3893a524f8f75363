use crate::domain::lucky::{DrawMethod, LuckyDraw};
use crate::domain::profile::UserProfile;
use crate::domain::quota::Tier;
use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite, SqliteConnection};
use std::fs;
use std::path::Path;
use uuid::Uuid;

pub type DbPool = Pool<Sqlite>;

pub const RECENT_DRAW_LIMIT: i64 = 10;

pub async fn init_db(db_path: &str) -> Result<DbPool> {
    let in_memory = db_path == ":memory:";
    if !in_memory {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path);

    // Every connection to :memory: is a separate database
    let pool = SqlitePoolOptions::new()
        .max_connections(if in_memory { 1 } else { 5 })
        .connect(&db_url)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
          id TEXT PRIMARY KEY,
          nickname TEXT NOT NULL,
          birth_year INTEGER NOT NULL,
          birth_month INTEGER NOT NULL,
          birth_day INTEGER NOT NULL,
          zodiac TEXT NOT NULL,
          horoscope TEXT NOT NULL,
          tier TEXT NOT NULL DEFAULT 'free',
          draws_left INTEGER NOT NULL,
          quota_date TEXT NOT NULL
        );
        "#
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lucky_draws (
          id TEXT PRIMARY KEY,
          user_id TEXT NOT NULL,
          method TEXT NOT NULL,
          numbers TEXT NOT NULL,
          bonus_number INTEGER NOT NULL,
          created_at TEXT NOT NULL
        );
        "#
    )
    .execute(&pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_lucky_draws_user ON lucky_draws (user_id)")
        .execute(&pool)
        .await?;

    Ok(pool)
}

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub nickname: String,
    pub birth_year: i64,
    pub birth_month: i64,
    pub birth_day: i64,
    pub zodiac: String,
    pub horoscope: String,
    pub tier: String,
    pub draws_left: i64,
    pub quota_date: String,
}

impl TryFrom<UserRow> for UserProfile {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(UserProfile {
            tier: row.tier.parse().map_err(|_| anyhow!("Invalid tier: {}", row.tier))?,
            quota_date: NaiveDate::parse_from_str(&row.quota_date, "%Y-%m-%d")?,
            birth_year: row.birth_year.try_into()?,
            birth_month: row.birth_month.try_into()?,
            birth_day: row.birth_day.try_into()?,
            draws_left: row.draws_left.try_into()?,
            id: row.id,
            nickname: row.nickname,
            zodiac: row.zodiac,
            horoscope: row.horoscope,
        })
    }
}

pub async fn upsert_user(pool: &DbPool, profile: &UserProfile) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, nickname, birth_year, birth_month, birth_day, zodiac, horoscope, tier, draws_left, quota_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
          nickname = excluded.nickname,
          birth_year = excluded.birth_year,
          birth_month = excluded.birth_month,
          birth_day = excluded.birth_day,
          zodiac = excluded.zodiac,
          horoscope = excluded.horoscope,
          tier = excluded.tier,
          draws_left = excluded.draws_left,
          quota_date = excluded.quota_date
        "#
    )
        .bind(&profile.id)
        .bind(&profile.nickname)
        .bind(profile.birth_year)
        .bind(profile.birth_month as i64)
        .bind(profile.birth_day as i64)
        .bind(&profile.zodiac)
        .bind(&profile.horoscope)
        .bind(profile.tier.as_str())
        .bind(profile.draws_left as i64)
        .bind(profile.quota_date.format("%Y-%m-%d").to_string())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get_user(pool: &DbPool, id: &str) -> Result<Option<UserProfile>> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, nickname, birth_year, birth_month, birth_day, zodiac, horoscope, tier, draws_left, quota_date FROM users WHERE id = ?"
    )
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(UserProfile::try_from).transpose()
}

pub async fn set_draws_left(pool: &DbPool, id: &str, draws_left: u32, quota_date: NaiveDate) -> Result<()> {
    sqlx::query("UPDATE users SET draws_left = ?, quota_date = ? WHERE id = ?")
        .bind(draws_left as i64)
        .bind(quota_date.format("%Y-%m-%d").to_string())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Refills every stored quota to its tier limit. Returns the number of profiles touched.
pub async fn reset_daily_quotas(pool: &DbPool, today: NaiveDate) -> Result<u64> {
    let today_str = today.format("%Y-%m-%d").to_string();
    let mut touched = 0;
    for tier in [Tier::Free, Tier::Premium, Tier::Vip] {
        let result = sqlx::query("UPDATE users SET draws_left = ?, quota_date = ? WHERE tier = ?")
            .bind(tier.daily_limit() as i64)
            .bind(&today_str)
            .bind(tier.as_str())
            .execute(pool)
            .await?;
        touched += result.rows_affected();
    }
    Ok(touched)
}

/// Appends a draw to its owner's recent list, evicting anything beyond the newest ten.
pub async fn insert_draw(pool: &DbPool, draw: &LuckyDraw) -> Result<()> {
    let mut tx = pool.begin().await?;
    write_draw(&mut tx, draw).await?;
    tx.commit().await?;
    Ok(())
}

/// Moves the user's quota from what `profile` saw to `remaining` and records
/// the draw, both in one transaction. Returns `false` without writing anything
/// when the stored quota no longer matches `profile` (another draw got there
/// first).
pub async fn charge_draw(
    pool: &DbPool,
    profile: &UserProfile,
    remaining: u32,
    today: NaiveDate,
    draw: &LuckyDraw,
) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let charged = sqlx::query(
        "UPDATE users SET draws_left = ?, quota_date = ? WHERE id = ? AND draws_left = ? AND quota_date = ?"
    )
        .bind(remaining as i64)
        .bind(today.format("%Y-%m-%d").to_string())
        .bind(&profile.id)
        .bind(profile.draws_left as i64)
        .bind(profile.quota_date.format("%Y-%m-%d").to_string())
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if charged == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    write_draw(&mut tx, draw).await?;
    tx.commit().await?;
    Ok(true)
}

async fn write_draw(conn: &mut SqliteConnection, draw: &LuckyDraw) -> Result<()> {
    let numbers = draw.numbers.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(",");
    let cts = draw.created_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    sqlx::query("INSERT INTO lucky_draws (id, user_id, method, numbers, bonus_number, created_at) VALUES (?, ?, ?, ?, ?, ?)")
        .bind(draw.id.to_string())
        .bind(&draw.user_id)
        .bind(draw.method.as_str())
        .bind(numbers)
        .bind(draw.bonus_number as i64)
        .bind(cts)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        "DELETE FROM lucky_draws WHERE user_id = ? AND rowid NOT IN (SELECT rowid FROM lucky_draws WHERE user_id = ? ORDER BY rowid DESC LIMIT ?)"
    )
        .bind(&draw.user_id)
        .bind(&draw.user_id)
        .bind(RECENT_DRAW_LIMIT)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
pub struct DrawRow {
    pub id: String,
    pub user_id: String,
    pub method: String,
    pub numbers: String,
    pub bonus_number: i64,
    pub created_at: String,
}

impl TryFrom<DrawRow> for LuckyDraw {
    type Error = anyhow::Error;

    fn try_from(row: DrawRow) -> Result<Self> {
        let numbers = if row.numbers.is_empty() {
            Vec::new()
        } else {
            row.numbers.split(',').map(str::parse).collect::<Result<Vec<u8>, _>>()?
        };
        Ok(LuckyDraw {
            id: Uuid::parse_str(&row.id)?,
            user_id: row.user_id,
            method: row.method.parse::<DrawMethod>().map_err(|_| anyhow!("Invalid draw method: {}", row.method))?,
            numbers,
            bonus_number: row.bonus_number.try_into()?,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)?.with_timezone(&Utc),
        })
    }
}

/// Newest first.
pub async fn get_recent_draws(pool: &DbPool, user_id: &str) -> Result<Vec<LuckyDraw>> {
    let rows = sqlx::query_as::<_, DrawRow>(
        "SELECT id, user_id, method, numbers, bonus_number, created_at FROM lucky_draws WHERE user_id = ? ORDER BY rowid DESC LIMIT ?"
    )
        .bind(user_id)
        .bind(RECENT_DRAW_LIMIT)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(LuckyDraw::try_from).collect()
}
