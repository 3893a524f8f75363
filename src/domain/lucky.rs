use crate::domain::catalog::FortuneType;
use crate::domain::error::FortuneError;
use crate::domain::fortune::ball_from_draw;
use crate::domain::seed::{format_date, derive_seed, seeded_random, Seed};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const NUMBERS_PER_DRAW: usize = 6;
pub const MAX_DRAW_ATTEMPTS: u32 = 100;
pub const GUEST_USER_ID: &str = "guest";
const BONUS_OFFSET: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMethod {
    Zodiac,
    Horoscope,
    Random,
}

impl DrawMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawMethod::Zodiac => "zodiac",
            DrawMethod::Horoscope => "horoscope",
            DrawMethod::Random => "random",
        }
    }

    pub fn family(&self) -> Option<FortuneType> {
        match self {
            DrawMethod::Zodiac => Some(FortuneType::Zodiac),
            DrawMethod::Horoscope => Some(FortuneType::Horoscope),
            DrawMethod::Random => None,
        }
    }
}

impl fmt::Display for DrawMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrawMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zodiac" => Ok(DrawMethod::Zodiac),
            "horoscope" => Ok(DrawMethod::Horoscope),
            "random" => Ok(DrawMethod::Random),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LuckyDraw {
    pub id: Uuid,
    pub user_id: String,
    pub method: DrawMethod,
    pub numbers: Vec<u8>,
    pub bonus_number: u8,
    pub created_at: DateTime<Utc>,
}

impl LuckyDraw {
    /// False only for the degenerate case where the attempt cap ran out.
    pub fn is_complete(&self) -> bool {
        self.numbers.len() == NUMBERS_PER_DRAW
    }
}

/// Collects distinct balls from `draw(attempt)` until six are found or the
/// attempt cap runs out, then sorts them ascending.
pub fn collect_balls(mut draw: impl FnMut(u32) -> f64) -> Vec<u8> {
    let mut numbers: Vec<u8> = Vec::with_capacity(NUMBERS_PER_DRAW);

    for attempt in 0..MAX_DRAW_ATTEMPTS {
        if numbers.len() == NUMBERS_PER_DRAW {
            break;
        }
        let ball = ball_from_draw(draw(attempt));
        if !numbers.contains(&ball) {
            numbers.push(ball);
        }
    }

    numbers.sort_unstable();
    numbers
}

/// Up to six distinct balls in ascending order, plus a bonus ball that may
/// repeat one of them.
pub fn draw_numbers(seed: Seed) -> (Vec<u8>, u8) {
    let numbers = collect_balls(|attempt| seeded_random(seed, attempt));
    (numbers, ball_from_draw(seeded_random(seed, BONUS_OFFSET)))
}

/// Seed source for a draw: wall-clock millis for `Random`, otherwise the
/// day's seed for the member id (or the method name when none is given).
pub fn draw_seed(method: DrawMethod, id: Option<&str>, today: NaiveDate, now: DateTime<Utc>) -> Seed {
    match method {
        DrawMethod::Random => now.timestamp_millis().unsigned_abs(),
        _ => derive_seed(&format_date(today), id.unwrap_or(method.as_str())),
    }
}

pub fn draw_lucky_numbers(
    method: DrawMethod,
    id: Option<&str>,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<LuckyDraw, FortuneError> {
    if let (Some(kind), Some(id)) = (method.family(), id) {
        if kind.find(id).is_none() {
            return Err(FortuneError::UnknownMember { kind, id: id.to_string() });
        }
    }

    let (numbers, bonus_number) = draw_numbers(draw_seed(method, id, today, now));
    Ok(new_draw(method, numbers, bonus_number, now))
}

/// Wraps drawn balls into a guest-owned record with a fresh id.
pub fn new_draw(method: DrawMethod, numbers: Vec<u8>, bonus_number: u8, now: DateTime<Utc>) -> LuckyDraw {
    if numbers.len() < NUMBERS_PER_DRAW {
        tracing::warn!(%method, count = numbers.len(), "Draw attempts exhausted before six numbers");
    }

    LuckyDraw {
        id: Uuid::new_v4(),
        user_id: GUEST_USER_ID.to_string(),
        method,
        numbers,
        bonus_number,
        created_at: now,
    }
}
