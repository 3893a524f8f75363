use crate::domain::catalog::{CategoryMember, HOROSCOPE, ZODIAC};
use crate::domain::quota::{check_quota, QuotaStatus, Tier};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub nickname: String,
    pub birth_year: i32,
    pub birth_month: u32,
    pub birth_day: u32,
    pub zodiac: String,
    pub horoscope: String,
    pub tier: Tier,
    pub draws_left: u32,
    pub quota_date: NaiveDate,
}

impl UserProfile {
    /// New profile with category ids derived from the birth date and a full
    /// quota for `today`.
    pub fn new(
        id: &str,
        nickname: &str,
        birth: NaiveDate,
        tier: Tier,
        today: NaiveDate,
    ) -> Self {
        use chrono::Datelike;

        UserProfile {
            id: id.to_string(),
            nickname: nickname.to_string(),
            birth_year: birth.year(),
            birth_month: birth.month(),
            birth_day: birth.day(),
            zodiac: zodiac_for_year(birth.year()).id.to_string(),
            horoscope: horoscope_for_date(birth.month(), birth.day()).id.to_string(),
            tier,
            draws_left: tier.daily_limit(),
            quota_date: today,
        }
    }

    pub fn quota(&self, today: NaiveDate) -> QuotaStatus {
        check_quota(self.tier, self.draws_left, self.quota_date, today)
    }
}

/// Zodiac animal for a birth year; 4 AD was a year of the rat.
pub fn zodiac_for_year(year: i32) -> &'static CategoryMember {
    &ZODIAC[(year - 4).rem_euclid(12) as usize]
}

/// Western sign for a birth month/day. Out-of-range input falls through to Pisces.
pub fn horoscope_for_date(month: u32, day: u32) -> &'static CategoryMember {
    // (month, first day of the sign starting in that month, sign starting that day)
    const STARTS: [(u32, u32, usize); 12] = [
        (1, 20, 10),
        (2, 19, 11),
        (3, 21, 0),
        (4, 20, 1),
        (5, 21, 2),
        (6, 21, 3),
        (7, 23, 4),
        (8, 23, 5),
        (9, 23, 6),
        (10, 23, 7),
        (11, 22, 8),
        (12, 22, 9),
    ];

    let Some(&(_, start, index)) = STARTS.iter().find(|(m, _, _)| *m == month) else {
        return &HOROSCOPE[11];
    };
    if day >= start {
        &HOROSCOPE[index]
    } else {
        // still in the sign that began the previous month
        &HOROSCOPE[(index + 11) % 12]
    }
}
