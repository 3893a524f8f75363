pub mod catalog;
pub mod error;
pub mod fortune;
pub mod history;
pub mod lucky;
pub mod profile;
pub mod quota;
pub mod ranking;
pub mod seed;

use chrono::{FixedOffset, NaiveDate, Utc};

/// Current calendar day at the given UTC offset.
pub fn today_at(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}
