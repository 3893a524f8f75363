use crate::db::DbPool;
use chrono::{FixedOffset, NaiveDate};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub utc_offset: FixedOffset,
}

impl AppState {
    pub fn today(&self) -> NaiveDate {
        crate::domain::today_at(self.utc_offset)
    }
}
