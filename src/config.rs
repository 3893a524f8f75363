use std::env;
use std::sync::OnceLock;
use chrono::{FixedOffset, NaiveDate};
use dotenvy::dotenv;

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub db_path: String,
    pub utc_offset_hours: i32, // Calendar day boundary; 9 = KST
    pub quota_reset_cron: String,
}

impl Config {
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"))
    }

    pub fn today(&self) -> NaiveDate {
        crate::domain::today_at(self.utc_offset())
    }
}

/// Daily cron expression firing at local midnight for a whole-hour UTC offset.
pub fn midnight_cron(offset_hours: i32) -> String {
    format!("0 0 {} * * *", (24 - offset_hours).rem_euclid(24))
}

pub fn config() -> &'static Config {
    static CONFIG: OnceLock<Config> = OnceLock::new();
    CONFIG.get_or_init(|| {
        dotenv().ok();

        let utc_offset_hours: i32 = env::var("UTC_OFFSET_HOURS").unwrap_or_else(|_| "9".to_string()).parse().expect("UTC_OFFSET_HOURS must be a number");

        Config {
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            db_path: env::var("DB_PATH").unwrap_or_else(|_| "data/lottolabs.db".to_string()),
            utc_offset_hours,
            quota_reset_cron: env::var("QUOTA_RESET_CRON").unwrap_or_else(|_| midnight_cron(utc_offset_hours)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midnight_cron_follows_offset() {
        assert_eq!(midnight_cron(9), "0 0 15 * * *");
        assert_eq!(midnight_cron(0), "0 0 0 * * *");
        assert_eq!(midnight_cron(-5), "0 0 5 * * *");
        assert_eq!(midnight_cron(14), "0 0 10 * * *");
    }
}
