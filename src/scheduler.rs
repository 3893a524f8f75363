use anyhow::Result;
use chrono::FixedOffset;
use crate::db::{reset_daily_quotas, DbPool};

/// Refills every user's lucky-number quota for the new local day.
pub async fn run_daily_reset(pool: DbPool, utc_offset: FixedOffset) -> Result<()> {
    let today = crate::domain::today_at(utc_offset);
    tracing::info!(%today, "Running daily quota reset");

    let touched = reset_daily_quotas(&pool, today).await?;

    tracing::info!(%today, profiles = touched, "Quota reset complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_user, init_db, set_draws_left, upsert_user};
    use crate::domain::profile::UserProfile;
    use crate::domain::quota::Tier;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_daily_reset_refills_quota() -> Result<()> {
        let pool = init_db(":memory:").await?;
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let long_ago = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let birth = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();

        upsert_user(&pool, &UserProfile::new("u1", "tester", birth, Tier::Premium, long_ago)).await?;
        set_draws_left(&pool, "u1", 0, long_ago).await?;

        run_daily_reset(pool.clone(), offset).await?;

        let user = get_user(&pool, "u1").await?.unwrap();
        assert_eq!(user.draws_left, 10);
        assert_eq!(user.quota_date, crate::domain::today_at(offset));
        Ok(())
    }
}
