use crate::domain::catalog::FortuneType;
use crate::domain::error::FortuneError;
use crate::domain::fortune::{assemble, FortuneRecord};
use chrono::{Days, NaiveDate};

/// Fortunes for `days` consecutive days ending at `today`, most recent first.
/// The run stops early at `NaiveDate::MIN`, so it can be shorter than `days`.
pub fn get_fortune_history(
    kind: FortuneType,
    id: &str,
    days: u32,
    today: NaiveDate,
) -> Result<Vec<FortuneRecord>, FortuneError> {
    let member = kind.find(id).ok_or_else(|| FortuneError::UnknownMember {
        kind,
        id: id.to_string(),
    })?;

    Ok((0..days as u64)
        .map_while(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| assemble(kind, member, date))
        .collect())
}
