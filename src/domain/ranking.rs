use crate::domain::catalog::FortuneType;
use crate::domain::fortune::assemble;
use chrono::{Days, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    pub rank: usize,
    #[serde(rename = "type")]
    pub kind: FortuneType,
    pub id: &'static str,
    pub name: &'static str,
    pub glyph: &'static str,
    pub score: u32,
    pub change: i32,
}

/// Day-over-day movement: the score delta in tens, floored.
pub fn score_change(today: u32, yesterday: u32) -> i32 {
    (today as i32 - yesterday as i32).div_euclid(10)
}

/// Ranks every member of `kind` by overall score on `date`.
///
/// On `NaiveDate::MIN` there is no previous day, so yesterday is taken to be
/// `date` itself and every `change` is 0.
pub fn get_ranking(kind: FortuneType, date: NaiveDate) -> Vec<RankingEntry> {
    let yesterday = date.checked_sub_days(Days::new(1)).unwrap_or(date);

    let mut entries: Vec<RankingEntry> = kind
        .members()
        .iter()
        .map(|member| {
            let today_score = assemble(kind, member, date).scores.overall;
            let yesterday_score = assemble(kind, member, yesterday).scores.overall;
            RankingEntry {
                rank: 0,
                kind,
                id: member.id,
                name: member.name,
                glyph: member.glyph,
                score: today_score,
                change: score_change(today_score, yesterday_score),
            }
        })
        .collect();

    // stable: catalog order breaks ties
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index + 1;
    }

    tracing::debug!(kind = %kind, date = %date, leader = entries.first().map(|e| e.id), "Ranking computed");
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ZODIAC;
    use crate::domain::fortune::get_fortune;
    use std::collections::HashSet;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_zodiac_ranking_covers_catalog() {
        let ranking = get_ranking(FortuneType::Zodiac, day(2024, 1, 1));
        assert_eq!(ranking.len(), 12);

        let ids: HashSet<_> = ranking.iter().map(|e| e.id).collect();
        let expected: HashSet<_> = ZODIAC.iter().map(|m| m.id).collect();
        assert_eq!(ids, expected);

        for (index, entry) in ranking.iter().enumerate() {
            assert_eq!(entry.rank, index + 1);
            assert_eq!(entry.kind, FortuneType::Zodiac);
        }
        for pair in ranking.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_ranking_matches_individual_fortunes() {
        let date = day(2024, 6, 30);
        for kind in [FortuneType::Zodiac, FortuneType::Horoscope] {
            let ranking = get_ranking(kind, date);

            let mut expected: Vec<(&str, u32)> = kind
                .members()
                .iter()
                .map(|m| (m.id, get_fortune(kind, m.id, date).unwrap().scores.overall))
                .collect();
            expected.sort_by(|a, b| b.1.cmp(&a.1));

            let actual: Vec<(&str, u32)> = ranking.iter().map(|e| (e.id, e.score)).collect();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_change_uses_previous_day_fortune() {
        let date = day(2024, 3, 1);
        let ranking = get_ranking(FortuneType::Horoscope, date);
        for entry in &ranking {
            let today = get_fortune(FortuneType::Horoscope, entry.id, date).unwrap();
            let yesterday = get_fortune(FortuneType::Horoscope, entry.id, day(2024, 2, 29)).unwrap();
            assert_eq!(entry.score, today.scores.overall);
            assert_eq!(entry.change, score_change(today.scores.overall, yesterday.scores.overall));
            assert!((-6..=5).contains(&entry.change));
        }
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let date = day(2024, 1, 1);
        for kind in [FortuneType::Zodiac, FortuneType::Horoscope] {
            let ranking = get_ranking(kind, date);
            let position = |id: &str| kind.members().iter().position(|m| m.id == id).unwrap();
            for pair in ranking.windows(2) {
                if pair[0].score == pair[1].score {
                    assert!(position(pair[0].id) < position(pair[1].id));
                }
            }
        }
    }

    #[test]
    fn test_score_change_floors_negative_deltas() {
        // Known quirk: movement is floored, so small drops already count as -1
        // while small gains stay at 0.
        assert_eq!(score_change(75, 70), 0);
        assert_eq!(score_change(70, 75), -1);
        assert_eq!(score_change(60, 74), -2);
        assert_eq!(score_change(74, 60), 1);
        assert_eq!(score_change(99, 40), 5);
        assert_eq!(score_change(40, 99), -6);
        assert_eq!(score_change(50, 50), 0);
    }

    #[test]
    fn test_earliest_date_has_no_change() {
        let ranking = get_ranking(FortuneType::Horoscope, NaiveDate::MIN);
        assert_eq!(ranking.len(), 12);
        assert!(ranking.iter().all(|e| e.change == 0));
    }
}
