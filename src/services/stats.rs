//! Statistics service
//!
//! The aggregation itself is a pure, synchronous single pass over an
//! in-memory snapshot of the user collection: filter, derive (age, mode),
//! accumulate, finalize. The service wrapper only fetches the snapshot and
//! injects the current date; everything below `aggregate` is deterministic
//! for a fixed input.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::{
    api::stats::{
        AgeBucket, GameLeaderboards, GameStat, ModeTotals, PlayTimeStats, StatisticsData,
        StatsFilter,
    },
    error::AppResult,
    models::{birthday, game::game_display_name, UserRecord},
    repository::Repository,
};

/// Leaderboards keep the ten most played games
const LEADERBOARD_SIZE: usize = 10;

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Compute the statistics report over the whole user collection.
    pub async fn get_statistics(&self, filter: &StatsFilter) -> AppResult<StatisticsData> {
        let users = self.repository.users.scan_all().await?;
        tracing::info!("Computing statistics over {} user records", users.len());

        let data = aggregate(&users, filter, Utc::now().date_naive());

        if !data.unknown_birthday_formats.is_empty() {
            tracing::warn!(
                "Unknown birthday formats found: {:?}",
                data.unknown_birthday_formats
            );
        }

        Ok(data)
    }
}

/// Per-user play-time summary derived from the daily minutes map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayTimeSummary {
    pub total_minutes: f64,
    pub average_per_day: f64,
    pub days_count: u64,
}

/// Sum the daily minutes map; non-numeric day values count as zero and days
/// with zero minutes do not count as active.
pub fn play_time_summary(daily: &IndexMap<String, Value>) -> PlayTimeSummary {
    let mut total = 0.0;
    let mut days = 0u64;
    for value in daily.values() {
        let minutes = value.as_f64().unwrap_or(0.0);
        total += minutes;
        if minutes > 0.0 {
            days += 1;
        }
    }
    let average = if days > 0 { total / days as f64 } else { 0.0 };
    PlayTimeSummary {
        total_minutes: round2(total),
        average_per_day: round2(average),
        days_count: days,
    }
}

/// Round half away from zero at 2 decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Default)]
struct AgeAcc {
    binocular: u64,
    monocular: u64,
    total: u64,
}

/// Pure single-pass aggregation: (records, filter, today) -> report.
pub fn aggregate(
    records: &[UserRecord],
    filter: &StatsFilter,
    today: NaiveDate,
) -> StatisticsData {
    let include_clinic = filter.include_clinic.unwrap_or(true);

    let mut unknown_birthdays: IndexSet<String> = IndexSet::new();
    let mut matched: Vec<(&UserRecord, Option<i32>)> = Vec::new();

    for user in records {
        if !include_clinic && user.is_clinic {
            continue;
        }

        if let Some(wanted) = filter.gender.as_deref() {
            // absent/empty gender means "not specified"
            let gender = user.gender.as_deref().filter(|g| !g.is_empty());
            if wanted == "Not specified" {
                if gender.is_some() {
                    continue;
                }
            } else if gender != Some(wanted) {
                continue;
            }
        }

        if let Some(wanted_active) = filter.is_active {
            if user.is_active() != wanted_active {
                continue;
            }
        }

        let age = user
            .birthday
            .as_deref()
            .and_then(|raw| birthday::derive_age(raw, today));

        if age.is_none() {
            if let Some(raw) = user.birthday.as_deref() {
                if !raw.is_empty() {
                    unknown_birthdays.insert(raw.to_string());
                }
            }
        }

        // an unparseable age fails any bound that is set
        if let Some(from) = filter.age_from {
            match age {
                Some(a) if a >= from => {}
                _ => continue,
            }
        }
        if let Some(to) = filter.age_to {
            match age {
                Some(a) if a <= to => {}
                _ => continue,
            }
        }

        matched.push((user, age));
    }

    let mut age_stats: BTreeMap<i32, AgeAcc> = BTreeMap::new();
    let mut mode_totals = ModeTotals::default();
    let mut games_total: BTreeMap<String, i64> = BTreeMap::new();
    let mut games_binocular: BTreeMap<String, i64> = BTreeMap::new();
    let mut games_monocular: BTreeMap<String, i64> = BTreeMap::new();
    let mut total_play_time = 0.0;
    let mut total_average_play_time = 0.0;
    let mut users_with_play_time = 0u64;

    for (user, age) in &matched {
        let binocular = user.is_binocular();

        if let Some(age) = age {
            let bucket = age_stats.entry(*age).or_default();
            if binocular {
                bucket.binocular += 1;
            } else {
                bucket.monocular += 1;
            }
            bucket.total += 1;
        }

        // mode split counts every matching user, with or without an age
        if binocular {
            mode_totals.binocular += 1;
        } else {
            mode_totals.monocular += 1;
        }

        for (game_id, record) in &user.game_records {
            let attempts = record.attempt_count();
            if attempts > 0 {
                *games_total.entry(game_id.clone()).or_insert(0) += attempts;
                let split = if binocular {
                    &mut games_binocular
                } else {
                    &mut games_monocular
                };
                *split.entry(game_id.clone()).or_insert(0) += attempts;
            }
        }

        let play_time = play_time_summary(&user.daily_play_times);
        if play_time.days_count > 0 {
            total_play_time += play_time.total_minutes;
            total_average_play_time += play_time.average_per_day;
            users_with_play_time += 1;
        }
    }

    let play_time_stats = if users_with_play_time > 0 {
        PlayTimeStats {
            total_average_minutes: round2(total_play_time / users_with_play_time as f64),
            average_per_day: round2(total_average_play_time / users_with_play_time as f64),
            users_count: users_with_play_time,
        }
    } else {
        PlayTimeStats::default()
    };

    StatisticsData {
        total_users: matched.len() as u64,
        binocular_stats: mode_totals,
        age_stats: age_stats
            .into_iter()
            .map(|(age, acc)| AgeBucket {
                age,
                binocular: acc.binocular,
                monocular: acc.monocular,
                total: acc.total,
            })
            .collect(),
        game_stats: GameLeaderboards {
            total: finalize_games(games_total),
            binocular: finalize_games(games_binocular),
            monocular: finalize_games(games_monocular),
        },
        play_time_stats,
        unknown_birthday_formats: unknown_birthdays.into_iter().collect(),
    }
}

/// Attach names and percentage shares, then keep the top entries by attempts.
///
/// Percentages are rounded independently per game; the stable sort keeps ties
/// in id order so identical inputs always produce identical leaderboards.
fn finalize_games(tallies: BTreeMap<String, i64>) -> Vec<GameStat> {
    let group_total: i64 = tallies.values().sum();
    let mut games: Vec<GameStat> = tallies
        .into_iter()
        .map(|(id, attempts)| GameStat {
            name: game_display_name(&id),
            percentage: if group_total > 0 {
                round2(attempts as f64 / group_total as f64 * 100.0)
            } else {
                0.0
            },
            id,
            attempts,
        })
        .collect();
    games.sort_by(|a, b| b.attempts.cmp(&a.attempts));
    games.truncate(LEADERBOARD_SIZE);
    games
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{GameRecord, Subscription, UserSettings};
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    fn user(id: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            ..Default::default()
        }
    }

    fn with_birthday(mut user: UserRecord, birthday: &str) -> UserRecord {
        user.birthday = Some(birthday.to_string());
        user
    }

    fn binocular(mut user: UserRecord) -> UserRecord {
        user.settings = Some(UserSettings {
            is_binocular_mode: true,
        });
        user
    }

    fn active(mut user: UserRecord) -> UserRecord {
        user.subscription = Some(Subscription { is_active: true });
        user
    }

    fn with_game(mut user: UserRecord, game_id: &str, attempts: Value) -> UserRecord {
        user.game_records.insert(
            game_id.to_string(),
            GameRecord {
                attempts: Some(attempts),
            },
        );
        user
    }

    #[test]
    fn test_total_users_counts_filter_matches() {
        let mut male = user("a");
        male.gender = Some("Male".to_string());
        let mut female = user("b");
        female.gender = Some("Female".to_string());
        let unspecified = user("c");

        let records = vec![male, female, unspecified];
        let filter = StatsFilter {
            gender: Some("Male".to_string()),
            ..Default::default()
        };
        let data = aggregate(&records, &filter, today());
        assert_eq!(data.total_users, 1);
    }

    #[test]
    fn test_clinic_accounts_excluded_on_request() {
        let mut clinic = user("clinic");
        clinic.is_clinic = true;
        let records = vec![clinic, user("regular")];

        let all = aggregate(&records, &StatsFilter::default(), today());
        assert_eq!(all.total_users, 2);

        let filtered = aggregate(
            &records,
            &StatsFilter {
                include_clinic: Some(false),
                ..Default::default()
            },
            today(),
        );
        assert_eq!(filtered.total_users, 1);
    }

    #[test]
    fn test_not_specified_gender_matches_absent_or_empty() {
        let absent = user("a");
        let mut empty = user("b");
        empty.gender = Some(String::new());
        let mut male = user("c");
        male.gender = Some("Male".to_string());

        let records = vec![absent, empty, male];
        let filter = StatsFilter {
            gender: Some("Not specified".to_string()),
            ..Default::default()
        };
        assert_eq!(aggregate(&records, &filter, today()).total_users, 2);

        let filter = StatsFilter {
            gender: Some("Male".to_string()),
            ..Default::default()
        };
        assert_eq!(aggregate(&records, &filter, today()).total_users, 1);
    }

    #[test]
    fn test_inactive_filter_includes_missing_subscription() {
        let records = vec![active(user("a")), user("b"), user("c")];

        let active_only = StatsFilter {
            is_active: Some(true),
            ..Default::default()
        };
        assert_eq!(aggregate(&records, &active_only, today()).total_users, 1);

        let inactive_only = StatsFilter {
            is_active: Some(false),
            ..Default::default()
        };
        assert_eq!(aggregate(&records, &inactive_only, today()).total_users, 2);
    }

    #[test]
    fn test_unparseable_age_fails_bound_checks() {
        let records = vec![
            with_birthday(user("bad"), "sometime in spring"),
            with_birthday(user("ok"), "15-04-2015"),
        ];

        let bounded = StatsFilter {
            age_from: Some(5),
            ..Default::default()
        };
        let data = aggregate(&records, &bounded, today());
        assert_eq!(data.total_users, 1);
        assert_eq!(
            data.unknown_birthday_formats,
            vec!["sometime in spring".to_string()]
        );

        // without bounds the unparseable record still passes
        let data = aggregate(&records, &StatsFilter::default(), today());
        assert_eq!(data.total_users, 2);
    }

    #[test]
    fn test_age_chart_sorted_with_consistent_totals() {
        let records = vec![
            binocular(with_birthday(user("a"), "15-04-2015")),
            with_birthday(user("b"), "15-04-2015"),
            with_birthday(user("c"), "15-04-2010"),
        ];
        let data = aggregate(&records, &StatsFilter::default(), today());

        let ages: Vec<i32> = data.age_stats.iter().map(|b| b.age).collect();
        let mut sorted = ages.clone();
        sorted.sort_unstable();
        assert_eq!(ages, sorted);

        for bucket in &data.age_stats {
            assert_eq!(bucket.total, bucket.binocular + bucket.monocular);
        }
        assert_eq!(data.age_stats.len(), 2);
        assert_eq!(data.age_stats[0].age, 11);
        assert_eq!(data.age_stats[0].binocular, 1);
        assert_eq!(data.age_stats[0].monocular, 1);
    }

    #[test]
    fn test_mode_totals_count_users_without_age() {
        let records = vec![binocular(user("a")), user("b"), user("c")];
        let data = aggregate(&records, &StatsFilter::default(), today());
        assert_eq!(data.binocular_stats.binocular, 1);
        assert_eq!(data.binocular_stats.monocular, 2);
        assert!(data.age_stats.is_empty());
    }

    #[test]
    fn test_game_percentages_sum_to_100() {
        let records = vec![
            with_game(user("a"), "g1", json!(30)),
            with_game(user("b"), "g2", json!(60)),
            with_game(user("c"), "g3", json!(10)),
        ];
        let data = aggregate(&records, &StatsFilter::default(), today());
        let total: f64 = data.game_stats.total.iter().map(|g| g.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(data.game_stats.total[0].id, "g2");
        assert_eq!(data.game_stats.total[0].attempts, 60);
        assert_eq!(data.game_stats.total[0].percentage, 60.0);
    }

    #[test]
    fn test_percentage_rounded_to_two_decimals() {
        let records = vec![
            with_game(user("a"), "g1", json!(1)),
            with_game(user("b"), "g2", json!(2)),
        ];
        let data = aggregate(&records, &StatsFilter::default(), today());
        let g1 = data
            .game_stats
            .total
            .iter()
            .find(|g| g.id == "g1")
            .unwrap();
        assert_eq!(g1.percentage, 33.33);
    }

    #[test]
    fn test_leaderboard_sorted_and_truncated() {
        let mut records = Vec::new();
        for i in 0..12 {
            records.push(with_game(
                user(&format!("u{i}")),
                &format!("game-{i:02}"),
                json!(i + 1),
            ));
        }
        let data = aggregate(&records, &StatsFilter::default(), today());
        assert_eq!(data.game_stats.total.len(), 10);
        assert_eq!(data.game_stats.total[0].attempts, 12);
        for pair in data.game_stats.total.windows(2) {
            assert!(pair[0].attempts >= pair[1].attempts);
        }
    }

    #[test]
    fn test_games_split_by_mode() {
        let records = vec![
            binocular(with_game(user("a"), "g1", json!(5))),
            with_game(user("b"), "g1", json!(3)),
        ];
        let data = aggregate(&records, &StatsFilter::default(), today());
        assert_eq!(data.game_stats.total[0].attempts, 8);
        assert_eq!(data.game_stats.binocular[0].attempts, 5);
        assert_eq!(data.game_stats.monocular[0].attempts, 3);
    }

    #[test]
    fn test_non_numeric_attempts_count_as_zero() {
        let records = vec![
            with_game(user("a"), "g1", json!("lots")),
            with_game(user("b"), "g2", json!(0)),
        ];
        let data = aggregate(&records, &StatsFilter::default(), today());
        assert!(data.game_stats.total.is_empty());
    }

    #[test]
    fn test_play_time_summary_example() {
        let mut daily = IndexMap::new();
        daily.insert("d1".to_string(), json!(10));
        daily.insert("d2".to_string(), json!(0));
        daily.insert("d3".to_string(), json!(20));
        let summary = play_time_summary(&daily);
        assert_eq!(summary.total_minutes, 30.0);
        assert_eq!(summary.days_count, 2);
        assert_eq!(summary.average_per_day, 15.0);
    }

    #[test]
    fn test_play_time_non_numeric_coerced_to_zero() {
        let mut daily = IndexMap::new();
        daily.insert("d1".to_string(), json!("soon"));
        daily.insert("d2".to_string(), json!(12.5));
        let summary = play_time_summary(&daily);
        assert_eq!(summary.total_minutes, 12.5);
        assert_eq!(summary.days_count, 1);
    }

    #[test]
    fn test_play_time_aggregation() {
        let mut a = user("a");
        a.daily_play_times.insert("d1".to_string(), json!(10));
        a.daily_play_times.insert("d2".to_string(), json!(20));
        let mut b = user("b");
        b.daily_play_times.insert("d1".to_string(), json!(40));
        // no play time at all
        let c = user("c");

        let data = aggregate(&[a, b, c], &StatsFilter::default(), today());
        assert_eq!(data.play_time_stats.users_count, 2);
        // (30 + 40) / 2 and (15 + 40) / 2
        assert_eq!(data.play_time_stats.total_average_minutes, 35.0);
        assert_eq!(data.play_time_stats.average_per_day, 27.5);
    }

    #[test]
    fn test_no_play_time_yields_zeroes() {
        let data = aggregate(&[user("a")], &StatsFilter::default(), today());
        assert_eq!(data.play_time_stats, PlayTimeStats::default());
    }

    #[test]
    fn test_unknown_birthdays_deduplicated_in_order() {
        let records = vec![
            with_birthday(user("a"), "??"),
            with_birthday(user("b"), "later"),
            with_birthday(user("c"), "??"),
        ];
        let data = aggregate(&records, &StatsFilter::default(), today());
        assert_eq!(
            data.unknown_birthday_formats,
            vec!["??".to_string(), "later".to_string()]
        );
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let records = vec![
            binocular(with_game(
                active(with_birthday(user("a"), "15-Квітень-2015")),
                "g1",
                json!(7),
            )),
            with_game(with_birthday(user("b"), "29-02-2000"), "g2", json!(7)),
            with_birthday(user("c"), "bogus"),
        ];
        let filter = StatsFilter::default();
        let first = aggregate(&records, &filter, today());
        let second = aggregate(&records, &filter, today());
        assert_eq!(first, second);
    }
}
