//! Team performance aggregation.
//!
//! Reconciles two sources: the external statistics feed is authoritative
//! for win rate, streak and objective counts; the locally fetched series
//! list supplies the side-specific breakdown and recent form, which the
//! feed does not expose.

use regex::Regex;
use tracing::debug;

use crate::grid::types::{SeriesStatistics, StatBlock};
use crate::models::{
    FormResult, SeriesInfo, SideBreakdown, SideRecord, StatLine, Streak, TeamAggregate,
    TeamObjectiveRates,
};

/// Minutes component of an ISO-8601 duration string (`PT32M18S` → 32).
///
/// Hours and seconds are matched but discarded, mirroring the behavior of
/// the feed handling this replaces; an hour-spanning or sub-minute average
/// is therefore misread. Use [`crate::iso8601_duration_secs`] where the
/// real duration matters.
pub fn avg_duration_minutes(raw: &str) -> u32 {
    let re = Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?").unwrap();
    re.captures(raw)
        .and_then(|caps| caps.get(2))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn stat_line(block: Option<&StatBlock>) -> StatLine {
    // Each field degrades to zero independently.
    let block = block.copied().unwrap_or_default();
    StatLine {
        sum: block.sum.unwrap_or(0.0),
        avg: block.avg.unwrap_or(0.0),
        min: block.min.unwrap_or(0.0),
        max: block.max.unwrap_or(0.0),
    }
}

fn objective_sum(feed: &SeriesStatistics, objective_type: &str) -> f64 {
    feed.objectives
        .iter()
        .find(|o| o.objective_type == objective_type)
        .and_then(|o| o.completion_count)
        .and_then(|c| c.sum)
        .unwrap_or(0.0)
}

/// Side-specific results from the local series list.
///
/// A team is on the blue side when it occupies array position 0; a series
/// is a win when the team's score advantage is positive.
pub fn side_breakdown(series: &[SeriesInfo], team_id: &str) -> SideBreakdown {
    let total = series.len() as u32;
    let wins = series
        .iter()
        .filter(|s| s.team(team_id).map(|t| t.score_advantage > 0.0) == Some(true))
        .count() as u32;

    let blue_games = series
        .iter()
        .filter(|s| s.teams.first().map(|t| t.id == team_id) == Some(true))
        .count() as u32;
    let blue_wins = series
        .iter()
        .filter(|s| {
            s.teams
                .first()
                .map(|t| t.id == team_id && t.score_advantage > 0.0)
                == Some(true)
        })
        .count() as u32;

    SideBreakdown {
        blue: SideRecord {
            games: blue_games,
            wins: blue_wins,
        },
        red: SideRecord {
            games: total - blue_games,
            wins: wins.saturating_sub(blue_wins),
        },
    }
}

/// Outcomes of the last five series, oldest first, padded with
/// [`FormResult::None`] when fewer than five exist.
pub fn recent_form(series: &[SeriesInfo], team_id: &str) -> Vec<FormResult> {
    let mut sorted: Vec<&SeriesInfo> = series.iter().collect();
    sorted.sort_by(|a, b| b.start_time_scheduled.cmp(&a.start_time_scheduled));

    let mut results: Vec<FormResult> = Vec::with_capacity(5);
    for i in 0..5 {
        let Some(entry) = sorted.get(i) else {
            results.push(FormResult::None);
            continue;
        };
        match entry.team(team_id) {
            Some(team) if team.score_advantage > 0.0 => results.push(FormResult::Win),
            Some(_) => results.push(FormResult::Loss),
            None => results.push(FormResult::None),
        }
    }

    results.reverse();
    results
}

/// Build the team aggregate from the statistics feed plus the team's
/// local series list.
pub fn aggregate_team(
    team_id: &str,
    feed: &SeriesStatistics,
    series: &[SeriesInfo],
) -> TeamAggregate {
    let won = feed.won.iter().find(|w| w.value);
    let win_rate = won.and_then(|w| w.percentage).unwrap_or(0.0);
    let streak_current = won.and_then(|w| w.streak).map(|s| s.current).unwrap_or(0);

    let objectives = TeamObjectiveRates {
        first_blood: feed
            .first_kill
            .iter()
            .find(|f| f.value)
            .and_then(|f| f.percentage)
            .unwrap_or(0.0),
        // The feed carries no first-objective splits beyond first kill.
        first_tower: 0.0,
        first_dragon: 0.0,
        first_baron: 0.0,
        tower_kills: objective_sum(feed, "destroyTower"),
        dragon_kills: objective_sum(feed, "slayDragon"),
        baron_kills: objective_sum(feed, "slayBaron"),
    };

    let kills = stat_line(feed.kills.as_ref());
    let deaths = stat_line(feed.deaths.as_ref());
    let assists = stat_line(feed.kill_assists_given.as_ref());

    // A zero or missing average death count divides by one instead.
    let death_divisor = if deaths.avg == 0.0 { 1.0 } else { deaths.avg };
    let kda = (kills.avg + assists.avg) / death_divisor.max(1.0);

    let game = feed.game.as_ref();
    let avg_minutes = game
        .and_then(|g| g.duration.as_ref())
        .and_then(|d| d.avg.as_deref())
        .map(avg_duration_minutes)
        .unwrap_or(0);
    let gold_per_minute = game
        .and_then(|g| g.money.as_ref())
        .and_then(|m| m.avg)
        .map(|avg| avg / (avg_minutes.max(1) as f64))
        .unwrap_or(0.0);

    let side = side_breakdown(series, team_id);
    let total = series.len() as u32;
    let wins = side.blue.wins + side.red.wins;

    debug!(
        team_id,
        win_rate, streak_current, total, "aggregated team performance"
    );

    TeamAggregate {
        team_id: team_id.to_string(),
        kills,
        deaths,
        assists,
        kda,
        gold_per_minute,
        win_rate,
        current_streak: Streak::from_signed(streak_current),
        objectives,
        side,
        recent_form: recent_form(series, team_id),
        wins,
        losses: total.saturating_sub(wins),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::types::{
        DurationBlock, FirstKillSplit, GameStatistics, ObjectiveStat, StreakBlock, WonSplit,
    };
    use crate::models::{SeriesTeam, StreakKind};
    use chrono::{TimeZone, Utc};

    fn feed() -> SeriesStatistics {
        SeriesStatistics {
            count: 18,
            kills: Some(StatBlock {
                sum: Some(230.0),
                avg: Some(12.0),
                min: Some(3.0),
                max: Some(29.0),
            }),
            deaths: Some(StatBlock {
                avg: Some(8.0),
                ..Default::default()
            }),
            kill_assists_given: Some(StatBlock {
                avg: Some(28.0),
                ..Default::default()
            }),
            won: vec![
                WonSplit {
                    value: true,
                    count: 12,
                    percentage: Some(66.7),
                    streak: Some(StreakBlock {
                        min: -2,
                        max: 5,
                        current: 3,
                    }),
                },
                WonSplit {
                    value: false,
                    count: 6,
                    percentage: Some(33.3),
                    streak: None,
                },
            ],
            first_kill: vec![FirstKillSplit {
                value: true,
                count: 10,
                percentage: Some(55.6),
            }],
            objectives: vec![
                ObjectiveStat {
                    objective_type: "destroyTower".to_string(),
                    completion_count: Some(StatBlock {
                        sum: Some(140.0),
                        ..Default::default()
                    }),
                },
                ObjectiveStat {
                    objective_type: "slayDragon".to_string(),
                    completion_count: Some(StatBlock {
                        sum: Some(52.0),
                        ..Default::default()
                    }),
                },
            ],
            game: Some(GameStatistics {
                count: 40,
                duration: Some(DurationBlock {
                    avg: Some("PT32M18S".to_string()),
                    ..Default::default()
                }),
                money: Some(StatBlock {
                    avg: Some(64_000.0),
                    ..Default::default()
                }),
            }),
        }
    }

    fn series_entry(
        id: &str,
        day: u32,
        first_team: (&str, f64),
        second_team: (&str, f64),
    ) -> SeriesInfo {
        SeriesInfo {
            id: id.to_string(),
            start_time_scheduled: Some(Utc.with_ymd_and_hms(2026, 5, day, 17, 0, 0).unwrap()),
            teams: vec![
                SeriesTeam {
                    id: first_team.0.to_string(),
                    name: String::new(),
                    logo_url: String::new(),
                    score_advantage: first_team.1,
                },
                SeriesTeam {
                    id: second_team.0.to_string(),
                    name: String::new(),
                    logo_url: String::new(),
                    score_advantage: second_team.1,
                },
            ],
            format: Default::default(),
            tournament: Default::default(),
            product_service_levels: Vec::new(),
        }
    }

    #[test]
    fn test_avg_duration_uses_minutes_only() {
        assert_eq!(avg_duration_minutes("PT32M18S"), 32);
        // Hours are parsed but dropped, as observed.
        assert_eq!(avg_duration_minutes("PT1H5M30S"), 5);
        // No minutes component at all reads as zero.
        assert_eq!(avg_duration_minutes("PT45S"), 0);
        assert_eq!(avg_duration_minutes("garbage"), 0);
    }

    #[test]
    fn test_aggregate_team_feed_fields() {
        let agg = aggregate_team("t1", &feed(), &[]);

        assert!((agg.win_rate - 66.7).abs() < f64::EPSILON);
        assert_eq!(agg.current_streak.kind, StreakKind::Win);
        assert_eq!(agg.current_streak.count, 3);
        assert!((agg.objectives.first_blood - 55.6).abs() < f64::EPSILON);
        assert!((agg.objectives.tower_kills - 140.0).abs() < f64::EPSILON);
        assert!((agg.objectives.dragon_kills - 52.0).abs() < f64::EPSILON);
        // slayBaron absent from the feed: degrades to zero alone.
        assert_eq!(agg.objectives.baron_kills, 0.0);
        assert_eq!(agg.objectives.first_tower, 0.0);
    }

    #[test]
    fn test_aggregate_team_kda_and_gold() {
        let agg = aggregate_team("t1", &feed(), &[]);

        // (12 + 28) / 8
        assert!((agg.kda - 5.0).abs() < f64::EPSILON);
        // 64000 gold over the 32-minute average.
        assert!((agg.gold_per_minute - 2000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_aggregate_team_empty_feed_degrades_to_zero() {
        let agg = aggregate_team("t1", &SeriesStatistics::default(), &[]);

        assert_eq!(agg.win_rate, 0.0);
        assert_eq!(agg.current_streak.kind, StreakKind::Loss);
        assert_eq!(agg.current_streak.count, 0);
        assert_eq!(agg.gold_per_minute, 0.0);
        assert_eq!(agg.objectives.first_blood, 0.0);
        assert!(agg.kda.is_finite());
    }

    #[test]
    fn test_loss_streak_from_negative_current() {
        let mut feed = feed();
        feed.won[0].streak = Some(StreakBlock {
            min: -4,
            max: 5,
            current: -3,
        });
        let agg = aggregate_team("t1", &feed, &[]);

        assert_eq!(agg.current_streak.kind, StreakKind::Loss);
        assert_eq!(agg.current_streak.count, 3);
    }

    #[test]
    fn test_side_breakdown() {
        let series = vec![
            // Blue side win.
            series_entry("s1", 1, ("t1", 2.0), ("t2", -2.0)),
            // Blue side loss.
            series_entry("s2", 2, ("t1", -1.0), ("t3", 1.0)),
            // Red side win.
            series_entry("s3", 3, ("t4", -1.0), ("t1", 1.0)),
            // Red side loss.
            series_entry("s4", 4, ("t5", 2.0), ("t1", -2.0)),
        ];
        let side = side_breakdown(&series, "t1");

        assert_eq!(side.blue.games, 2);
        assert_eq!(side.blue.wins, 1);
        assert_eq!(side.red.games, 2);
        assert_eq!(side.red.wins, 1);
        assert!((side.blue.win_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_recent_form_pads_and_orders() {
        let series = vec![
            series_entry("old", 1, ("t1", 1.0), ("t2", -1.0)),
            series_entry("new", 8, ("t2", 1.0), ("t1", -1.0)),
        ];
        let form = recent_form(&series, "t1");

        assert_eq!(form.len(), 5);
        // Three missing slots first, then the win, then the recent loss.
        assert_eq!(
            form,
            vec![
                FormResult::None,
                FormResult::None,
                FormResult::None,
                FormResult::Win,
                FormResult::Loss,
            ]
        );
    }

    #[test]
    fn test_recent_form_skips_foreign_series() {
        let series = vec![series_entry("s1", 1, ("t8", 1.0), ("t9", -1.0))];
        let form = recent_form(&series, "t1");
        assert!(form.iter().all(|r| *r == FormResult::None));
    }

    #[test]
    fn test_wins_losses_from_local_series() {
        let series = vec![
            series_entry("s1", 1, ("t1", 2.0), ("t2", -2.0)),
            series_entry("s2", 2, ("t1", -1.0), ("t3", 1.0)),
            series_entry("s3", 3, ("t4", -1.0), ("t1", 1.0)),
        ];
        let agg = aggregate_team("t1", &feed(), &series);

        assert_eq!(agg.wins, 2);
        assert_eq!(agg.losses, 1);
    }
}
