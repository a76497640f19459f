//! Per-game statistics processor.
//!
//! Consumes one summary payload plus its timeline and produces per-team
//! totals and per-player derived metrics.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{
    FirstBlood, GameObjectives, GameSummary, GameTimeline, KillCount, ObjectiveCount,
    PlayerGameResult, PlayerMetrics, ProcessedGame, TeamGameResult, BLUE_SIDE, RED_SIDE,
};

use super::{kda, kill_participation, per_minute, share, split_team_tag};

/// Timeline frames past this point are not scanned: turret plates and
/// first blood are early-game signals only.
pub const EARLY_GAME_CUTOFF_MS: u64 = 850_000;

/// What the early-game timeline scan yields.
#[derive(Debug, Clone, Copy, Default)]
struct TimelineSignals {
    blue_plates: u32,
    red_plates: u32,
    first_blood_victim: Option<u32>,
}

/// Scan timeline frames up to the early-game cutoff.
///
/// Plate destructions credit the opposing team. The first champion kill
/// with a real (non-zero) killer establishes the first-blood victim;
/// later kills never overwrite it.
fn scan_timeline(timeline: &GameTimeline) -> TimelineSignals {
    let mut signals = TimelineSignals::default();

    for frame in &timeline.frames {
        if frame.timestamp > EARLY_GAME_CUTOFF_MS {
            break;
        }

        for event in &frame.events {
            if event.event_type == "TURRET_PLATE_DESTROYED" {
                if let Some(team_id) = event.team_id {
                    // The event carries the plate owner's side.
                    if team_id == RED_SIDE {
                        signals.blue_plates += 1;
                    } else {
                        signals.red_plates += 1;
                    }
                }
            }

            if event.event_type == "CHAMPION_KILL"
                && signals.first_blood_victim.is_none()
                && event.killer_id.is_some_and(|k| k != 0)
            {
                signals.first_blood_victim = event.victim_id;
            }
        }
    }

    signals
}

/// Derive per-team totals and per-player metrics for one game.
///
/// A missing timeline leaves the timeline-derived signals (turret plates,
/// first-blood victim) at their zero values; everything else still
/// computes from the summary alone.
pub fn process_game(summary: &GameSummary, timeline: Option<&GameTimeline>) -> ProcessedGame {
    let signals = timeline.map(scan_timeline).unwrap_or_default();

    // Sum player counters into team totals. Both sides start present so a
    // payload with players on only one side still yields two entries.
    let mut teams: BTreeMap<u16, TeamGameResult> = BTreeMap::new();
    teams.insert(BLUE_SIDE, TeamGameResult::default());
    teams.insert(RED_SIDE, TeamGameResult::default());

    for player in &summary.participants {
        let team = teams.entry(player.team_id).or_default();
        team.kills += player.kills;
        team.deaths += player.deaths;
        team.damage_to_champions += player.total_damage_dealt_to_champions;
        team.gold_earned += player.gold_earned;
        team.creep_score += player.total_minions_killed + player.neutral_minions_killed;
        team.wards_placed += player.wards_placed;
        team.wards_killed += player.wards_killed;
        team.control_wards_purchased += player.vision_wards_bought_in_game;
    }

    if let Some(team) = teams.get_mut(&BLUE_SIDE) {
        team.turret_plates = signals.blue_plates;
    }
    if let Some(team) = teams.get_mut(&RED_SIDE) {
        team.turret_plates = signals.red_plates;
    }

    for team_summary in &summary.teams {
        let team = teams.entry(team_summary.team_id).or_default();
        team.objectives = GameObjectives {
            towers: ObjectiveCount {
                kills: team_summary.objectives.tower.kills,
                first: team_summary.objectives.tower.first,
            },
            dragons: ObjectiveCount {
                kills: team_summary.objectives.dragon.kills,
                first: team_summary.objectives.dragon.first,
            },
            heralds: ObjectiveCount {
                kills: team_summary.objectives.rift_herald.kills,
                first: team_summary.objectives.rift_herald.first,
            },
            barons: KillCount {
                kills: team_summary.objectives.baron.kills,
            },
            inhibitors: KillCount {
                kills: team_summary.objectives.inhibitor.kills,
            },
        };
        team.bans = team_summary.bans.clone();
    }

    let duration = summary.game_duration;
    let players = summary
        .participants
        .iter()
        .map(|player| {
            let team_kills = teams.get(&player.team_id).map(|t| t.kills).unwrap_or(0);
            let team_damage = teams
                .get(&player.team_id)
                .map(|t| t.damage_to_champions)
                .unwrap_or(0);

            let (team_tag, name) = split_team_tag(&player.riot_id_game_name);
            let cs = player.total_minions_killed + player.neutral_minions_killed;

            PlayerGameResult {
                participant_id: player.participant_id,
                team_id: player.team_id,
                name: name.to_string(),
                team_tag: team_tag.map(str::to_string),
                position: player.team_position.clone(),
                champion: player.champion_name.clone(),
                metrics: PlayerMetrics {
                    kills: player.kills,
                    deaths: player.deaths,
                    assists: player.assists,
                    kda: kda(player.kills, player.deaths, player.assists),
                    kill_participation: kill_participation(
                        player.kills,
                        player.assists,
                        team_kills,
                    ),
                    damage_per_minute: per_minute(
                        player.total_damage_dealt_to_champions,
                        duration,
                    ),
                    damage_share: share(player.total_damage_dealt_to_champions, team_damage),
                    wards_per_minute: per_minute(player.wards_placed, duration),
                    wards_cleared_per_minute: per_minute(player.wards_killed, duration),
                    control_wards: player.vision_wards_bought_in_game,
                    cs,
                    cs_per_minute: per_minute(cs, duration),
                    gold_earned: player.gold_earned,
                    gold_per_minute: per_minute(player.gold_earned, duration),
                    first_blood: FirstBlood {
                        kill: player.first_blood_kill,
                        assist: player.first_blood_assist,
                        victim: signals.first_blood_victim == Some(player.participant_id),
                    },
                },
            }
        })
        .collect();

    debug!(
        game_id = %summary.game_id,
        first_blood_victim = ?signals.first_blood_victim,
        "processed game"
    );

    ProcessedGame {
        game_id: summary.game_id.clone(),
        duration,
        teams,
        players,
    }
}
