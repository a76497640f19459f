//! Derived statistics models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::riot::BanEntry;

/// Kills plus a "took it first" flag for one objective type.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ObjectiveCount {
    pub kills: u32,
    pub first: bool,
}

/// Kills only, for objectives the summary carries no "first" flag for.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct KillCount {
    pub kills: u32,
}

/// Per-team objective totals for one game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameObjectives {
    pub towers: ObjectiveCount,
    pub dragons: ObjectiveCount,
    pub heralds: ObjectiveCount,
    pub barons: KillCount,
    pub inhibitors: KillCount,
}

/// One team's totals for a single game.
///
/// The counters are sums of the team's players' raw counters, so
/// `kills` always equals the sum of the players' kills.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamGameResult {
    pub kills: u32,
    pub deaths: u32,
    pub damage_to_champions: u32,
    pub gold_earned: u32,
    /// Minions plus neutral minions killed.
    pub creep_score: u32,
    pub wards_placed: u32,
    pub wards_killed: u32,
    pub control_wards_purchased: u32,
    /// Plates taken off enemy turrets before they fall.
    pub turret_plates: u32,
    pub objectives: GameObjectives,
    pub bans: Vec<BanEntry>,
}

/// First-blood involvement flags for one player.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FirstBlood {
    pub kill: bool,
    pub assist: bool,
    /// True iff this player died to the game's first champion kill,
    /// as established by the timeline scan.
    pub victim: bool,
}

/// Derived per-player metrics for one game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMetrics {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub kda: f64,
    pub kill_participation: f64,
    pub damage_per_minute: f64,
    /// This player's share of their team's champion damage.
    pub damage_share: f64,
    pub wards_per_minute: f64,
    pub wards_cleared_per_minute: f64,
    pub control_wards: u32,
    pub cs: u32,
    pub cs_per_minute: f64,
    pub gold_earned: u32,
    pub gold_per_minute: f64,
    pub first_blood: FirstBlood,
}

/// One player's line for a single game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGameResult {
    pub participant_id: u32,
    pub team_id: u16,
    /// Display name with any team-tag prefix removed.
    pub name: String,
    /// Uppercase prefix split off the raw display name, when present.
    pub team_tag: Option<String>,
    pub position: String,
    pub champion: String,
    pub metrics: PlayerMetrics,
}

/// Everything the statistics processor derives from one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedGame {
    pub game_id: String,
    /// Game length in seconds.
    pub duration: u32,
    /// Keyed by side id (100/200).
    pub teams: BTreeMap<u16, TeamGameResult>,
    pub players: Vec<PlayerGameResult>,
}

/// One row of the ban leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannedChampion {
    pub champion_id: String,
    pub name: String,
    pub image_url: String,
    /// Bans divided by total valid games.
    pub ban_rate: f64,
}

/// Aggregate draft statistics over a set of valid games.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftAggregate {
    pub total_games: u32,
    pub blue_side_win_rate: f64,
    pub red_side_win_rate: f64,
    /// Fraction of games won by the team holding the first pick.
    pub first_pick_win_rate: f64,
    /// Top five champions by ban rate.
    pub most_banned: Vec<BannedChampion>,
    pub first_phase_pick_rate: f64,
    pub second_phase_pick_rate: f64,
}

/// Win or loss streak direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StreakKind {
    Win,
    Loss,
}

/// A team's current run of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    #[serde(rename = "type")]
    pub kind: StreakKind,
    pub count: u32,
}

impl Streak {
    /// Build from the feed's signed streak value: positive is a win
    /// streak, zero or negative a loss streak of the absolute size.
    pub fn from_signed(current: i64) -> Self {
        if current > 0 {
            Streak {
                kind: StreakKind::Win,
                count: current as u32,
            }
        } else {
            Streak {
                kind: StreakKind::Loss,
                count: current.unsigned_abs() as u32,
            }
        }
    }
}

/// Games and wins on one side of the map.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideRecord {
    pub games: u32,
    pub wins: u32,
}

impl SideRecord {
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }
}

/// Blue/red split of a team's results.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SideBreakdown {
    pub blue: SideRecord,
    pub red: SideRecord,
}

/// Objective numbers from the external statistics feed.
///
/// First tower/dragon/baron are not carried by the feed today and stay at
/// zero; the fields are kept so a feed upgrade needs no shape change.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamObjectiveRates {
    /// Percentage of series where this team drew first blood.
    pub first_blood: f64,
    pub first_tower: f64,
    pub first_dragon: f64,
    pub first_baron: f64,
    pub tower_kills: f64,
    pub dragon_kills: f64,
    pub baron_kills: f64,
}

/// sum/avg/min/max block mirrored from the statistics feed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatLine {
    pub sum: f64,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

/// One recent-series outcome for the form strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormResult {
    Win,
    Loss,
    /// No series played in this slot.
    None,
}

/// A team's rolling performance over the requested time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAggregate {
    pub team_id: String,
    pub kills: StatLine,
    pub deaths: StatLine,
    pub assists: StatLine,
    pub kda: f64,
    pub gold_per_minute: f64,
    /// Percentage, as reported by the feed.
    pub win_rate: f64,
    pub current_streak: Streak,
    pub objectives: TeamObjectiveRates,
    /// Computed locally from the series catalog.
    pub side: SideBreakdown,
    /// Last five series, oldest first.
    pub recent_form: Vec<FormResult>,
    /// Wins/losses counted from the local series list.
    pub wins: u32,
    pub losses: u32,
}
