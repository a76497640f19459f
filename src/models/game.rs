//! Normalized per-game records.

use serde::{Deserialize, Serialize};

use super::riot::{GameSummary, GameTimeline, LiveEvents};

/// Side identifier for the team that picks first.
pub const BLUE_SIDE: u16 = 100;
/// Side identifier for the other team.
pub const RED_SIDE: u16 = 200;

/// Which half of champion select a pick belongs to.
///
/// Picks 1-6 happen before the second ban round, picks 7-10 after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftPhase {
    #[serde(rename = "PHASE_1")]
    Phase1,
    #[serde(rename = "PHASE_2")]
    Phase2,
}

impl DraftPhase {
    /// Phase for a 1-based draft position.
    pub fn from_position(position: u32) -> Self {
        if position <= 6 {
            DraftPhase::Phase1
        } else {
            DraftPhase::Phase2
        }
    }
}

/// One champion pick in draft order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickEvent {
    pub champion_id: String,
    pub team_id: String,
    pub is_first_pick: bool,
    /// Whether the picking team went on to win. Only meaningful once the
    /// game has a recorded winner.
    pub is_winner: bool,
    pub phase: DraftPhase,
    /// 1-based draft position.
    pub position: u32,
}

/// One champion ban.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanEvent {
    pub champion_id: String,
    pub team_id: String,
    /// 1-based position within the owning team's ban order.
    pub position: u32,
}

/// The winning side of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub id: String,
}

/// A single game of a series, as assembled by the per-game fetcher.
///
/// The raw files are optional independently (the provider may only have a
/// subset for a given game), but `picks`, `bans` and `winner` are derived
/// from the summary as a unit: they are populated if and only if the
/// summary decoded successfully.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub game_id: Option<String>,

    /// Game length in seconds.
    pub duration: Option<u32>,

    pub summary: Option<GameSummary>,
    pub timeline: Option<GameTimeline>,
    pub live_events: Option<LiveEvents>,

    #[serde(default)]
    pub picks: Vec<PickEvent>,
    #[serde(default)]
    pub bans: Vec<BanEvent>,
    pub winner: Option<Winner>,
}

impl GameRecord {
    /// Assemble a record from whichever raw files were available.
    ///
    /// Draft data (picks, bans, winner) is derived only when the summary is
    /// present; otherwise those fields stay empty together.
    pub fn from_files(
        summary: Option<GameSummary>,
        timeline: Option<GameTimeline>,
        live_events: Option<LiveEvents>,
    ) -> Self {
        let mut record = GameRecord {
            timeline,
            live_events,
            ..Default::default()
        };

        if let Some(summary) = summary {
            record.game_id = Some(summary.game_id.clone());
            record.duration = Some(summary.game_duration);

            let winner = summary.teams.iter().find(|t| t.win).map(|t| Winner {
                id: t.team_id.to_string(),
            });

            // Draft order follows participant enumeration order; the first
            // enumerated participant holds the first pick.
            record.picks = summary
                .participants
                .iter()
                .enumerate()
                .map(|(idx, p)| {
                    let position = idx as u32 + 1;
                    PickEvent {
                        champion_id: p.champion_id.clone(),
                        team_id: p.team_id.to_string(),
                        is_first_pick: position == 1,
                        is_winner: summary
                            .teams
                            .iter()
                            .find(|t| t.team_id == p.team_id)
                            .map(|t| t.win)
                            .unwrap_or(false),
                        phase: DraftPhase::from_position(position),
                        position,
                    }
                })
                .collect();

            record.bans = summary
                .teams
                .iter()
                .flat_map(|team| {
                    team.bans.iter().enumerate().map(move |(idx, ban)| BanEvent {
                        champion_id: ban.champion_id.clone(),
                        team_id: team.team_id.to_string(),
                        position: idx as u32 + 1,
                    })
                })
                .collect();

            record.winner = winner;
            record.summary = Some(summary);
        }

        record
    }

    /// Whether this record carries everything the draft aggregator needs.
    pub fn has_draft_data(&self) -> bool {
        !self.picks.is_empty() && !self.bans.is_empty() && self.winner.is_some()
    }
}
