//! Raw payload shapes from the file-download endpoint.
//!
//! The provider ships Riot-format end-of-game files: a summary (final
//! scoreboard), a timeline (frames of positional/event data), and a live
//! event stream. These types are validated at the decode boundary so the
//! rest of the pipeline never touches untyped JSON.

use serde::{Deserialize, Serialize};

/// Deserialize an ID that may arrive as a number or a string.
fn deserialize_id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let val: serde_json::Value = serde_json::Value::deserialize(deserializer)?;
    match val {
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::String(s) => Ok(s),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// One participant's final line from the summary file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub participant_id: u32,

    /// Side identifier: `100` (blue) or `200` (red).
    pub team_id: u16,

    /// Raw display name, possibly prefixed with a team tag.
    #[serde(default, alias = "summonerName")]
    pub riot_id_game_name: String,

    #[serde(default)]
    pub champion_name: String,

    #[serde(default, deserialize_with = "deserialize_id_string")]
    pub champion_id: String,

    /// Assigned role/position (TOP, JUNGLE, MIDDLE, BOTTOM, UTILITY).
    #[serde(default, alias = "role")]
    pub team_position: String,

    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,

    #[serde(default)]
    pub win: bool,
    #[serde(default)]
    pub first_blood_kill: bool,
    #[serde(default)]
    pub first_blood_assist: bool,

    #[serde(default)]
    pub total_damage_dealt_to_champions: u32,
    #[serde(default)]
    pub wards_placed: u32,
    #[serde(default)]
    pub wards_killed: u32,
    #[serde(default)]
    pub vision_wards_bought_in_game: u32,
    #[serde(default)]
    pub total_minions_killed: u32,
    #[serde(default)]
    pub neutral_minions_killed: u32,
    #[serde(default)]
    pub gold_earned: u32,
}

/// Kills plus a "was first" flag for one objective type.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ObjectiveLine {
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub first: bool,
}

/// Per-team objective block from the summary file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamObjectiveSummary {
    #[serde(default)]
    pub champion: ObjectiveLine,
    #[serde(default)]
    pub tower: ObjectiveLine,
    #[serde(default)]
    pub dragon: ObjectiveLine,
    #[serde(default)]
    pub rift_herald: ObjectiveLine,
    #[serde(default)]
    pub baron: ObjectiveLine,
    #[serde(default)]
    pub inhibitor: ObjectiveLine,
}

/// One draft ban from the summary file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanEntry {
    #[serde(deserialize_with = "deserialize_id_string")]
    pub champion_id: String,
    #[serde(default)]
    pub pick_turn: u32,
}

/// One team's final line from the summary file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub team_id: u16,
    #[serde(default)]
    pub win: bool,
    #[serde(default)]
    pub objectives: TeamObjectiveSummary,
    #[serde(default)]
    pub bans: Vec<BanEntry>,
}

/// The end-of-game summary file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    #[serde(deserialize_with = "deserialize_id_string")]
    pub game_id: String,

    /// Game length in seconds.
    pub game_duration: u32,

    #[serde(default)]
    pub participants: Vec<ParticipantSummary>,

    #[serde(default)]
    pub teams: Vec<TeamSummary>,
}

/// One event inside a timeline frame. Only the fields the pipeline reads
/// are modeled; everything else in the payload is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameEvent {
    #[serde(rename = "type")]
    pub event_type: String,

    /// Milliseconds since game start.
    #[serde(default)]
    pub timestamp: u64,

    #[serde(default)]
    pub team_id: Option<u16>,
    #[serde(default)]
    pub killer_id: Option<u32>,
    #[serde(default)]
    pub victim_id: Option<u32>,
}

/// One frame of the timeline file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineFrame {
    /// Milliseconds since game start.
    #[serde(default)]
    pub timestamp: u64,

    #[serde(default)]
    pub events: Vec<FrameEvent>,
}

/// The timeline ("details") file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameTimeline {
    #[serde(default)]
    pub frame_interval: Option<u64>,

    #[serde(default)]
    pub frames: Vec<TimelineFrame>,
}

/// One entry from the live event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEvent {
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub timestamp: u64,
    /// Event payload, shape varies per event type.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// The live events file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveEvents {
    #[serde(default)]
    pub events: Vec<LiveEvent>,
}
