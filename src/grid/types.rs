//! Provider response types.
//!
//! Shapes mirror what the GRID endpoints actually return; everything is
//! lenient (`Option` + defaults) because field coverage varies by title
//! and service level. Conversion into the crate's domain models happens
//! here so the rest of the pipeline never sees provider-specific nesting.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{
    PatchVersion, ProductServiceLevel, SeriesFormat, SeriesInfo, SeriesTeam, TournamentInfo,
};

/// Deserialize a numeric field that may arrive as a number or a string.
pub(crate) fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let val: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(val.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }))
}

/// Which raw files exist for a series, from the file-availability endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAvailability {
    #[serde(default)]
    pub events: bool,
    #[serde(default)]
    pub summary: bool,
    #[serde(default)]
    pub details: bool,
    #[serde(default)]
    pub tencent: bool,
    #[serde(default)]
    pub replay: bool,
}

// ── GraphQL connection plumbing ─────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

// ── Central catalog nodes ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBaseInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesTeamNode {
    pub base_info: TeamBaseInfo,
    #[serde(default)]
    pub score_advantage: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_shortened: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_shortened: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLevelNode {
    pub product_name: String,
    pub service_level: String,
}

/// One series from the `allSeries` catalog query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesNode {
    pub id: String,
    #[serde(default)]
    pub start_time_scheduled: Option<DateTime<Utc>>,
    #[serde(default = "Vec::new")]
    pub teams: Vec<SeriesTeamNode>,
    #[serde(default)]
    pub format: FormatNode,
    #[serde(default)]
    pub tournament: TournamentNode,
    #[serde(default = "Vec::new")]
    pub product_service_levels: Vec<ServiceLevelNode>,
}

impl SeriesNode {
    /// Flatten the provider nesting into the domain model.
    pub fn into_series_info(self) -> SeriesInfo {
        SeriesInfo {
            id: self.id,
            start_time_scheduled: self.start_time_scheduled,
            teams: self
                .teams
                .into_iter()
                .map(|t| SeriesTeam {
                    id: t.base_info.id,
                    name: t.base_info.name,
                    logo_url: t.base_info.logo_url,
                    score_advantage: t.score_advantage,
                })
                .collect(),
            format: SeriesFormat {
                id: self.format.id,
                name: self.format.name,
                name_shortened: self.format.name_shortened,
            },
            tournament: TournamentInfo {
                id: self.tournament.id,
                name: self.tournament.name,
                name_shortened: self.tournament.name_shortened,
            },
            product_service_levels: self
                .product_service_levels
                .into_iter()
                .map(|l| ProductServiceLevel {
                    product_name: l.product_name,
                    service_level: l.service_level,
                })
                .collect(),
        }
    }
}

/// One champion entry from the content catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_url: String,
}

/// One content-catalog (patch) version entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionNode {
    pub name: String,
    pub published_on: DateTime<Utc>,
}

impl VersionNode {
    pub fn into_patch(self) -> PatchVersion {
        PatchVersion {
            name: self.name,
            published_on: self.published_on,
        }
    }
}

// ── Team statistics feed ────────────────────────────────────────────────────

/// sum/avg/min/max block; the feed sometimes serializes numbers as strings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StatBlock {
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub sum: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub avg: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StreakBlock {
    #[serde(default)]
    pub min: i64,
    #[serde(default)]
    pub max: i64,
    #[serde(default)]
    pub current: i64,
}

/// Won/lost split entry: one entry with `value: true`, one with `false`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WonSplit {
    #[serde(default)]
    pub value: bool,
    #[serde(default)]
    pub count: u32,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub streak: Option<StreakBlock>,
}

/// First-kill split entry, same shape as the won split minus the streak.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FirstKillSplit {
    #[serde(default)]
    pub value: bool,
    #[serde(default)]
    pub count: u32,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub percentage: Option<f64>,
}

/// Per-objective completion counts, keyed by a type tag
/// (`destroyTower`, `slayDragon`, `slayBaron`, ...).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveStat {
    #[serde(rename = "type", default)]
    pub objective_type: String,
    #[serde(default)]
    pub completion_count: Option<StatBlock>,
}

/// ISO-8601 duration strings, e.g. `PT32M18S`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DurationBlock {
    #[serde(default)]
    pub sum: Option<String>,
    #[serde(default)]
    pub min: Option<String>,
    #[serde(default)]
    pub max: Option<String>,
    #[serde(default)]
    pub avg: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatistics {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub duration: Option<DurationBlock>,
    #[serde(default)]
    pub money: Option<StatBlock>,
}

/// The series-level block of the team statistics feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStatistics {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub kills: Option<StatBlock>,
    #[serde(default)]
    pub deaths: Option<StatBlock>,
    #[serde(default)]
    pub kill_assists_given: Option<StatBlock>,
    #[serde(default = "Vec::new")]
    pub won: Vec<WonSplit>,
    #[serde(default = "Vec::new")]
    pub first_kill: Vec<FirstKillSplit>,
    #[serde(default = "Vec::new")]
    pub objectives: Vec<ObjectiveStat>,
    #[serde(default)]
    pub game: Option<GameStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStatistics {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub series: SeriesStatistics,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsEnvelope {
    #[serde(default)]
    pub team_statistics: TeamStatistics,
}

/// Top-level team statistics response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStatsResponse {
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub statistics: StatisticsEnvelope,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_file_availability_defaults_missing_fields() {
        let json = r#"{"summary": true}"#;
        let files: FileAvailability = serde_json::from_str(json).unwrap();

        assert!(files.summary);
        assert!(!files.details);
        assert!(!files.events);
        assert!(!files.replay);
    }

    #[test]
    fn test_series_node_flattens_base_info() {
        let json = r#"{
            "id": "series-9",
            "startTimeScheduled": "2026-05-10T17:00:00Z",
            "teams": [
                {"baseInfo": {"id": "t1", "name": "Alpha", "logoUrl": "a.png"}, "scoreAdvantage": 1},
                {"baseInfo": {"id": "t2", "name": "Beta", "logoUrl": "b.png"}, "scoreAdvantage": -1}
            ],
            "format": {"id": "f", "name": "Best of 5", "nameShortened": "Bo5"},
            "tournament": {"id": "tr", "name": "Spring Split", "nameShortened": "Spring"},
            "productServiceLevels": [
                {"productName": "MATCH_DATA", "serviceLevel": "FULL"}
            ]
        }"#;

        let node: SeriesNode = serde_json::from_str(json).unwrap();
        let series = node.into_series_info();

        assert_eq!(series.id, "series-9");
        assert_eq!(series.teams[0].id, "t1");
        assert_eq!(series.teams[0].name, "Alpha");
        assert!((series.teams[1].score_advantage - -1.0).abs() < f64::EPSILON);
        assert_eq!(series.format.name_shortened, "Bo5");
        assert!(series.is_complete());
    }

    #[test]
    fn test_stat_block_accepts_string_numbers() {
        let json = r#"{"sum": "120", "avg": 24.5, "min": null}"#;
        let block: StatBlock = serde_json::from_str(json).unwrap();

        assert_eq!(block.sum, Some(120.0));
        assert_eq!(block.avg, Some(24.5));
        assert_eq!(block.min, None);
        assert_eq!(block.max, None);
    }

    #[test]
    fn test_team_stats_response_lenient() {
        let json = r#"{
            "entityId": "team-1",
            "statistics": {
                "teamStatistics": {
                    "id": "team-1",
                    "series": {
                        "count": 18,
                        "kills": {"sum": 230, "avg": 12.7, "min": 3, "max": 29},
                        "won": [
                            {"value": true, "count": 12, "percentage": 66.7,
                             "streak": {"min": -2, "max": 5, "current": 3}},
                            {"value": false, "count": 6, "percentage": 33.3}
                        ],
                        "firstKill": [{"value": true, "count": 10, "percentage": 55.6}],
                        "objectives": [
                            {"type": "destroyTower", "completionCount": {"sum": 140}},
                            {"type": "slayDragon", "completionCount": {"sum": 52}}
                        ],
                        "game": {
                            "count": 40,
                            "duration": {"avg": "PT32M18S"},
                            "money": {"avg": 58000}
                        }
                    }
                }
            }
        }"#;

        let parsed: TeamStatsResponse = serde_json::from_str(json).unwrap();
        let series = parsed.statistics.team_statistics.series;

        assert_eq!(series.count, 18);
        let won = series.won.iter().find(|w| w.value).unwrap();
        assert_eq!(won.streak.unwrap().current, 3);
        assert_eq!(
            series.game.unwrap().duration.unwrap().avg.as_deref(),
            Some("PT32M18S")
        );
    }

    #[test]
    fn test_team_stats_response_empty_body() {
        let parsed: TeamStatsResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.statistics.team_statistics.series.count, 0);
        assert!(parsed.statistics.team_statistics.series.won.is_empty());
    }

    #[test]
    fn test_version_node_into_patch() {
        let json = r#"{"name": "14.9", "publishedOn": "2026-05-01T00:00:00Z"}"#;
        let node: VersionNode = serde_json::from_str(json).unwrap();
        let patch = node.into_patch();
        assert_eq!(patch.name, "14.9");
    }
}
