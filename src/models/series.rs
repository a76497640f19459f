//! Series catalog entries, patch versions and the champion catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One game entry from the live-state feed's series directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesGame {
    pub id: String,
    pub sequence_number: u32,
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub finished: bool,
}

/// A team as it appears on a series catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesTeam {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo_url: String,
    /// Positive when this team leads the series score.
    #[serde(default)]
    pub score_advantage: f64,
}

/// Data-coverage entry attached to a series by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductServiceLevel {
    pub product_name: String,
    pub service_level: String,
}

/// Series format (best-of-N).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesFormat {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_shortened: String,
}

/// Tournament a series belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_shortened: String,
}

/// A competitive series from the central catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesInfo {
    pub id: String,

    pub start_time_scheduled: Option<DateTime<Utc>>,

    /// Array position 0 is the first (blue) side.
    #[serde(default)]
    pub teams: Vec<SeriesTeam>,

    #[serde(default)]
    pub format: SeriesFormat,

    #[serde(default)]
    pub tournament: TournamentInfo,

    #[serde(default)]
    pub product_service_levels: Vec<ProductServiceLevel>,
}

impl SeriesInfo {
    /// Whether full post-game data exists for this series.
    pub fn is_complete(&self) -> bool {
        is_series_complete(&self.product_service_levels)
    }

    /// The team entry for the given id, if the team played in this series.
    pub fn team(&self, team_id: &str) -> Option<&SeriesTeam> {
        self.teams.iter().find(|t| t.id == team_id)
    }
}

/// Full post-game statistics are only available at the FULL service level.
pub fn is_series_complete(levels: &[ProductServiceLevel]) -> bool {
    levels
        .iter()
        .any(|l| l.product_name == "MATCH_DATA" && l.service_level == "FULL")
}

/// A content-catalog (patch) version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchVersion {
    pub name: String,
    pub published_on: DateTime<Utc>,
}

/// The patch a series played at: the latest patch published on or before
/// the series' scheduled start, among all known patches.
pub fn patch_for_date<'a>(
    patches: &'a [PatchVersion],
    at: DateTime<Utc>,
) -> Option<&'a PatchVersion> {
    patches
        .iter()
        .filter(|p| p.published_on <= at)
        .max_by_key(|p| p.published_on)
}

/// Whether a series falls inside the named patch's window.
///
/// A series with no scheduled start matches nothing.
pub fn series_matches_patch(
    series: &SeriesInfo,
    patches: &[PatchVersion],
    patch_name: &str,
) -> bool {
    let Some(start) = series.start_time_scheduled else {
        return false;
    };
    patch_for_date(patches, start).map(|p| p.name.as_str()) == Some(patch_name)
}

/// Sort patch names newest-first by dot-separated numeric segments.
///
/// "14.10" sorts above "14.9"; non-numeric segments compare as 0.
pub fn sort_patch_names_desc(names: &mut [String]) {
    fn segments(name: &str) -> Vec<u32> {
        name.split('.')
            .map(|s| s.parse::<u32>().unwrap_or(0))
            .collect()
    }
    names.sort_by(|a, b| segments(b).cmp(&segments(a)));
}

/// Display info for one champion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionInfo {
    pub name: String,
    pub image_url: String,
}

/// Champion id → display info, preserving catalog order.
///
/// Order matters: the ban leaderboard breaks rate ties by catalog position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChampionCatalog {
    entries: Vec<(String, ChampionInfo)>,
}

impl ChampionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: String, info: ChampionInfo) {
        self.entries.push((id, info));
    }

    pub fn get(&self, id: &str) -> Option<&ChampionInfo> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, info)| info)
    }

    /// Champion ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
