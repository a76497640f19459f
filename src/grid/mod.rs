//! GRID API client.
//!
//! Talks to the central catalog (GraphQL), the live-state feed (GraphQL),
//! the file-download endpoints (REST) and the team statistics feed (REST).
//! All provider specifics are isolated in this module so endpoint changes
//! are easy to fix.

pub mod types;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::cache::ResultCache;
use crate::config::GridConfig;
use crate::fetch::{parse_url, FetchError, Fetcher, RawResponse};
use crate::models::{ChampionCatalog, ChampionInfo, PatchVersion, SeriesGame, SeriesInfo};

use types::{
    ChampionNode, Connection, FileAvailability, SeriesNode, SeriesStatistics, TeamStatsResponse,
    VersionNode,
};

// ── GraphQL queries ─────────────────────────────────────────────────────────

const SERIES_STATE_QUERY: &str = r#"
query GetSeriesState($seriesId: ID!) {
  seriesState(id: $seriesId) {
    games {
      id
      sequenceNumber
      started
      finished
    }
  }
}
"#;

const CHAMPION_CATALOG_QUERY: &str = r#"
query GetChampions {
  champions: contentCatalogEntities(
    filter: { entityType: { in: [CHARACTER] } }
  ) {
    edges {
      node {
        id
        name
        imageUrl
      }
    }
  }
}
"#;

/// The catalog query filters by tournament only when one is requested,
/// so the filter block is assembled per call.
fn series_catalog_query(with_tournament: bool) -> String {
    let tournament_filter = if with_tournament {
        ", tournament: { id: { in: [$tournamentId] } }"
    } else {
        ""
    };
    let tournament_var = if with_tournament {
        ", $tournamentId: ID!"
    } else {
        ""
    };
    format!(
        r#"
query GetSeriesCatalog($titleId: ID!{tournament_var}) {{
  allSeries(filter: {{ titleId: $titleId{tournament_filter} }}) {{
    edges {{
      node {{
        id
        startTimeScheduled
        teams {{
          baseInfo {{ id name logoUrl }}
          scoreAdvantage
        }}
        format {{ id name nameShortened }}
        tournament {{ id name nameShortened }}
        productServiceLevels {{ productName serviceLevel }}
      }}
    }}
  }}
  contentCatalogVersions {{
    edges {{
      node {{ name publishedOn }}
    }}
  }}
}}
"#
    )
}

// ── Client ──────────────────────────────────────────────────────────────────

/// The time windows the statistics feed understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    Last3Months,
    #[default]
    Last6Months,
    Last12Months,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Last3Months => "LAST_3_MONTHS",
            TimeWindow::Last6Months => "LAST_6_MONTHS",
            TimeWindow::Last12Months => "LAST_12_MONTHS",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LAST_3_MONTHS" | "3M" => Ok(TimeWindow::Last3Months),
            "LAST_6_MONTHS" | "6M" => Ok(TimeWindow::Last6Months),
            "LAST_12_MONTHS" | "12M" => Ok(TimeWindow::Last12Months),
            other => Err(format!("unknown time window: {}", other)),
        }
    }
}

/// The per-game file types the download endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameFileKind {
    Summary,
    Details,
    Events,
}

impl GameFileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameFileKind::Summary => "summary",
            GameFileKind::Details => "details",
            GameFileKind::Events => "events",
        }
    }
}

/// Series catalog plus the patch timeline it was fetched with.
#[derive(Debug, Clone)]
pub struct SeriesCatalog {
    pub series: Vec<SeriesInfo>,
    pub patches: Vec<PatchVersion>,
}

/// GRID API client. Construct once and share via `Arc`.
pub struct GridClient {
    fetcher: Fetcher,
    cache: Arc<ResultCache>,
    central_url: Url,
    live_state_url: Url,
    file_download_base: String,
    stats_base: String,
}

// GraphQL `data` shapes, private to the client.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesStateData {
    series_state: SeriesStateNode,
}

#[derive(Deserialize)]
struct SeriesStateNode {
    #[serde(default)]
    games: Vec<SeriesGame>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogData {
    all_series: Connection<SeriesNode>,
    #[serde(default)]
    content_catalog_versions: Option<Connection<VersionNode>>,
}

#[derive(Deserialize)]
struct ChampionsData {
    champions: Connection<ChampionNode>,
}

impl GridClient {
    pub fn new(
        fetcher: Fetcher,
        cache: Arc<ResultCache>,
        config: &GridConfig,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher,
            cache,
            central_url: parse_url(&config.central_url)?,
            live_state_url: parse_url(&config.live_state_url)?,
            file_download_base: config.file_download_url.trim_end_matches('/').to_string(),
            stats_base: config.stats_url.trim_end_matches('/').to_string(),
        })
    }

    /// Games known to the live-state feed for a series, in feed order.
    ///
    /// Completion flags come back as-is; callers decide whether to touch
    /// in-progress games.
    pub async fn series_games(&self, series_id: &str) -> Result<Vec<SeriesGame>, FetchError> {
        let cache_key = format!("games_{}", series_id);
        if let Some(games) = self.cache.get::<Vec<SeriesGame>>(&cache_key) {
            debug!(series_id, "series games served from cache");
            return Ok(games);
        }

        let data = self
            .fetcher
            .post_graphql(
                &self.live_state_url,
                SERIES_STATE_QUERY,
                serde_json::json!({ "seriesId": series_id }),
            )
            .await?;
        let state: SeriesStateData = serde_json::from_value(data)?;

        info!(
            series_id,
            games = state.series_state.games.len(),
            "fetched series game directory"
        );
        self.cache.set(&cache_key, &state.series_state.games);
        Ok(state.series_state.games)
    }

    /// Which raw file types exist for a series.
    pub async fn available_files(&self, series_id: &str) -> Result<FileAvailability, FetchError> {
        let cache_key = format!("files_{}", series_id);
        if let Some(files) = self.cache.get::<FileAvailability>(&cache_key) {
            return Ok(files);
        }

        let url = parse_url(&format!("{}/list/{}", self.file_download_base, series_id))?;
        let files: FileAvailability = self.fetcher.get_json(&url).await?;

        self.cache.set(&cache_key, &files);
        Ok(files)
    }

    /// Download one raw game file. The body is returned undecoded so the
    /// caller can run the payload decoder and decide how failures spread.
    pub async fn download_game_file(
        &self,
        series_id: &str,
        game_number: u32,
        kind: GameFileKind,
    ) -> Result<RawResponse, FetchError> {
        let url = match kind {
            GameFileKind::Summary | GameFileKind::Details => parse_url(&format!(
                "{}/end-state/riot/series/{}/games/{}/{}",
                self.file_download_base,
                series_id,
                game_number,
                kind.as_str()
            ))?,
            GameFileKind::Events => parse_url(&format!(
                "{}/events/riot/series/{}/games/{}",
                self.file_download_base, series_id, game_number
            ))?,
        };
        self.fetcher.get(&url).await
    }

    /// Pre-aggregated team statistics for a time window. Not cached: the
    /// feed already aggregates server-side and callers hit it once per view.
    pub async fn team_statistics(
        &self,
        team_id: &str,
        window: TimeWindow,
    ) -> Result<SeriesStatistics, FetchError> {
        let url = parse_url(&format!(
            "{}/team/{}?timeWindow={}",
            self.stats_base,
            team_id,
            window.as_str()
        ))?;
        let response: TeamStatsResponse = self.fetcher.get_json(&url).await?;
        Ok(response.statistics.team_statistics.series)
    }

    /// Series catalog for a title, optionally filtered to one tournament,
    /// plus the patch timeline.
    pub async fn series_catalog(
        &self,
        title_id: &str,
        tournament_id: Option<&str>,
    ) -> Result<SeriesCatalog, FetchError> {
        let query = series_catalog_query(tournament_id.is_some());
        let mut variables = serde_json::json!({ "titleId": title_id });
        if let Some(tournament_id) = tournament_id {
            variables["tournamentId"] = serde_json::json!(tournament_id);
        }

        let data = self
            .fetcher
            .post_graphql(&self.central_url, &query, variables)
            .await?;
        let catalog: CatalogData = serde_json::from_value(data)?;

        let series: Vec<SeriesInfo> = catalog
            .all_series
            .edges
            .into_iter()
            .map(|e| e.node.into_series_info())
            .collect();
        let patches: Vec<PatchVersion> = catalog
            .content_catalog_versions
            .map(|c| c.edges.into_iter().map(|e| e.node.into_patch()).collect())
            .unwrap_or_default();

        info!(
            title_id,
            series = series.len(),
            patches = patches.len(),
            "fetched series catalog"
        );
        Ok(SeriesCatalog { series, patches })
    }

    /// Champion display catalog, in provider order. Cached: the catalog
    /// changes only on patch days.
    pub async fn champion_catalog(&self) -> Result<ChampionCatalog, FetchError> {
        const CACHE_KEY: &str = "champion_catalog";
        if let Some(catalog) = self.cache.get::<ChampionCatalog>(CACHE_KEY) {
            return Ok(catalog);
        }

        let data = self
            .fetcher
            .post_graphql(
                &self.central_url,
                CHAMPION_CATALOG_QUERY,
                serde_json::json!({}),
            )
            .await?;
        let champions: ChampionsData = serde_json::from_value(data)?;

        let mut catalog = ChampionCatalog::new();
        for edge in champions.champions.edges {
            catalog.insert(
                edge.node.id,
                ChampionInfo {
                    name: edge.node.name,
                    image_url: edge.node.image_url,
                },
            );
        }

        self.cache.set(CACHE_KEY, &catalog);
        Ok(catalog)
    }
}
