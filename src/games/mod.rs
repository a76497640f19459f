//! Per-game data fetching and the per-series fan-out.
//!
//! One game is fetched by checking which raw files exist, downloading and
//! decoding each available file independently, and deriving the draft
//! block from the summary. A failed optional file degrades that field
//! only; a failure that prevents building the record at all yields an
//! explicit [`GameFetch::Unavailable`] rather than a partial record.
//!
//! Series fetches fire every per-game fetch concurrently and join them:
//! one bad game never cancels its siblings, and the result list keeps the
//! requested sequence order, not completion order.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::ResultCache;
use crate::fetch::{DecodedPayload, FetchError};
use crate::grid::{GameFileKind, GridClient};
use crate::models::{GameRecord, GameSummary, GameTimeline, LiveEvents, SeriesGame};

/// Outcome of one per-game fetch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GameFetch {
    /// The record was built; it may still have absent files ("fetched,
    /// no data"), which is distinct from a failed fetch.
    Fetched(Box<GameRecord>),
    /// The fetch failed outright; the reason is diagnostic text.
    Unavailable { reason: String },
}

impl GameFetch {
    pub fn record(&self) -> Option<&GameRecord> {
        match self {
            GameFetch::Fetched(record) => Some(record),
            GameFetch::Unavailable { .. } => None,
        }
    }
}

/// One game slot of a fetched series.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesGameFetch {
    pub entry: SeriesGame,
    pub outcome: GameFetch,
}

/// All games of a series, in the order they were requested.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesGames {
    pub series_id: String,
    pub games: Vec<SeriesGameFetch>,
}

impl SeriesGames {
    /// The successfully fetched records, failures filtered out.
    pub fn records(&self) -> Vec<&GameRecord> {
        self.games
            .iter()
            .filter_map(|g| g.outcome.record())
            .collect()
    }

    /// Records cloned out for aggregation.
    pub fn records_owned(&self) -> Vec<GameRecord> {
        self.games
            .iter()
            .filter_map(|g| g.outcome.record().cloned())
            .collect()
    }
}

/// Fetches and normalizes per-game data.
pub struct GameFetcher {
    grid: Arc<GridClient>,
    cache: Arc<ResultCache>,
}

impl GameFetcher {
    pub fn new(grid: Arc<GridClient>, cache: Arc<ResultCache>) -> Self {
        Self { grid, cache }
    }

    /// Fetch one game. Total failure becomes `Unavailable`, never an `Err`,
    /// so sibling fetches in a fan-out are unaffected.
    pub async fn fetch_game(&self, series_id: &str, game_number: u32) -> GameFetch {
        match self.fetch_game_inner(series_id, game_number).await {
            Ok(record) => GameFetch::Fetched(Box::new(record)),
            Err(e) => {
                warn!(series_id, game_number, error = %e, "game fetch failed");
                GameFetch::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn fetch_game_inner(
        &self,
        series_id: &str,
        game_number: u32,
    ) -> Result<GameRecord, FetchError> {
        let cache_key = format!("gameData_{}_{}", series_id, game_number);
        if let Some(record) = self.cache.get::<GameRecord>(&cache_key) {
            debug!(series_id, game_number, "game served from cache");
            return Ok(record);
        }

        let available = self.grid.available_files(series_id).await?;
        debug!(
            series_id,
            game_number,
            summary = available.summary,
            details = available.details,
            events = available.events,
            "file availability"
        );

        let summary: Option<GameSummary> = if available.summary {
            self.fetch_typed(series_id, game_number, GameFileKind::Summary)
                .await
        } else {
            None
        };

        let timeline: Option<GameTimeline> = if available.details {
            self.fetch_typed(series_id, game_number, GameFileKind::Details)
                .await
        } else {
            None
        };

        let live_events: Option<LiveEvents> = if available.events {
            self.fetch_typed(series_id, game_number, GameFileKind::Events)
                .await
        } else {
            None
        };

        let record = GameRecord::from_files(summary, timeline, live_events);
        info!(
            series_id,
            game_number,
            game_id = ?record.game_id,
            picks = record.picks.len(),
            bans = record.bans.len(),
            has_winner = record.winner.is_some(),
            "assembled game record"
        );

        // Cached even when empty: repeated lookups for a data-less game
        // stay local for the TTL instead of hammering the provider.
        self.cache.set(&cache_key, &record);
        Ok(record)
    }

    /// Fetch and decode one optional file. Any failure (HTTP status,
    /// transport, decode, shape mismatch) drops this field only.
    async fn fetch_typed<T: serde::de::DeserializeOwned>(
        &self,
        series_id: &str,
        game_number: u32,
        kind: GameFileKind,
    ) -> Option<T> {
        let raw = match self
            .grid
            .download_game_file(series_id, game_number, kind)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(series_id, game_number, kind = kind.as_str(), error = %e, "file fetch failed, leaving field unset");
                return None;
            }
        };

        let payload = match raw.decode() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(series_id, game_number, kind = kind.as_str(), error = %e, "file decode failed, leaving field unset");
                return None;
            }
        };

        match payload {
            DecodedPayload::Json(value) => match serde_json::from_value(value) {
                Ok(typed) => Some(typed),
                Err(e) => {
                    warn!(series_id, game_number, kind = kind.as_str(), error = %e, "unexpected payload shape, leaving field unset");
                    None
                }
            },
            DecodedPayload::Binary(_) => {
                warn!(
                    series_id,
                    game_number,
                    kind = kind.as_str(),
                    "binary payload where JSON was expected, leaving field unset"
                );
                None
            }
        }
    }

    /// Fetch every game of a series concurrently.
    ///
    /// Unfinished games are skipped unless `include_unfinished` is set.
    /// Sibling failures surface as `Unavailable` slots; only a failure to
    /// read the game directory itself errors the whole call.
    pub async fn fetch_series(
        &self,
        series_id: &str,
        include_unfinished: bool,
    ) -> Result<SeriesGames, FetchError> {
        let directory = self.grid.series_games(series_id).await?;

        let targets: Vec<SeriesGame> = directory
            .into_iter()
            .filter(|g| include_unfinished || g.finished)
            .collect();
        info!(series_id, games = targets.len(), "fetching series games");

        let outcomes = join_all(
            targets
                .iter()
                .map(|game| self.fetch_game(series_id, game.sequence_number)),
        )
        .await;

        let games = targets
            .into_iter()
            .zip(outcomes)
            .map(|(entry, outcome)| SeriesGameFetch { entry, outcome })
            .collect();

        Ok(SeriesGames {
            series_id: series_id.to_string(),
            games,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Winner;

    fn fetched(game_id: &str) -> GameFetch {
        GameFetch::Fetched(Box::new(GameRecord {
            game_id: Some(game_id.to_string()),
            winner: Some(Winner { id: "100".into() }),
            ..Default::default()
        }))
    }

    #[test]
    fn test_game_fetch_record_accessor() {
        let ok = fetched("g1");
        assert_eq!(ok.record().unwrap().game_id.as_deref(), Some("g1"));

        let failed = GameFetch::Unavailable {
            reason: "HTTP 500: Internal Server Error".to_string(),
        };
        assert!(failed.record().is_none());
    }

    #[test]
    fn test_series_games_filters_failures() {
        let series = SeriesGames {
            series_id: "s1".to_string(),
            games: vec![
                SeriesGameFetch {
                    entry: SeriesGame {
                        id: "g1".to_string(),
                        sequence_number: 1,
                        started: true,
                        finished: true,
                    },
                    outcome: fetched("g1"),
                },
                SeriesGameFetch {
                    entry: SeriesGame {
                        id: "g2".to_string(),
                        sequence_number: 2,
                        started: true,
                        finished: true,
                    },
                    outcome: GameFetch::Unavailable {
                        reason: "timeout".to_string(),
                    },
                },
                SeriesGameFetch {
                    entry: SeriesGame {
                        id: "g3".to_string(),
                        sequence_number: 3,
                        started: true,
                        finished: true,
                    },
                    outcome: fetched("g3"),
                },
            ],
        };

        let records = series.records();
        assert_eq!(records.len(), 2);
        // Requested order survives, failures are simply absent.
        assert_eq!(records[0].game_id.as_deref(), Some("g1"));
        assert_eq!(records[1].game_id.as_deref(), Some("g3"));
    }

    #[tokio::test]
    async fn test_cached_game_served_without_remote_call() {
        use crate::config::GridConfig;
        use crate::fetch::{Fetcher, FetcherConfig};

        let fetcher = Fetcher::new(FetcherConfig {
            api_key: "test-key".to_string(),
            ..Default::default()
        })
        .unwrap();
        let cache = Arc::new(ResultCache::with_default_ttl());
        let grid = Arc::new(
            GridClient::new(fetcher, Arc::clone(&cache), &GridConfig::default()).unwrap(),
        );
        let games = GameFetcher::new(grid, Arc::clone(&cache));

        let record = GameRecord {
            game_id: Some("g1".to_string()),
            duration: Some(1800),
            ..Default::default()
        };
        cache.set("gameData_s1_1", &record);

        // The cache is consulted before any endpoint; both fetches must
        // come back identical without the provider being reachable.
        let first = games.fetch_game("s1", 1).await;
        let second = games.fetch_game("s1", 1).await;

        let first = first.record().expect("first fetch should hit cache");
        let second = second.record().expect("second fetch should hit cache");
        assert_eq!(first.game_id, second.game_id);
        assert_eq!(first.duration, second.duration);
    }

    #[test]
    fn test_game_fetch_serializes_with_status_tag() {
        let json = serde_json::to_value(GameFetch::Unavailable {
            reason: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["reason"], "boom");

        let json = serde_json::to_value(fetched("g9")).unwrap();
        assert_eq!(json["status"], "fetched");
        assert_eq!(json["gameId"], "g9");
    }
}
