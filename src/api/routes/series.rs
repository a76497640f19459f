use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::draft::aggregate_draft;
use crate::games::SeriesGameFetch;
use crate::models::DraftAggregate;

// ── Series games endpoint ───────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SeriesGamesParams {
    /// Include games the live feed has not marked finished.
    #[serde(default)]
    pub include_unfinished: bool,
}

#[derive(Debug, Serialize)]
pub struct SeriesGamesResponse {
    pub series_id: String,
    pub games: Vec<SeriesGameFetch>,
}

pub async fn series_games(
    State(state): State<AppState>,
    Path(series_id): Path<String>,
    Query(params): Query<SeriesGamesParams>,
) -> Result<Json<SeriesGamesResponse>, ApiError> {
    let series = state
        .games
        .fetch_series(&series_id, params.include_unfinished)
        .await?;

    Ok(Json(SeriesGamesResponse {
        series_id: series.series_id,
        games: series.games,
    }))
}

// ── Series draft endpoint ───────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SeriesDraftResponse {
    pub series_id: String,
    /// Games that were fetched for the series, valid or not.
    pub fetched_games: u32,
    /// `null` when no game carried complete draft data; consumers must
    /// render "no data", not zero rates.
    pub stats: Option<DraftAggregate>,
}

pub async fn series_draft(
    State(state): State<AppState>,
    Path(series_id): Path<String>,
) -> Result<Json<SeriesDraftResponse>, ApiError> {
    let series = state.games.fetch_series(&series_id, false).await?;
    let records = series.records_owned();

    let catalog = state.grid.champion_catalog().await?;
    let stats = aggregate_draft(&records, &catalog);

    Ok(Json(SeriesDraftResponse {
        series_id: series.series_id,
        fetched_games: records.len() as u32,
        stats,
    }))
}
