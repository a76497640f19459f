use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::team::aggregate_team;
use crate::grid::TimeWindow;
use crate::models::{series_matches_patch, TeamAggregate};

#[derive(Debug, Deserialize)]
pub struct TeamStatsParams {
    /// Statistics feed window, e.g. LAST_6_MONTHS.
    pub window: Option<String>,
    /// Restrict the local series scan to one tournament.
    pub tournament: Option<String>,
    /// Restrict the local series scan to one patch window, e.g. "14.10".
    pub patch: Option<String>,
}

pub async fn team_stats(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Query(params): Query<TeamStatsParams>,
) -> Result<Json<TeamAggregate>, ApiError> {
    let window = match params.window.as_deref() {
        Some(raw) => raw.parse::<TimeWindow>().map_err(ApiError::BadRequest)?,
        None => TimeWindow::default(),
    };

    let feed = state.grid.team_statistics(&team_id, window).await?;

    let catalog = state
        .grid
        .series_catalog(&state.title_id, params.tournament.as_deref())
        .await?;
    let team_series: Vec<_> = catalog
        .series
        .into_iter()
        .filter(|s| s.team(&team_id).is_some())
        .filter(|s| match params.patch.as_deref() {
            Some(patch) => series_matches_patch(s, &catalog.patches, patch),
            None => true,
        })
        .collect();

    Ok(Json(aggregate_team(&team_id, &feed, &team_series)))
}
