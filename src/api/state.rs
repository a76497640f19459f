use std::sync::Arc;

use crate::games::GameFetcher;
use crate::grid::GridClient;

#[derive(Clone)]
pub struct AppState {
    pub grid: Arc<GridClient>,
    pub games: Arc<GameFetcher>,
    /// LoL title id used for catalog queries.
    pub title_id: String,
}
