//! Series-level draft aggregation.
//!
//! Folds a collection of valid game records into side win rates, first-pick
//! advantage, a ban-rate leaderboard and the pick-phase split.

use tracing::debug;

use crate::models::{
    BannedChampion, ChampionCatalog, DraftAggregate, DraftPhase, GameRecord, BLUE_SIDE, RED_SIDE,
};

/// A game contributes to draft statistics only when its draft block is
/// fully populated. Records failing this are dropped before aggregation,
/// not errored on.
pub fn is_valid_draft(game: &GameRecord) -> bool {
    let valid = game.has_draft_data();
    if !valid {
        debug!(
            game_id = ?game.game_id,
            picks = game.picks.len(),
            bans = game.bans.len(),
            has_winner = game.winner.is_some(),
            "game excluded from draft aggregation"
        );
    }
    valid
}

/// Running counters per champion.
#[derive(Debug, Clone, Copy, Default)]
struct ChampionCounts {
    bans: u32,
    picks: u32,
    wins: u32,
    first_picks: u32,
}

/// Aggregate draft statistics over a set of games.
///
/// Invalid records are filtered out first. Returns `None` when no valid
/// game remains, so callers can tell "no data" apart from "computed zero";
/// win-rate math never runs against an empty set.
pub fn aggregate_draft(games: &[GameRecord], catalog: &ChampionCatalog) -> Option<DraftAggregate> {
    let valid: Vec<&GameRecord> = games.iter().filter(|g| is_valid_draft(g)).collect();
    if valid.is_empty() {
        return None;
    }

    let total_games = valid.len() as u32;
    let mut blue_side_wins = 0u32;
    let mut red_side_wins = 0u32;
    let mut first_pick_wins = 0u32;
    let mut first_phase_picks = 0u32;
    let mut second_phase_picks = 0u32;
    let mut total_picks = 0u32;
    // First-seen order keeps the leaderboard deterministic for champions
    // missing from the catalog.
    let mut champion_counts: Vec<(String, ChampionCounts)> = Vec::new();

    fn counts_for<'a>(
        counts: &'a mut Vec<(String, ChampionCounts)>,
        champion_id: &str,
    ) -> &'a mut ChampionCounts {
        if let Some(idx) = counts.iter().position(|(id, _)| id == champion_id) {
            return &mut counts[idx].1;
        }
        counts.push((champion_id.to_string(), ChampionCounts::default()));
        &mut counts.last_mut().expect("just pushed").1
    }

    for game in &valid {
        for pick in &game.picks {
            total_picks += 1;
            match pick.phase {
                DraftPhase::Phase1 => first_phase_picks += 1,
                DraftPhase::Phase2 => second_phase_picks += 1,
            }

            let counts = counts_for(&mut champion_counts, &pick.champion_id);
            counts.picks += 1;
            if pick.is_first_pick {
                counts.first_picks += 1;
            }
            if pick.is_winner {
                counts.wins += 1;
            }
        }

        for ban in &game.bans {
            counts_for(&mut champion_counts, &ban.champion_id).bans += 1;
        }

        // Valid games always carry a winner.
        if let Some(winner) = &game.winner {
            let first_pick_team = game
                .picks
                .iter()
                .find(|p| p.is_first_pick)
                .map(|p| p.team_id.as_str());
            if first_pick_team == Some(winner.id.as_str()) {
                first_pick_wins += 1;
            }

            if winner.id == BLUE_SIDE.to_string() {
                blue_side_wins += 1;
            } else if winner.id == RED_SIDE.to_string() {
                red_side_wins += 1;
            }
        }
    }

    // Leaderboard rows in catalog order first so equal ban rates keep the
    // catalog's ordering, then champions the catalog does not know.
    let mut rows: Vec<BannedChampion> = Vec::new();
    for id in catalog.ids() {
        if let Some((_, counts)) = champion_counts.iter().find(|(cid, _)| cid == id) {
            let info = catalog.get(id).cloned().unwrap_or_default();
            rows.push(BannedChampion {
                champion_id: id.to_string(),
                name: info.name,
                image_url: info.image_url,
                ban_rate: counts.bans as f64 / total_games as f64,
            });
        }
    }
    for (id, counts) in &champion_counts {
        if catalog.get(id).is_none() {
            rows.push(BannedChampion {
                champion_id: id.clone(),
                name: String::new(),
                image_url: String::new(),
                ban_rate: counts.bans as f64 / total_games as f64,
            });
        }
    }
    rows.sort_by(|a, b| {
        b.ban_rate
            .partial_cmp(&a.ban_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows.truncate(5);

    Some(DraftAggregate {
        total_games,
        blue_side_win_rate: blue_side_wins as f64 / total_games as f64,
        red_side_win_rate: red_side_wins as f64 / total_games as f64,
        first_pick_win_rate: first_pick_wins as f64 / total_games as f64,
        most_banned: rows,
        first_phase_pick_rate: if total_picks == 0 {
            0.0
        } else {
            first_phase_picks as f64 / total_picks as f64
        },
        second_phase_pick_rate: if total_picks == 0 {
            0.0
        } else {
            second_phase_picks as f64 / total_picks as f64
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BanEvent, ChampionInfo, PickEvent, Winner};

    fn pick(champion_id: &str, team_id: &str, position: u32, is_winner: bool) -> PickEvent {
        PickEvent {
            champion_id: champion_id.to_string(),
            team_id: team_id.to_string(),
            is_first_pick: position == 1,
            is_winner,
            phase: DraftPhase::from_position(position),
            position,
        }
    }

    fn ban(champion_id: &str, team_id: &str, position: u32) -> BanEvent {
        BanEvent {
            champion_id: champion_id.to_string(),
            team_id: team_id.to_string(),
            position,
        }
    }

    /// A valid game with a winner and a trivial draft.
    fn game(winner_side: &str, banned: &[&str]) -> GameRecord {
        let blue_wins = winner_side == "100";
        GameRecord {
            game_id: Some("g".to_string()),
            duration: Some(1800),
            summary: None,
            timeline: None,
            live_events: None,
            picks: (1..=10)
                .map(|pos| {
                    let team = if pos <= 5 { "100" } else { "200" };
                    let wins = (team == "100") == blue_wins;
                    pick(&format!("c{}", pos), team, pos, wins)
                })
                .collect(),
            bans: banned
                .iter()
                .enumerate()
                .map(|(i, id)| ban(id, "100", i as u32 + 1))
                .collect(),
            winner: Some(Winner {
                id: winner_side.to_string(),
            }),
        }
    }

    fn catalog() -> ChampionCatalog {
        let mut catalog = ChampionCatalog::new();
        for (id, name) in [("b1", "Aatrox"), ("b2", "Ahri"), ("b3", "Akali")] {
            catalog.insert(
                id.to_string(),
                ChampionInfo {
                    name: name.to_string(),
                    image_url: format!("https://cdn.example/{}.png", id),
                },
            );
        }
        catalog
    }

    #[test]
    fn test_side_win_rates_split_evenly() {
        // Blue wins games 1-2, red wins games 3-4.
        let games = vec![
            game("100", &["b1"]),
            game("100", &["b1"]),
            game("200", &["b2"]),
            game("200", &["b2"]),
        ];
        let agg = aggregate_draft(&games, &catalog()).unwrap();

        assert_eq!(agg.total_games, 4);
        assert!((agg.blue_side_win_rate - 0.5).abs() < f64::EPSILON);
        assert!((agg.red_side_win_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_first_pick_win_rate() {
        // First pick always belongs to side 100 here; blue wins 3 of 4.
        let games = vec![
            game("100", &["b1"]),
            game("100", &["b1"]),
            game("100", &["b1"]),
            game("200", &["b1"]),
        ];
        let agg = aggregate_draft(&games, &catalog()).unwrap();

        assert!((agg.first_pick_win_rate - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_games_dropped_without_crash() {
        let mut no_bans = game("100", &[]);
        no_bans.bans.clear();
        let mut no_winner = game("100", &["b1"]);
        no_winner.winner = None;
        let empty = GameRecord::default();

        let games = vec![game("200", &["b1"]), no_bans, no_winner, empty];
        let agg = aggregate_draft(&games, &catalog()).unwrap();

        // Only the first record survives the validity filter.
        assert_eq!(agg.total_games, 1);
        assert!((agg.red_side_win_rate - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_valid_games_yields_none() {
        let games = vec![GameRecord::default()];
        assert!(aggregate_draft(&games, &catalog()).is_none());
        assert!(aggregate_draft(&[], &catalog()).is_none());
    }

    #[test]
    fn test_most_banned_ordering_and_enrichment() {
        // b2 banned twice, b1 once.
        let games = vec![game("100", &["b2", "b1"]), game("200", &["b2"])];
        let agg = aggregate_draft(&games, &catalog()).unwrap();

        assert_eq!(agg.most_banned[0].champion_id, "b2");
        assert_eq!(agg.most_banned[0].name, "Ahri");
        assert!((agg.most_banned[0].ban_rate - 1.0).abs() < f64::EPSILON);
        assert_eq!(agg.most_banned[1].champion_id, "b1");
        assert!((agg.most_banned[1].ban_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_most_banned_ties_keep_catalog_order() {
        // b1 and b3 tie at one ban each; the catalog lists b1 first.
        let games = vec![game("100", &["b3", "b1"])];
        let agg = aggregate_draft(&games, &catalog()).unwrap();

        let tied: Vec<&str> = agg
            .most_banned
            .iter()
            .filter(|row| row.ban_rate > 0.0)
            .map(|row| row.champion_id.as_str())
            .collect();
        assert_eq!(tied, vec!["b1", "b3"]);
    }

    #[test]
    fn test_most_banned_caps_at_five() {
        let games = vec![game("100", &["b1", "b2", "b3", "x4", "x5", "x6"])];
        let agg = aggregate_draft(&games, &catalog()).unwrap();
        assert_eq!(agg.most_banned.len(), 5);
    }

    #[test]
    fn test_unknown_champion_degrades_to_empty_info() {
        let games = vec![game("100", &["mystery"])];
        let agg = aggregate_draft(&games, &catalog()).unwrap();

        let row = agg
            .most_banned
            .iter()
            .find(|r| r.champion_id == "mystery")
            .unwrap();
        assert_eq!(row.name, "");
        assert_eq!(row.image_url, "");
        assert!((row.ban_rate - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pick_phase_split() {
        let games = vec![game("100", &["b1"])];
        let agg = aggregate_draft(&games, &catalog()).unwrap();

        // Ten picks per game: six in phase one, four in phase two.
        assert!((agg.first_phase_pick_rate - 0.6).abs() < f64::EPSILON);
        assert!((agg.second_phase_pick_rate - 0.4).abs() < f64::EPSILON);
    }
}
