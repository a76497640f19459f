use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rift_agent::api::{build_router, state::AppState};
use rift_agent::cache::ResultCache;
use rift_agent::calculate::draft::aggregate_draft;
use rift_agent::calculate::team::aggregate_team;
use rift_agent::config::AppConfig;
use rift_agent::fetch::{FetchError, Fetcher, FetcherConfig};
use rift_agent::games::{GameFetch, GameFetcher};
use rift_agent::grid::{GridClient, TimeWindow};
use rift_agent::iso8601_duration_secs;

#[derive(Parser)]
#[command(name = "rift-agent")]
#[command(about = "League of Legends esports analytics over the GRID data feeds")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Fetch and summarize the games of a series
    Series {
        /// Series id
        id: String,

        /// Include games not yet marked finished
        #[arg(long)]
        all: bool,
    },

    /// Compute draft statistics for a series
    Draft {
        /// Series id
        id: String,
    },

    /// Compute a team's performance aggregate
    Team {
        /// Team id
        id: String,

        /// Statistics window (LAST_3_MONTHS, LAST_6_MONTHS, LAST_12_MONTHS)
        #[arg(long, default_value = "LAST_6_MONTHS")]
        window: String,

        /// Restrict the local series scan to one tournament
        #[arg(long)]
        tournament: Option<String>,

        /// Restrict the local series scan to one patch window (e.g. "14.10")
        #[arg(long)]
        patch: Option<String>,
    },

    /// Show the patch timeline from the content catalog
    Patches,
}

/// Wire the fetcher, cache and provider client together from config.
fn build_pipeline(config: &AppConfig) -> Result<(Arc<GridClient>, Arc<GameFetcher>)> {
    let api_key = config
        .grid
        .resolve_api_key()
        .ok_or(FetchError::MissingCredential)?;

    let fetcher = Fetcher::new(FetcherConfig {
        api_key,
        timeout: Duration::from_secs(config.grid.timeout_seconds),
        ..Default::default()
    })?;

    let cache = Arc::new(ResultCache::new(Duration::from_secs(
        config.grid.cache_ttl_seconds,
    )));

    let grid = Arc::new(GridClient::new(fetcher, Arc::clone(&cache), &config.grid)?);
    let games = Arc::new(GameFetcher::new(Arc::clone(&grid), cache));
    Ok((grid, games))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting rift-agent v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_or_default(Path::new(&cli.config))
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve { host, port } => {
            let (grid, games) = build_pipeline(&config)?;
            let state = AppState {
                grid,
                games,
                title_id: config.grid.title_id.clone(),
            };
            let app = build_router(state);

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }

        Commands::Series { id, all } => {
            let (_, games) = build_pipeline(&config)?;
            let series = games.fetch_series(&id, all).await?;

            println!("\n=== Series {} ===", series.series_id);
            for slot in &series.games {
                match &slot.outcome {
                    GameFetch::Fetched(record) => {
                        println!(
                            "Game {}: id={} duration={}s picks={} bans={} winner={}",
                            slot.entry.sequence_number,
                            record.game_id.as_deref().unwrap_or("-"),
                            record.duration.unwrap_or(0),
                            record.picks.len(),
                            record.bans.len(),
                            record
                                .winner
                                .as_ref()
                                .map(|w| w.id.as_str())
                                .unwrap_or("-"),
                        );
                    }
                    GameFetch::Unavailable { reason } => {
                        println!(
                            "Game {}: unavailable ({})",
                            slot.entry.sequence_number, reason
                        );
                    }
                }
            }
            let fetched = series.records().len();
            println!("\n{} of {} games fetched", fetched, series.games.len());
        }

        Commands::Draft { id } => {
            let (grid, games) = build_pipeline(&config)?;
            let series = games.fetch_series(&id, false).await?;
            let records = series.records_owned();
            let catalog = grid.champion_catalog().await?;

            match aggregate_draft(&records, &catalog) {
                Some(stats) => {
                    println!("\n=== Draft Statistics ({} games) ===", stats.total_games);
                    println!(
                        "Blue side win rate:  {:.1}%",
                        stats.blue_side_win_rate * 100.0
                    );
                    println!(
                        "Red side win rate:   {:.1}%",
                        stats.red_side_win_rate * 100.0
                    );
                    println!(
                        "First pick win rate: {:.1}%",
                        stats.first_pick_win_rate * 100.0
                    );
                    println!(
                        "Pick phases:         {:.1}% phase 1 / {:.1}% phase 2",
                        stats.first_phase_pick_rate * 100.0,
                        stats.second_phase_pick_rate * 100.0
                    );
                    println!("\nMost banned:");
                    for row in &stats.most_banned {
                        let name = if row.name.is_empty() {
                            row.champion_id.as_str()
                        } else {
                            row.name.as_str()
                        };
                        println!("  {:<16} {:.1}%", name, row.ban_rate * 100.0);
                    }
                }
                None => {
                    println!(
                        "\nNo draft data available for series {} ({} games fetched)",
                        id,
                        records.len()
                    );
                }
            }
        }

        Commands::Team {
            id,
            window,
            tournament,
            patch,
        } => {
            let window: TimeWindow = window
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;

            let (grid, _) = build_pipeline(&config)?;
            let feed = grid.team_statistics(&id, window).await?;
            let catalog = grid
                .series_catalog(&config.grid.title_id, tournament.as_deref())
                .await?;
            let team_series: Vec<_> = catalog
                .series
                .into_iter()
                .filter(|s| s.team(&id).is_some())
                .filter(|s| match patch.as_deref() {
                    Some(patch) => {
                        rift_agent::series_matches_patch(s, &catalog.patches, patch)
                    }
                    None => true,
                })
                .collect();
            let complete = team_series.iter().filter(|s| s.is_complete()).count();

            // The full parse is display-only; the aggregate keeps the
            // feed-derived arithmetic.
            let avg_length = feed
                .game
                .as_ref()
                .and_then(|g| g.duration.as_ref())
                .and_then(|d| d.avg.as_deref())
                .and_then(iso8601_duration_secs);

            let stats = aggregate_team(&id, &feed, &team_series);

            println!("\n=== Team {} ({}) ===", stats.team_id, window);
            println!("Win rate:       {:.1}%", stats.win_rate);
            println!(
                "Record:         {}W - {}L ({} series, {} with full data)",
                stats.wins,
                stats.losses,
                team_series.len(),
                complete
            );
            println!(
                "Current streak: {:?} {}",
                stats.current_streak.kind, stats.current_streak.count
            );
            println!("KDA:            {:.2}", stats.kda);
            println!("Gold/min:       {:.0}", stats.gold_per_minute);
            if let Some(secs) = avg_length {
                println!("Avg game:       {}m {:02}s", secs / 60, secs % 60);
            }
            println!(
                "Blue side:      {}W/{} ({:.1}%)",
                stats.side.blue.wins,
                stats.side.blue.games,
                stats.side.blue.win_rate() * 100.0
            );
            println!(
                "Red side:       {}W/{} ({:.1}%)",
                stats.side.red.wins,
                stats.side.red.games,
                stats.side.red.win_rate() * 100.0
            );
            println!("First blood:    {:.1}%", stats.objectives.first_blood);
            println!(
                "Objectives:     {} towers / {} dragons / {} barons",
                stats.objectives.tower_kills,
                stats.objectives.dragon_kills,
                stats.objectives.baron_kills
            );
            let form: String = stats
                .recent_form
                .iter()
                .map(|r| match r {
                    rift_agent::FormResult::Win => 'W',
                    rift_agent::FormResult::Loss => 'L',
                    rift_agent::FormResult::None => '-',
                })
                .collect();
            println!("Recent form:    {} (oldest to newest)", form);
        }

        Commands::Patches => {
            let (grid, _) = build_pipeline(&config)?;
            let catalog = grid.series_catalog(&config.grid.title_id, None).await?;

            if catalog.patches.is_empty() {
                println!("No patch versions in the content catalog.");
            } else {
                let mut names: Vec<String> =
                    catalog.patches.iter().map(|p| p.name.clone()).collect();
                rift_agent::sort_patch_names_desc(&mut names);

                println!("\n=== Patch Timeline ({} patches) ===\n", names.len());
                for name in &names {
                    let published = catalog
                        .patches
                        .iter()
                        .find(|p| &p.name == name)
                        .map(|p| p.published_on.date_naive().to_string())
                        .unwrap_or_else(|| "?".to_string());
                    println!("  {:<8} published {}", name, published);
                }
            }
        }
    }

    Ok(())
}
