//! Main entry point for the league-elo command line tool
//!
//! Loads configuration, reads a cleaned match log, runs the rating engine
//! and prints or writes the resulting leaderboard, records and tables.

use anyhow::Result;
use clap::Parser;
use league_elo::config::AppConfig;
use league_elo::rating::RatingEngine;
use league_elo::report::{read_match_log_file, write_outputs, RatingReport};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// League Elo - rating engine for fantasy-league match history
#[derive(Parser)]
#[command(
    name = "league-elo",
    version,
    about = "Compute Elo ratings, leaderboards and records from a fantasy-league match log",
    long_about = "League Elo replays a chronological log of head-to-head matches through an \
                 Elo rating fold, then reports the current leaderboard with movement against \
                 the previous week, peak and lowest ratings, biggest single-match swings and \
                 the longest run at #1."
)]
struct Args {
    /// Match log to rate
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to the match log (CSV: season,week,entity_a,entity_b,score_a,score_b)"
    )]
    matches: Option<PathBuf>,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// K-factor override
    #[arg(short, long, value_name = "K", help = "Override the Elo K-factor")]
    k_factor: Option<f64>,

    /// Initial rating override
    #[arg(long, value_name = "RATING", help = "Override the initial rating")]
    initial_rating: Option<f64>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Output directory for tables
    #[arg(
        short,
        long,
        value_name = "DIR",
        help = "Write ledger.csv, snapshots.csv, leaderboard.csv and report.json here"
    )]
    output_dir: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long, help = "Print the report as JSON instead of text")]
    json: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without rating")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment, config file and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(k_factor) = args.k_factor {
        config.rating.k_factor = k_factor;
    }

    if let Some(initial_rating) = args.initial_rating {
        config.rating.initial_rating = initial_rating;
    }

    league_elo::config::validate_config(&config)?;
    Ok(config)
}

fn run(args: &Args, config: &AppConfig) -> Result<()> {
    let engine = RatingEngine::new(config.rating)?;

    let Some(matches_path) = &args.matches else {
        anyhow::bail!("No match log given, pass one with --matches");
    };

    info!("Reading match log from {}", matches_path.display());
    let log = read_match_log_file(matches_path)?;

    let rating_run = engine.run(&log);
    let report = RatingReport::build(&rating_run, config);

    if !report.has_data() {
        warn!("No valid matches in {}", matches_path.display());
    }

    if let Some(dir) = &args.output_dir {
        write_outputs(dir, &rating_run, &report)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }

    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "{} v{} (initial rating {}, K = {})",
        config.service.name,
        league_elo::VERSION,
        config.rating.initial_rating,
        config.rating.k_factor
    );

    if args.dry_run {
        info!("Configuration validation successful");
        return Ok(());
    }

    if let Err(e) = run(&args, &config) {
        error!("Rating run failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
