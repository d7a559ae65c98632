use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tip_ladder::store::{CompetitionData, CompetitionSource, InMemorySource};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the leaderboard (default if no subcommand)
    Leaderboard {
        /// Only count rounds up to and including this one
        #[arg(short, long)]
        round: Option<u32>,

        /// Show position changes since the previous round
        #[arg(long)]
        changes: bool,

        /// Tab-separated output for scripts
        #[arg(long)]
        tsv: bool,
    },
    /// Show statistics for one round
    Round {
        round: u32,
    },
    /// Show where a user's margin prediction ranks for a game
    Margin {
        /// Game id
        game: u64,
        /// User id
        user: String,
    },
    /// Recalculate stored points for every tip
    Recalc {
        /// Save the recalculated values back to the data file
        #[arg(long)]
        write: bool,
    },
    /// Validate scoring settings and tips
    Check,
}

#[derive(Parser, Debug)]
#[command(name = "tip-ladder")]
#[command(about = "AFL tipping competition scoring and leaderboards", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/tip-ladder/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Competition data file (overrides data_file from config)
    #[arg(short, long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "tip_ladder=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Leaderboard {
        round: None,
        changes: false,
        tsv: false,
    });

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match tip_ladder::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let defaults = config.default_scoring();
    if let Err(errors) = tip_ladder::scoring::validate_settings(&defaults) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    // Load competition data
    let data_path = cli
        .data
        .map(PathBuf::from)
        .or_else(|| config.data_file.clone())
        .unwrap_or_else(tip_ladder::store::get_data_path);
    let data = match tip_ladder::store::load_competition(&data_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Data error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    let effective = data.settings.merge(&defaults);
    if let Err(errors) = tip_ladder::scoring::validate_settings(&effective) {
        eprintln!("Competition '{}' settings errors:", data.id);
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    tracing::debug!(
        competition = %data.id,
        games = data.games.len(),
        tips = data.tips.len(),
        members = data.members.len(),
        "loaded competition"
    );

    let use_colors = tip_ladder::output::should_use_colors();

    let code = match command {
        Commands::Leaderboard { round, changes, tsv } => {
            run_leaderboard(data, defaults, round, changes, tsv, use_colors)
        }
        Commands::Round { round } => run_round(data, defaults, round, use_colors),
        Commands::Margin { game, user } => run_margin(&data, game, &user),
        Commands::Recalc { write } => run_recalc(data, defaults, &data_path, write),
        Commands::Check => run_check(&data),
    };

    std::process::exit(code);
}

fn run_leaderboard(
    data: CompetitionData,
    defaults: tip_ladder::scoring::SettingsConfig,
    round: Option<u32>,
    changes: bool,
    tsv: bool,
    use_colors: bool,
) -> i32 {
    let competition_id = data.id.clone();
    let latest = data.latest_completed_round();
    let source = InMemorySource::new(vec![data]).with_defaults(defaults);

    let result = if changes {
        match round.or(latest) {
            Some(current) => {
                tip_ladder::leaderboard::with_rank_changes(&source, &competition_id, current)
            }
            None => source.leaderboard(&competition_id, None),
        }
    } else {
        source.leaderboard(&competition_id, round)
    };

    match result {
        Ok(standings) => {
            if tsv {
                println!("{}", tip_ladder::output::format_tsv(&standings));
            } else {
                println!(
                    "{}",
                    tip_ladder::output::format_leaderboard(&standings, use_colors)
                );
            }
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Leaderboard error: {:#}", e);
            EXIT_DATA
        }
    }
}

fn run_round(
    data: CompetitionData,
    defaults: tip_ladder::scoring::SettingsConfig,
    round: u32,
    use_colors: bool,
) -> i32 {
    let settings = data.settings.merge(&defaults).resolve();
    let records = data.records(Some(round));
    let summary = tip_ladder::round::summarize_round(&records, &data.games, &settings, round);
    println!(
        "{}",
        tip_ladder::output::format_round_summary(&summary, use_colors)
    );
    EXIT_SUCCESS
}

fn run_margin(data: &CompetitionData, game_id: u64, user_id: &str) -> i32 {
    let Some(game) = data.game(game_id) else {
        eprintln!("Unknown game {}", game_id);
        return EXIT_DATA;
    };

    let tips: Vec<_> = data
        .tips
        .iter()
        .filter(|t| t.game_id == game_id && t.competition_id == data.id)
        .cloned()
        .collect();
    println!(
        "{}",
        tip_ladder::output::format_margin_rank(game, &tips, user_id)
    );
    EXIT_SUCCESS
}

fn run_recalc(
    mut data: CompetitionData,
    defaults: tip_ladder::scoring::SettingsConfig,
    data_path: &std::path::Path,
    write: bool,
) -> i32 {
    let settings = data.settings.merge(&defaults).resolve();
    let recalc = tip_ladder::recalc::recalculate(&data.records(None), &settings);
    let updated = data.apply_recalculation(&recalc);

    println!("{}", tip_ladder::output::format_recalculation(&recalc, updated));

    if write {
        if let Err(e) = tip_ladder::store::save_competition(data_path, &data) {
            eprintln!("Failed to save: {:#}", e);
            return EXIT_DATA;
        }
        println!("Saved to {}", data_path.display());
    }
    EXIT_SUCCESS
}

fn run_check(data: &CompetitionData) -> i32 {
    let warnings = tip_ladder::scoring::validate_tips(&data.records(None), &data.games);
    if warnings.is_empty() {
        println!("Competition '{}': {} tips OK", data.id, data.tips.len());
        return EXIT_SUCCESS;
    }

    eprintln!("Competition '{}' has {} warnings:", data.id, warnings.len());
    for warning in warnings {
        eprintln!("  - {}", warning);
    }
    EXIT_DATA
}
